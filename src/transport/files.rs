//! Browser file plumbing: reading the dataset, saving the export.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, File, FileReader, HtmlAnchorElement, Url};

use super::error::UploadError;
use crate::influence::ExportArchive;

/// Read `file` and hand its base64 encoding to `on_done`.
pub fn read_file_base64<F>(file: &File, on_done: F) -> Result<(), UploadError>
where
	F: FnOnce(Result<String, UploadError>) + 'static,
{
	let reader = FileReader::new().map_err(|e| UploadError::Read(format!("{e:?}")))?;
	let reader_done = reader.clone();
	let name = file.name();
	let on_load_end = Closure::once_into_js(move || {
		let result = reader_done
			.result()
			.map_err(|e| UploadError::Read(format!("{e:?}")))
			.and_then(|buffer| {
				if buffer.is_instance_of::<js_sys::ArrayBuffer>() {
					Ok(js_sys::Uint8Array::new(&buffer).to_vec())
				} else {
					Err(UploadError::Read(format!("{name} could not be read")))
				}
			})
			.map(|bytes| {
				debug!("read {} bytes from {name}", bytes.len());
				STANDARD.encode(bytes)
			});
		on_done(result);
	});
	reader.set_onloadend(Some(on_load_end.unchecked_ref()));
	reader
		.read_as_array_buffer(file)
		.map_err(|e| UploadError::Read(format!("{e:?}")))
}

const REVOKE_DELAY_MS: i32 = 10_000;

/// Offer `archive` as a browser download.
pub fn save_archive(archive: &ExportArchive) -> Result<(), JsValue> {
	let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(archive.bytes.as_slice()));
	let options = BlobPropertyBag::new();
	options.set_type("application/gzip");
	let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	let document = window
		.document()
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(&archive.file_name);
	anchor.click();

	// the download may not have started yet; release the blob a little later
	let revoke = Closure::once_into_js(move || {
		if let Err(e) = Url::revoke_object_url(&url) {
			warn!("could not release {url}: {e:?}");
		}
	});
	window.set_timeout_with_callback_and_timeout_and_arguments_0(
		revoke.unchecked_ref(),
		REVOKE_DELAY_MS,
	)?;
	Ok(())
}
