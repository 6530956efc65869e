use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures talking to the compute backend.
#[derive(Debug, Error)]
pub enum TransportError {
	/// The browser refused to open or use the socket.
	#[error("websocket error: {0}")]
	Socket(String),

	/// A text frame did not follow the Engine.IO / Socket.IO framing.
	#[error("malformed frame: {0}")]
	Frame(String),

	/// A payload did not have the expected shape.
	#[error("payload decode failed: {0}")]
	Payload(#[from] serde_json::Error),
}

impl From<JsValue> for TransportError {
	fn from(value: JsValue) -> Self {
		Self::Socket(format!("{value:?}"))
	}
}

/// Failures preparing a dataset upload.
#[derive(Debug, Error)]
pub enum UploadError {
	/// The analysis topic was left blank.
	#[error("the analysis topic is required")]
	EmptyTopic,

	/// The neutral context was left blank.
	#[error("the topic context is required")]
	EmptyContext,

	/// No file was chosen.
	#[error("no dataset file selected")]
	NoFile,

	/// The browser could not read the file.
	#[error("could not read dataset file: {0}")]
	Read(String),

	/// The upload could not be sent.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
