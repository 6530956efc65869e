use leptos::callback::{Callable, UnsyncCallback};
use leptos::html::Input;
use leptos::prelude::*;
use log::{error, warn};
use web_sys::File;

use super::node_search::NodeSearch;
use super::topic_dialog::TopicDialog;
use crate::influence::{Dashboard, Heuristic};
use crate::transport::{TopicInfo, UploadError, save_archive};

fn chosen_file(input: NodeRef<Input>) -> Option<File> {
	input.get_untracked()?.files()?.get(0)
}

/// Dataset picker, node search, heuristic selector and export button.
#[component]
pub fn TopBar(
	dashboard: RwSignal<Dashboard>,
	on_upload: UnsyncCallback<(File, TopicInfo)>,
) -> impl IntoView {
	let file_input = NodeRef::<Input>::new();
	let asking_topic = RwSignal::new(false);

	let on_topic = UnsyncCallback::new(move |topic: TopicInfo| {
		match chosen_file(file_input) {
			Some(file) => on_upload.run((file, topic)),
			None => warn!("{}", UploadError::NoFile),
		}
	});

	let on_heuristic = move |ev: leptos::ev::Event| {
		let key = event_target_value(&ev);
		let result = Heuristic::from_key(&key)
			.and_then(|h| dashboard.try_update(|d| d.select_heuristic(h)).unwrap_or(Ok(())));
		if let Err(e) = result {
			warn!("{e}");
		}
	};

	let exportable = move || {
		dashboard.with(|d| !d.nodes().is_empty() && !d.view().visible_edges.is_empty())
	};
	let on_download = move |_| {
		let archive = dashboard.with_untracked(|d| d.export());
		match archive {
			Ok(archive) => {
				if let Err(e) = save_archive(&archive) {
					error!("download failed: {e:?}");
				}
			}
			Err(e) => warn!("nothing to export: {e}"),
		}
	};

	view! {
		<header class="top-bar">
			<h1>"Grafo de Influencia"</h1>
			<label class="file-picker">
				"Cargar dataset"
				<input
					node_ref=file_input
					type="file"
					accept=".csv,text/csv"
					on:change=move |_| {
						if chosen_file(file_input).is_some() {
							asking_topic.set(true);
						}
					}
				/>
			</label>
			<NodeSearch dashboard />
			<select
				class="heuristic-select"
				disabled=move || dashboard.with(|d| d.current_heuristic().is_none())
				on:change=on_heuristic
			>
				{Heuristic::ALL
					.into_iter()
					.map(|h| {
						view! {
							<option
								value=h.key()
								disabled=move || {
									dashboard.with(|d| !d.available_heuristics().contains(&h))
								}
								prop:selected=move || {
									dashboard.with(|d| d.current_heuristic() == Some(h))
								}
							>
								{h.label()}
							</option>
						}
					})
					.collect_view()}
			</select>
			<button class="download" disabled=move || !exportable() on:click=on_download>
				"Descargar grafo"
			</button>
			{move || {
				dashboard
					.with(|d| d.topic().map(|t| t.topic.clone()))
					.map(|topic| view! { <span class="topic">{topic}</span> })
			}}
		</header>
		<TopicDialog open=asking_topic on_submit=on_topic />
	}
}
