use std::cell::RefCell;
use std::rc::Rc;

use leptos::callback::UnsyncCallback;
use leptos::prelude::*;
use log::{error, info};
use web_sys::File;

use crate::components::force_graph::scale::graph_data;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::{
	ErrorAlert, HeuristicPanel, ProgressFeedback, SelectedNodePanel, TimelineChart, TopBar,
};
use crate::config::DashboardConfig;
use crate::influence::{Applied, Dashboard, Generation};
use crate::transport::{
	EventSink, SocketTransport, TopicInfo, Transport, UploadError, UploadRequest, read_file_base64,
};

type Connection = Rc<RefCell<Option<SocketTransport>>>;

/// Open a connection for `generation` and send `file` through it once read.
fn start_load(
	config: &DashboardConfig,
	connection: &Connection,
	dashboard: RwSignal<Dashboard>,
	generation: Generation,
	file: File,
	topic: TopicInfo,
) -> Result<(), UploadError> {
	let sink: EventSink = Rc::new(move |generation, event| {
		let applied = dashboard.try_update(|d| d.apply(generation, event));
		if applied == Some(Applied::Stale) {
			info!("late event from load {} ignored", generation.0);
		}
	});
	// replacing the old connection closes it
	*connection.borrow_mut() = Some(SocketTransport::connect(&config.backend_url, generation, sink)?);

	let connection = connection.clone();
	read_file_base64(&file, move |read| {
		let sent = read.and_then(|csv_data| {
			let request = UploadRequest {
				csv_data,
				topic_info: topic,
			};
			match connection.borrow().as_ref() {
				Some(t) if t.generation() == generation => Ok(t.send_upload(&request)?),
				_ => Ok(()),
			}
		});
		if let Err(e) = sent {
			error!("upload failed: {e}");
		}
	})
}

/// The influence dashboard: canvas, panels and the backend connection.
#[component]
pub fn DashboardPage() -> impl IntoView {
	let config = DashboardConfig::default();
	provide_context(config.clone());

	let dashboard = RwSignal::new(Dashboard::new(config.layout));
	let connection: Connection = Rc::new(RefCell::new(None));
	// one palette per session
	let hue = (js_sys::Math::random() * 360.0).floor();

	let on_upload = UnsyncCallback::new(move |(file, topic): (File, TopicInfo)| {
		let Some(generation) = dashboard.try_update(|d| d.begin_upload(topic.clone())) else {
			return;
		};
		if let Err(e) = start_load(&config, &connection, dashboard, generation, file, topic) {
			error!("could not start load {}: {e}", generation.0);
		}
	});

	let data = Memo::new(move |_| dashboard.with(|d| graph_data(d, hue)));
	let on_select = Callback::new(move |id: Option<String>| {
		dashboard.update(|d| match id {
			Some(id) => d.focus_node(&id),
			None => d.clear_focus(),
		})
	});

	view! {
		<div class="dashboard">
			<TopBar dashboard on_upload />
			<ProgressFeedback dashboard />
			<ErrorAlert dashboard />
			<main class="graph-area">
				<ForceGraphCanvas data on_select fullscreen=true />
				<HeuristicPanel dashboard hue />
				<SelectedNodePanel dashboard />
			</main>
			<TimelineChart dashboard hue />
		</div>
	}
}
