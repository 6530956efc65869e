use std::time::Duration;

use leptos::prelude::*;

use crate::config::DashboardConfig;
use crate::influence::Dashboard;

/// Preprocessing failure reported by the backend; hides itself after a while.
#[component]
pub fn ErrorAlert(dashboard: RwSignal<Dashboard>) -> impl IntoView {
	let config = use_context::<DashboardConfig>().unwrap_or_default();
	let message = Memo::new(move |_| dashboard.with(|d| d.alert().map(str::to_string)));
	let linger = Duration::from_secs(config.alert_seconds.into());

	Effect::new(move |_| {
		let Some(shown) = message.get() else {
			return;
		};
		set_timeout(
			move || {
				// a newer alert keeps its own timer
				if message.get_untracked().as_deref() == Some(shown.as_str()) {
					dashboard.update(|d| d.dismiss_alert());
				}
			},
			linger,
		);
	});

	view! {
		{move || {
			message
				.get()
				.map(|text| {
					view! {
						<div class="alert error" role="alert">
							<strong>"Error de preprocesamiento"</strong>
							<p>{text}</p>
							<button on:click=move |_| dashboard.update(|d| d.dismiss_alert())>
								"Cerrar"
							</button>
						</div>
					}
				})
		}}
	}
}
