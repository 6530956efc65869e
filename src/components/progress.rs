use std::time::Duration;

use leptos::prelude::*;
use log::warn;

use crate::influence::{Dashboard, StanceProgress};

/// Stance and affinity indicators shown while the backend is still computing.
#[component]
pub fn ProgressFeedback(dashboard: RwSignal<Dashboard>) -> impl IntoView {
	// ticking a local copy keeps the once-a-second update away from the graph
	let stance = RwSignal::new(StanceProgress::default());
	let reported = Memo::new(move |_| dashboard.with(|d| *d.stance_progress()));
	Effect::new(move |_| stance.set(reported.get()));

	match set_interval_with_handle(move || stance.update(StanceProgress::tick), Duration::from_secs(1)) {
		Ok(handle) => on_cleanup(move || handle.clear()),
		Err(e) => warn!("progress timer unavailable: {e:?}"),
	}

	let affinity = move || dashboard.with(|d| *d.affinity_progress());

	view! {
		<div class="progress-feedback">
			<Show when=move || stance.with(|s| s.open)>
				<div class="progress stance">
					<span>
						{move || {
							stance.with(|s| format!("Calculando postura de {} usuarios en {} lotes", s.users, s.batches))
						}}
					</span>
					<div class="track">
						<div
							class="buffer"
							style:width=move || format!("{}%", stance.with(StanceProgress::buffer_percent))
						/>
						<div
							class="bar"
							style:width=move || format!("{}%", stance.with(StanceProgress::percent))
						/>
					</div>
					<span>{move || format!("{}%", stance.with(StanceProgress::percent))}</span>
				</div>
			</Show>
			<Show when=move || affinity().open>
				<div class="progress affinity">
					<span>{move || format!("Calculando afinidad de {} usuarios", affinity().users)}</span>
					<div class="track">
						<div class="bar" style:width=move || format!("{}%", affinity().percent()) />
					</div>
					<span>{move || format!("{}%", affinity().percent())}</span>
				</div>
			</Show>
		</div>
	}
}
