use leptos::prelude::*;

use crate::influence::{Dashboard, Timeline, timeline};

/// Visible edges per day of their latest observation.
#[component]
pub fn TimelineChart(dashboard: RwSignal<Dashboard>, hue: f64) -> impl IntoView {
	let chart = Memo::new(move |_| dashboard.with(|d| timeline(&d.view().visible_edges)));

	view! {
		<Show when=move || chart.with(|t| !t.days.is_empty())>
			<section class="timeline">
				<div class="bars">
					{move || {
						let Timeline { days, max_count, .. } = chart.get();
						days.into_iter()
							.map(|day| {
								let height = 100.0 * day.count as f64 / max_count as f64;
								view! {
									<div
										class="bar"
										title=format!("{}: {}", day.day, day.count)
										style:height=format!("{height:.1}%")
										style:background-color=format!("hsl({hue:.0}, 100%, 50%)")
									/>
								}
							})
							.collect_view()
					}}
				</div>
				{move || {
					let undated = chart.with(|t| t.undated);
					(undated > 0).then(|| view! { <small>{format!("{undated} sin fecha")}</small> })
				}}
			</section>
		</Show>
	}
}
