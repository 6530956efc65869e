use leptos::prelude::*;
use log::warn;

use super::force_graph::scale::category_hue;
use crate::influence::{
	CategoryEntry, Dashboard, Histogram, NodeAttribute, attribute_available, histogram,
};

/// Description of the current heuristic, its category filters and the
/// node distribution chart.
#[component]
pub fn HeuristicPanel(dashboard: RwSignal<Dashboard>, hue: f64) -> impl IntoView {
	let categories = move || {
		dashboard.with(|d| d.registry().iter().cloned().enumerate().collect::<Vec<_>>())
	};

	view! {
		<aside class="heuristic-panel">
			{move || {
				dashboard
					.with(|d| d.current_heuristic())
					.map(|h| {
						view! {
							<h2>{h.label()}</h2>
							<p class="description">{h.description()}</p>
						}
					})
			}}
			<ul class="categories">
				<For
					each=categories
					key=|(i, entry): &(usize, CategoryEntry)| {
						(*i, entry.name.clone(), entry.active, entry.count)
					}
					children=move |(i, entry)| {
						view! { <CategoryToggle dashboard entry hue=category_hue(i, hue) /> }
					}
				/>
			</ul>
			<DistributionChart dashboard hue />
		</aside>
	}
}

#[component]
fn CategoryToggle(dashboard: RwSignal<Dashboard>, entry: CategoryEntry, hue: f64) -> impl IntoView {
	let name = entry.name.clone();
	let on_change = move |ev: leptos::ev::Event| {
		let active = event_target_checked(&ev);
		if let Some(Err(e)) = dashboard.try_update(|d| d.toggle_category(&name, active)) {
			warn!("{e}");
		}
	};

	view! {
		<li>
			<label>
				<input type="checkbox" prop:checked=entry.active on:change=on_change />
				<span class="swatch" style:background-color=format!("hsl({hue:.0}, 70%, 55%)") />
				{entry.name.clone()}
				<span class="count">{format!("({})", entry.count)}</span>
			</label>
		</li>
	}
}

/// Bar chart of one node attribute; attributes without data are disabled.
#[component]
fn DistributionChart(dashboard: RwSignal<Dashboard>, hue: f64) -> impl IntoView {
	let attribute = RwSignal::new(NodeAttribute::default());
	let chart = Memo::new(move |_| {
		let attribute = attribute.get();
		dashboard.with(|d| histogram(d.nodes(), attribute, d.view().max_out_degree))
	});

	view! {
		<section class="distribution">
			<select on:change=move |ev| {
				if let Some(a) = NodeAttribute::from_key(&event_target_value(&ev)) {
					attribute.set(a);
				}
			}>
				{NodeAttribute::ALL
					.into_iter()
					.map(|a| {
						view! {
							<option
								value=a.key()
								disabled=move || dashboard.with(|d| !attribute_available(d.nodes(), a))
								prop:selected=move || attribute.get() == a
							>
								{a.label()}
							</option>
						}
					})
					.collect_view()}
			</select>
			<div class="bars">
				{move || {
					let Histogram { bins, max_count, .. } = chart.get();
					bins.into_iter()
						.map(|bin| {
							let height = 100.0 * bin.count as f64 / max_count as f64;
							view! {
								<div
									class="bar"
									title=format!("{}: {}", bin.label(), bin.count)
									style:height=format!("{height:.1}%")
									style:background-color=format!("hsl({hue:.0}, 60%, 50%)")
								/>
							}
						})
						.collect_view()
				}}
			</div>
			<p class="axis">{move || attribute.get().label()}</p>
			{move || {
				let missing = chart.with(|h| h.missing);
				(missing > 0).then(|| view! { <small class="missing">{format!("{missing} sin valor")}</small> })
			}}
		</section>
	}
}
