use leptos::prelude::*;
use log::warn;

use crate::influence::{Dashboard, InfluenceEntry, Node};

fn scalar(value: Option<f64>) -> String {
	value.map_or_else(|| "-".to_string(), |v| format!("{:.0}%", v * 100.0))
}

/// The focused node and everyone it visibly influences.
#[component]
pub fn SelectedNodePanel(dashboard: RwSignal<Dashboard>) -> impl IntoView {
	let focused = move || dashboard.with(|d| d.focused_node().cloned());

	view! {
		<Show when=move || focused().is_some()>
			<aside class="selected-node">
				{move || focused().map(|node| view! { <NodeHeader node /> })}
				<button class="close" on:click=move |_| dashboard.update(|d| d.clear_focus())>
					"×"
				</button>
				<h3>"Influencia sobre"</h3>
				<ul class="influence-list">
					{move || {
						dashboard
							.with(|d| d.influence_list())
							.into_iter()
							.map(|entry| view! { <InfluenceRow dashboard entry /> })
							.collect_view()
					}}
				</ul>
			</aside>
		</Show>
	}
}

#[component]
fn NodeHeader(node: Node) -> impl IntoView {
	view! {
		<h2>{format!("@{}", node.id)}</h2>
		<dl>
			<dt>"Nodos influenciados"</dt>
			<dd>{node.out_degree}</dd>
			<dt>"Creencia"</dt>
			<dd>{scalar(node.belief)}</dd>
			<dt>"Confianza"</dt>
			<dd>{scalar(node.confidence)}</dd>
		</dl>
	}
}

/// One influenced target; clicking lights up both ends of the edge.
#[component]
fn InfluenceRow(dashboard: RwSignal<Dashboard>, entry: InfluenceEntry) -> impl IntoView {
	let values = entry
		.category_values
		.iter()
		.map(|(category, value)| format!("{category}: {:.1}%", value * 100.0))
		.collect::<Vec<_>>()
		.join(", ");
	let dates = entry.date.clone().map(|d| d.join(", "));
	let target = format!("@{}", entry.target);
	let on_click = move |_| {
		dashboard.update(|d| {
			if !d.focus_entry(&entry) {
				warn!("{} or {} is no longer in the graph", entry.source, entry.target);
			}
		})
	};

	view! {
		<li on:click=on_click>
			<strong>{target}</strong>
			<span class="values">{values}</span>
			{dates.map(|d| view! { <small class="dates">{d}</small> })}
		</li>
	}
}
