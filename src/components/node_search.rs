use leptos::prelude::*;

use crate::influence::Dashboard;

const MAX_SUGGESTIONS: usize = 8;

/// Find a participant by id and focus it.
#[component]
pub fn NodeSearch(dashboard: RwSignal<Dashboard>) -> impl IntoView {
	let query = RwSignal::new(String::new());
	let suggestions = Memo::new(move |_| {
		let query = query.get();
		dashboard.with(|d| {
			d.search_nodes(&query, MAX_SUGGESTIONS)
				.into_iter()
				.map(str::to_string)
				.collect::<Vec<_>>()
		})
	});
	let select = move |id: String| {
		dashboard.update(|d| d.focus_node(&id));
		query.set(String::new());
	};

	view! {
		<div class="node-search">
			<input
				type="search"
				placeholder="Buscar usuario"
				disabled=move || dashboard.with(|d| d.nodes().is_empty())
				prop:value=move || query.get()
				on:input=move |ev| query.set(event_target_value(&ev))
				on:keydown=move |ev: leptos::ev::KeyboardEvent| {
					if ev.key() == "Enter" {
						if let Some(id) = suggestions.with_untracked(|s| s.first().cloned()) {
							select(id);
						}
					}
				}
			/>
			<ul class="suggestions">
				{move || {
					suggestions
						.get()
						.into_iter()
						.map(|id| {
							let label = format!("@{id}");
							view! { <li on:click=move |_| select(id.clone())>{label}</li> }
						})
						.collect_view()
				}}
			</ul>
		</div>
	}
}
