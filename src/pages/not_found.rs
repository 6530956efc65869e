use leptos::prelude::*;
use leptos_router::components::A;

/// 404 page pointing back at the dashboard.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Página no encontrada"</h1>
			<A href="/">"Volver al grafo"</A>
		</div>
	}
}
