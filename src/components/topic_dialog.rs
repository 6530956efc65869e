use leptos::callback::{Callable, UnsyncCallback};
use leptos::prelude::*;

use crate::config::DashboardConfig;
use crate::transport::TopicInfo;

const DEFAULT_TOPIC: &str = "La reforma pensional en Colombia";
const DEFAULT_CONTEXT: &str = "El gobierno del presidente Gustavo Petro presentó un proyecto de ley para \
	reformar el sistema pensional, el cual fue aprobado con el apoyo de algunos sectores y \
	cuestionado por otros.";

/// Asks for the analysis topic before a dataset is sent.
#[component]
pub fn TopicDialog(open: RwSignal<bool>, on_submit: UnsyncCallback<TopicInfo>) -> impl IntoView {
	let config = use_context::<DashboardConfig>().unwrap_or_default();
	let topic = RwSignal::new(DEFAULT_TOPIC.to_string());
	let context = RwSignal::new(DEFAULT_CONTEXT.to_string());
	let problem = RwSignal::new(None::<String>);
	let (topic_max, context_max) = (config.topic_max_chars, config.context_max_chars);

	let submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		match TopicInfo::new(&topic.get(), &context.get(), topic_max, context_max) {
			Ok(info) => {
				problem.set(None);
				open.set(false);
				on_submit.run(info);
			}
			Err(e) => problem.set(Some(e.to_string())),
		}
	};

	view! {
		<Show when=move || open.get()>
			<div class="dialog-backdrop">
				<form class="dialog" on:submit=submit>
					<h2>"Tema de análisis"</h2>
					<p>
						"Para continuar con el análisis del dataset, indique el tema principal y un "
						"contexto neutral sobre el cual se realizará el estudio."
					</p>
					<label>
						"Tema de análisis"
						<input
							type="text"
							required
							maxlength=topic_max
							prop:value=move || topic.get()
							on:input=move |ev| topic.set(event_target_value(&ev))
						/>
						<small>{format!("Máximo {topic_max} caracteres")}</small>
					</label>
					<label>
						"Contexto imparcial sobre el tema"
						<textarea
							required
							maxlength=context_max
							prop:value=move || context.get()
							on:input=move |ev| context.set(event_target_value(&ev))
						/>
						<small>{format!("Máximo {context_max} caracteres")}</small>
					</label>
					{move || problem.get().map(|p| view! { <p class="dialog-error">{p}</p> })}
					<div class="dialog-actions">
						<button type="button" on:click=move |_| open.set(false)>
							"Cancelar"
						</button>
						<button type="submit">"Analizar Dataset"</button>
					</div>
				</form>
			</div>
		</Show>
	}
}
