use leptos::prelude::*;

use super::{GraphHandle, Ui, open_node};
use crate::state::{Action, NodeDetail};

/// Title, rendered body and backlinks of the selected node.
#[component]
pub fn DetailsPanel(ui: Ui, graph: GraphHandle) -> impl IntoView {
	let open = move || ui.state.with(|s| s.details_open);
	let selected = move || ui.state.with(|s| s.selected.clone());

	view! {
		<Show when=open>
			<aside class="details-panel">
				<button class="close" on:click=move |_| ui.dispatch(Action::CloseDetails)>
					"×"
				</button>
				{move || match selected() {
					Some(detail) => detail_view(detail, graph).into_any(),
					None => view! { <p class="empty">"Click a node to see its contents."</p> }.into_any(),
				}}
			</aside>
		</Show>
	}
}

fn detail_view(detail: NodeDetail, graph: GraphHandle) -> impl IntoView {
	let backlinks = detail
		.backlinks
		.into_iter()
		.map(|link| {
			let id = link.source;
			view! {
				<li>
					<a
						href="#"
						on:click=move |ev| {
							ev.prevent_default();
							open_node(graph, id.clone());
						}
					>
						{link.title}
					</a>
				</li>
			}
		})
		.collect_view();

	view! {
		<h2>{detail.title}</h2>
		<div class="node-body" inner_html=detail.body />
		<h3>"Backlinks"</h3>
		<ul class="backlinks">{backlinks}</ul>
	}
}
