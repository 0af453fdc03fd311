use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use web_sys::{HtmlElement, MouseEvent, WheelEvent};

use super::GraphHandle;
use crate::api::HttpClient;
use crate::graph::{DomContainer, GraphManager};

/// Longest simulated step per frame, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

fn animate(manager: GraphManager<HttpClient>, running: StoredValue<bool>, last: f64) {
	request_animation_frame(move || {
		if !running.try_get_value().unwrap_or(false) {
			return;
		}
		let now = js_sys::Date::now();
		let dt = ((now - last) / 1000.0).clamp(0.0, MAX_FRAME_DT);
		manager.frame(dt as f32);
		animate(manager, running, now);
	});
}

/// Host element for the active renderer, with pointer interaction wired up.
#[component]
pub fn GraphView(graph: GraphHandle) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let running = StoredValue::new(false);

	Effect::new(move |_| {
		let Some(host) = host_ref.get() else {
			return;
		};
		if running.get_value() {
			return;
		}
		let Some(manager) = graph.try_get_value() else {
			return;
		};
		let host: HtmlElement = host.into();
		running.set_value(true);
		info!("mounting graph view");

		let attaching = manager.clone();
		spawn_local(async move {
			if let Err(e) = attaching.attach(Box::new(DomContainer::new(host))).await {
				error!("initial graph render failed: {}", e);
			}
		});
		animate(manager, running, js_sys::Date::now());
	});

	let resize = window_event_listener(ev::resize, move |_| {
		graph.with_value(|m| m.resize());
	});

	on_cleanup(move || {
		running.set_value(false);
		resize.remove();
		graph.try_with_value(|m| m.detach());
	});

	let local = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let host: HtmlElement = host_ref.get()?.into();
		let rect = host.get_bounding_client_rect();
		Some((ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()))
	};

	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local(&ev) {
			graph.with_value(|m| m.pointer_down(x, y));
		}
	};
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = local(&ev) {
			graph.with_value(|m| m.pointer_move(x, y));
		}
	};
	// click handlers may read the handle again
	let on_mouseup = move |ev: MouseEvent| {
		if let (Some((x, y)), Some(m)) = (local(&ev), graph.try_get_value()) {
			m.pointer_up(x, y);
		}
	};
	let on_mouseleave = move |_: MouseEvent| {
		graph.with_value(|m| m.pointer_leave());
	};
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mouse: &MouseEvent = &ev;
		if let Some((x, y)) = local(mouse) {
			graph.with_value(|m| m.wheel(x, y, ev.delta_y()));
		}
	};

	view! {
		<div
			node_ref=host_ref
			class="graph-host"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="position: absolute; inset: 0; cursor: grab;"
		/>
	}
}
