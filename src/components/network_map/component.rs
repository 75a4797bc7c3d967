use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::config::MapConfig;
use super::filter::VisibleLinks;
use super::render;
use super::state::MapState;
use super::types::{NetworkGraph, RELATIONSHIP_TOGGLES};
use super::viewport::{DeltaMode, Point};

const LOADING_HINT: &str =
	"Depending on the size of your network this can take somewhere between 10 seconds and 2 minutes.";

/// Mesh topology view: a "Load map" prompt, a spinner while a scan runs, or
/// the filter row and the interactive map once a snapshot has nodes.
#[component]
pub fn NetworkMap(
	#[prop(into)] graph: Signal<NetworkGraph>,
	#[prop(into)] is_loading: Signal<bool>,
	#[prop(into)] on_request: Callback<()>,
	#[prop(optional)] config: MapConfig,
) -> impl IntoView {
	let visible = RwSignal::new(VisibleLinks::default());
	let has_nodes = move || graph.with(|g| !g.is_empty());

	view! {
		<div class="network-map">
			<Show
				when=has_nodes
				fallback=move || view! { <MapMessage is_loading=is_loading on_request=on_request /> }
			>
				<MapControls visible=visible on_request=on_request />
				<MapCanvas graph=graph visible=visible config=config.clone() />
			</Show>
		</div>
	}
}

#[component]
fn MapMessage(is_loading: Signal<bool>, on_request: Callback<()>) -> impl IntoView {
	view! {
		<div class="map-message">
			{move || {
				if is_loading.get() {
					view! {
						<div>
							<div class="spinner" />
							<div>{LOADING_HINT}</div>
						</div>
					}
						.into_any()
				} else {
					view! {
						<button class="btn btn-primary" on:click=move |_| on_request.run(())>
							"Load map"
						</button>
					}
						.into_any()
				}
			}}
		</div>
	}
}

#[component]
fn MapControls(visible: RwSignal<VisibleLinks>, on_request: Callback<()>) -> impl IntoView {
	let toggles = RELATIONSHIP_TOGGLES
		.iter()
		.map(|toggle| {
			let rel = toggle.relationship;
			view! {
				<div class="form-check form-check-inline">
					<input
						class="form-check-input"
						type="checkbox"
						id=toggle.title
						prop:checked=move || visible.with(|v| v.contains(rel))
						on:change=move |ev| {
							let checked = event_target_checked(&ev);
							visible.update(|v| v.set(rel, checked));
						}
					/>
					<label class="form-check-label" for=toggle.title>
						{toggle.title}
					</label>
				</div>
			}
		})
		.collect_view();

	view! {
		<div class="map-controls">
			{toggles}
			<button title="Refresh data" class="btn btn-primary btn-sm" on:click=move |_| on_request.run(())>
				"Refresh"
			</button>
		</div>
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// The canvas and its animation-frame loop. Size is read from the parent
/// once at mount; unmounting stops the loop and disposes the layout.
#[component]
fn MapCanvas(
	graph: Signal<NetworkGraph>,
	visible: RwSignal<VisibleLinks>,
	config: MapConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<MapState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let stopped = Arc::new(AtomicBool::new(false));

	let stopped_cleanup = stopped.clone();
	on_cleanup(move || stopped_cleanup.store(true, Ordering::Relaxed));

	let (state_init, animate_init) = (state.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.filter(|&(w, h)| w > 0.0 && h > 0.0)
			.unwrap_or((800.0, 600.0));
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			error!("network map: canvas has no 2d context");
			return;
		};
		info!("network map mounted at {}x{}", w, h);
		*state_init.borrow_mut() = Some(MapState::new(
			&graph.get_untracked(),
			visible.get_untracked(),
			w,
			h,
			config.clone(),
		));

		let (state_anim, animate_inner, stopped_anim) =
			(state_init.clone(), animate_init.clone(), stopped.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if stopped_anim.load(Ordering::Relaxed) {
				if let Some(mut s) = state_anim.borrow_mut().take() {
					s.dispose();
				}
				// breaks the closure's reference to itself
				animate_inner.borrow_mut().take();
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				let (w, h) = (s.width, s.height);
				render::paint(s.tick(), &ctx, w, h);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_graph = state.clone();
	Effect::new(move |prev: Option<()>| {
		graph.with(|snapshot| {
			if prev.is_some() {
				if let Some(ref mut s) = *state_graph.borrow_mut() {
					s.set_snapshot(snapshot);
				}
			}
		});
	});

	let state_filter = state.clone();
	Effect::new(move |_| {
		let v = visible.get();
		if let Some(ref mut s) = *state_filter.borrow_mut() {
			s.set_visible(v);
		}
	});

	let local_point = move |ev: &MouseEvent| -> Option<Point> {
		let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some(Point::new(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let (Some(at), Some(s)) = (local_point(&ev), state_md.borrow_mut().as_mut()) {
			s.pointer_down(at);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let (Some(at), Some(s)) = (local_point(&ev), state_mm.borrow_mut().as_mut()) {
			s.pointer_move(at);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(s) = state_mu.borrow_mut().as_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mouse: &MouseEvent = &ev;
		if let (Some(at), Some(s)) = (local_point(mouse), state_wh.borrow_mut().as_mut()) {
			s.wheel(ev.delta_y(), DeltaMode::from(ev.delta_mode()), at);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
