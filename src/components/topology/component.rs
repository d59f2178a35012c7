//! Leptos component wrapping the topology canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, and zooming. An animation loop runs via
//! `requestAnimationFrame`, stepping the layout and drawing the bound view each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::SharedTopology;
use super::render;
use super::scale::ScaleConfig;
use super::state::CanvasState;
use super::theme::Theme;

/// Fixed simulation step per animation frame.
const FRAME_DT: f32 = 0.016;

/// Canvas interaction state with visual configuration.
struct Surface {
	state: CanvasState,
	scale: ScaleConfig,
	theme: Theme,
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn event_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders the live topology on a canvas element.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes. Explicit
/// `width`/`height` override automatic sizing.
#[component]
pub fn TopologyCanvas(
	topology: SharedTopology,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let surface: Rc<RefCell<Option<Surface>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (surface_init, animate_init, resize_cb_init, topology_init) = (
		surface.clone(),
		animate.clone(),
		resize_cb.clone(),
		topology.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let parent_size = |client: fn(&web_sys::Element) -> i32, fallback: f64| {
			canvas
				.parent_element()
				.map(|p| client(&p) as f64)
				.unwrap_or(fallback)
		};
		let (w, h) = match (fullscreen, viewport_size(&window)) {
			(true, Some(size)) => size,
			_ => (
				width.unwrap_or_else(|| parent_size(web_sys::Element::client_width, 800.0)),
				height.unwrap_or_else(|| parent_size(web_sys::Element::client_height, 600.0)),
			),
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("net-topology: canvas has no 2d context");
			return;
		};

		let theme = topology_init
			.borrow()
			.config()
			.theme
			.as_deref()
			.and_then(Theme::by_name)
			.unwrap_or_default();
		*surface_init.borrow_mut() = Some(Surface {
			state: CanvasState::new(w, h),
			scale: ScaleConfig::default(),
			theme,
		});

		if fullscreen {
			let (surface_resize, canvas_resize) = (surface_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *surface_resize.borrow_mut() {
					s.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (surface_anim, topology_anim, animate_inner) =
			(surface_init.clone(), topology_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			topology_anim.borrow_mut().tick(FRAME_DT);
			if let Some(ref s) = *surface_anim.borrow() {
				render::render(topology_anim.borrow().view(), &s.state, &ctx, &s.scale, &s.theme);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (surface_md, topology_md) = (surface.clone(), topology.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = event_position(&canvas.into(), &ev);

		if let Some(ref mut s) = *surface_md.borrow_mut() {
			let (gx, gy) = s.state.screen_to_graph(x, y);
			let hit_radius = s.state.hit_radius(&s.scale);
			let hit = topology_md
				.borrow()
				.view()
				.node_at(gx, gy, hit_radius)
				.map(|g| g.key.clone());
			match hit {
				Some(id) => {
					topology_md.borrow_mut().drag_start(&id);
					s.state.drag.node = Some(id);
				}
				None => s.state.begin_pan(x, y),
			}
		}
	};

	let (surface_mm, topology_mm) = (surface.clone(), topology.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = event_position(&canvas.into(), &ev);

		if let Some(ref mut s) = *surface_mm.borrow_mut() {
			match s.state.drag.node.as_deref() {
				Some(id) => {
					let (gx, gy) = s.state.screen_to_graph(x, y);
					topology_mm.borrow_mut().drag(id, gx, gy);
				}
				None => s.state.pan_to(x, y),
			}
		}
	};

	let (surface_mu, topology_mu) = (surface.clone(), topology.clone());
	let release = move || {
		if let Some(ref mut s) = *surface_mu.borrow_mut() {
			if let Some(id) = s.state.drag.node.take() {
				topology_mu.borrow_mut().drag_end(&id);
			}
			s.state.pan.active = false;
		}
	};
	let release_ml = release.clone();
	let on_mouseup = move |_: MouseEvent| release();
	let on_mouseleave = move |_: MouseEvent| release_ml();

	let surface_wh = surface.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = event_position(&canvas.into(), &ev);

		if let Some(ref mut s) = *surface_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let (min_k, max_k) = (s.scale.min_k, s.scale.max_k);
			s.state.zoom_at(x, y, factor, min_k, max_k);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="topology-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
