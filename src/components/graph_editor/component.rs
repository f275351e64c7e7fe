//! Leptos component wrapping the editor canvas.
//!
//! The component owns a canvas element, translates mouse and keyboard input
//! into [`InteractionEvent`]s (in graph coordinates), and drives a
//! `requestAnimationFrame` loop that ticks the layout and redraws when
//! something changed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlAnchorElement, HtmlCanvasElement, KeyboardEvent,
	MouseEvent, WheelEvent, Window,
};

use super::codec::DEFAULT_FILE_NAME;
use super::controller::{InteractionEvent, Key, NamePrompt, PointerTarget};
use super::render::{self, Viewport};
use super::state::{EditorState, ViewTransform};
use super::theme::Theme;
use super::types::Point;

/// Screen distance a press may travel before it stops counting as a click.
const CLICK_SLOP: f64 = 3.0;

/// Background pan in progress.
#[derive(Clone, Debug, Default)]
struct PanState {
	active: bool,
	start_x: f64,
	start_y: f64,
	transform_start_x: f64,
	transform_start_y: f64,
}

/// Editor state plus everything the canvas needs to present it.
struct EditorContext {
	editor: EditorState,
	transform: ViewTransform,
	theme: Theme,
	pan: PanState,
	width: f64,
	height: f64,
	/// Screen position of the current press, if the button is down.
	press: Option<(f64, f64)>,
	/// Set once the current press has moved far enough to not be a click.
	moved: bool,
}

impl EditorContext {
	fn to_graph(&self, x: f64, y: f64) -> Point {
		self.transform.screen_to_graph(x, y)
	}

	fn track_press(&mut self, x: f64, y: f64) {
		if let Some((px, py)) = self.press {
			if (x - px).hypot(y - py) > CLICK_SLOP {
				self.moved = true;
			}
		}
	}

	fn draw(&self, ctx: &CanvasRenderingContext2d) {
		let viewport = Viewport {
			width: self.width,
			height: self.height,
			transform: &self.transform,
		};
		render::render(
			ctx,
			&self.editor.frame(),
			&viewport,
			self.editor.simulator().config().node_radius,
			&self.theme,
			self.editor.notice(),
		);
	}
}

type SharedContext = Rc<RefCell<Option<EditorContext>>>;

/// Asks for a node name with the browser's `prompt()` dialog.
struct BrowserPrompt;

impl NamePrompt for BrowserPrompt {
	fn prompt_name(&mut self, current: &str) -> Option<String> {
		web_sys::window()?
			.prompt_with_message_and_default("Node name", current)
			.ok()
			.flatten()
	}
}

/// The animation loop: one `requestAnimationFrame` callback that re-requests
/// itself, plus the handle of the frame currently pending.
///
/// Dropping the loop stops it.
struct FrameLoop {
	callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	fn start(context: SharedContext, ctx: CanvasRenderingContext2d) -> Option<Self> {
		let window: Window = web_sys::window()?;
		let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let pending = Rc::new(Cell::new(None));
		let (callback_inner, pending_inner) = (callback.clone(), pending.clone());

		*callback.borrow_mut() = Some(Closure::new(move || {
			pending_inner.set(None);
			if let Some(ref mut c) = *context.borrow_mut() {
				if !c.editor.is_settled() && c.editor.tick().settled {
					debug!("frame loop: layout settled");
				}
				if c.editor.take_dirty() {
					c.draw(&ctx);
				}
			}
			if let (Some(cb), Some(win)) = (&*callback_inner.borrow(), web_sys::window()) {
				if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
					pending_inner.set(Some(id));
				}
			}
		}));

		if let Some(ref cb) = *callback.borrow() {
			let id = window.request_animation_frame(cb.as_ref().unchecked_ref()).ok()?;
			pending.set(Some(id));
		}
		info!("frame loop: started");
		Some(Self { callback, pending })
	}

	fn stop(&self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		if self.callback.borrow_mut().take().is_some() {
			info!("frame loop: stopped");
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

/// A listener on `window` that detaches itself when dropped.
struct WindowListener {
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
	fn install(event: &'static str, handler: impl FnMut(Event) + 'static) -> Option<Self> {
		let window = web_sys::window()?;
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		window
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.ok()?;
		Some(Self { event, callback })
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
		}
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Offers `text` to the user as a download through a throwaway anchor.
fn download_document(text: &str) -> Option<()> {
	let document = web_sys::window()?.document()?;
	let anchor: HtmlAnchorElement = document.create_element("a").ok()?.dyn_into().ok()?;
	let encoded: String = js_sys::encode_uri_component(text).into();
	anchor.set_href(&format!("data:application/json;charset=utf-8,{encoded}"));
	anchor.set_download(DEFAULT_FILE_NAME);
	anchor.click();
	Some(())
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive graph editor on a canvas.
///
/// `document` carries the JSON of the graph to edit; each new value replaces
/// the whole graph and restarts the layout. The component sizes itself to its
/// parent container by default; set `fullscreen = true` to fill the viewport
/// and resize with the window.
#[component]
pub fn GraphEditorCanvas(
	#[prop(into)] document: Signal<Option<String>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let frame_loop: Rc<RefCell<Option<FrameLoop>>> = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Vec<WindowListener>>> = Rc::new(RefCell::new(Vec::new()));
	let context_init = context.clone();

	Effect::new(move |_| {
		let text = document.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		// Replacing the graph starts from a clean loop.
		frame_loop.borrow_mut().take();

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("editor: canvas has no 2d context");
			return;
		};

		let mut editor = EditorState::new(w, h);
		if let Some(text) = text {
			if let Ok(report) = editor.load_document(&text) {
				if report.dropped_nodes + report.dropped_edges > 0 {
					warn!(
						"editor: dropped {} nodes and {} edges while loading",
						report.dropped_nodes, report.dropped_edges
					);
				}
			}
		}

		*context_init.borrow_mut() = Some(EditorContext {
			editor,
			transform: ViewTransform::default(),
			theme: Theme::default(),
			pan: PanState::default(),
			width: w,
			height: h,
			press: None,
			moved: false,
		});

		let mut installed = listeners.borrow_mut();
		if installed.is_empty() {
			let context_key = context_init.clone();
			installed.extend(WindowListener::install("keydown", move |ev: Event| {
				let Some(ev) = ev.dyn_ref::<KeyboardEvent>() else {
					return;
				};
				if ev.key() != "Delete" {
					return;
				}
				if let Some(ref mut c) = *context_key.borrow_mut() {
					c.editor.dispatch(InteractionEvent::Key(Key::Delete), &mut BrowserPrompt);
				}
			}));

			if fullscreen {
				let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
				installed.extend(WindowListener::install("resize", move |_: Event| {
					let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
						return;
					};
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					if let Some(ref mut c) = *context_resize.borrow_mut() {
						c.width = nw;
						c.height = nh;
						c.editor.resize(nw, nh);
					}
				}));
			}
		}

		*frame_loop.borrow_mut() = FrameLoop::start(context_init.clone(), ctx);
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.editor.clear_notice();
			c.press = Some((x, y));
			c.moved = false;

			let at = c.to_graph(x, y);
			match c.editor.target_at(at) {
				PointerTarget::Node(node) => {
					c.editor.dispatch(InteractionEvent::DragStart { node, at }, &mut BrowserPrompt);
				}
				_ => {
					c.pan = PanState {
						active: true,
						start_x: x,
						start_y: y,
						transform_start_x: c.transform.x,
						transform_start_y: c.transform.y,
					};
				}
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.track_press(x, y);
			if c.editor.is_dragging() {
				let at = c.to_graph(x, y);
				c.editor.dispatch(InteractionEvent::DragMove { at }, &mut BrowserPrompt);
			} else if c.pan.active {
				c.transform.x = c.pan.transform_start_x + (x - c.pan.start_x);
				c.transform.y = c.pan.transform_start_y + (y - c.pan.start_y);
				c.editor.mark_dirty();
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.editor.is_dragging() {
				let at = c.to_graph(x, y);
				c.editor.dispatch(InteractionEvent::DragEnd { at }, &mut BrowserPrompt);
			}
			c.pan.active = false;
			c.press = None;
		}
	};

	let context_cl = context.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_cl.borrow_mut() {
			// The press was a drag or a pan, not a click.
			if std::mem::take(&mut c.moved) {
				return;
			}
			let at = c.to_graph(x, y);
			let target = c.editor.target_at(at);
			c.editor.dispatch(InteractionEvent::Click { target, at }, &mut BrowserPrompt);
		}
	};

	let context_dc = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_dc.borrow_mut() {
			let at = c.to_graph(x, y);
			let target = c.editor.target_at(at);
			c.editor.dispatch(InteractionEvent::DoubleClick { target, at }, &mut BrowserPrompt);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |ev: MouseEvent| {
		let point = canvas_point(canvas_ref, &ev);
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let (true, Some((x, y))) = (c.editor.is_dragging(), point) {
				let at = c.to_graph(x, y);
				c.editor.dispatch(InteractionEvent::DragEnd { at }, &mut BrowserPrompt);
			}
			c.pan.active = false;
			c.press = None;
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.transform.zoom_at(x, y, factor);
			c.editor.mark_dirty();
		}
	};

	let context_sv = context.clone();
	let on_save = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_sv.borrow_mut() {
			match c.editor.save_document() {
				Ok(text) => {
					if download_document(&text).is_none() {
						warn!("editor: could not start download");
					}
				}
				Err(err) => warn!("editor: save failed: {}", err),
			}
		}
	};

	view! {
		<button class="graph-save" on:click=on_save>
			"Save"
		</button>
		<canvas
			node_ref=canvas_ref
			class="graph-editor-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:click=on_click
			on:dblclick=on_dblclick
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: default;"
		/>
	}
}
