//! graph-sketch: interactive graph editor with force-directed auto-layout.
//!
//! This crate provides a WASM-based canvas component for building graphs by
//! hand: create and rename nodes, link them by dropping one near another,
//! delete with the Delete key, and save or load the result as JSON. A physics
//! layout keeps everything spread out and settles when nothing is moving.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::graph_editor::{
	CodecError, EdgeRejected, EditorState, GraphDocument, GraphEditorCanvas, GraphStore, NodeId,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-sketch: logging initialized");
}

/// Reads the initial document from a script element with id="graph-data".
/// Parsing happens in the editor, which reports a malformed document itself.
fn load_graph_document() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let text = script.text().ok()?;
	if text.trim().is_empty() {
		return None;
	}
	info!("graph-sketch: found {} bytes of graph data", text.len());
	Some(text)
}

/// Main application component.
/// Loads the initial graph from the DOM and renders the editor.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let initial = load_graph_document();
	let document = Signal::derive(move || initial.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Graph Sketch" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<GraphEditorCanvas document=document fullscreen=true />
			<div class="graph-overlay">
				<h1>"Graph Sketch"</h1>
				<p class="subtitle">
					"Double-click to add or rename. Drop a node near another to link. Delete removes the selection."
				</p>
			</div>
		</div>
	}
}
