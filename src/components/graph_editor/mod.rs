//! Interactive graph editor.
//!
//! An editable node/edge graph on an HTML canvas with:
//! - A copy-on-write [`GraphStore`](store::GraphStore) that rejects self-loops,
//!   dangling endpoints, and a second edge between the same two nodes
//! - Force-directed auto-layout that cools down and stops on its own
//! - Click to select, double-click to create or rename, drag to move, and
//!   drop a node near another to link them
//! - Delete key removal, with node removal taking incident edges along
//! - JSON save and load
//!
//! # Example
//!
//! ```ignore
//! use graph_sketch::GraphEditorCanvas;
//!
//! let document = Signal::derive(|| Some(r#"{"nodes": [], "edges": []}"#.to_string()));
//! view! { <GraphEditorCanvas document=document fullscreen=true /> }
//! ```

pub mod codec;
mod component;
pub mod controller;
pub mod error;
mod render;
pub mod simulation;
pub mod state;
pub mod store;
pub mod theme;
pub mod types;

pub use codec::{LoadReport, LoadedGraph};
pub use component::GraphEditorCanvas;
pub use controller::{InteractionController, InteractionEvent, InteractionState, Key, PointerTarget};
pub use error::{CodecError, EdgeRejected};
pub use simulation::{ForceSimulator, SimulationConfig, SimulationState};
pub use state::{EditorState, ViewTransform};
pub use store::{GraphSnapshot, GraphStore};
pub use theme::Theme;
pub use types::{EdgeId, Frame, GraphDocument, NodeId, Point};
