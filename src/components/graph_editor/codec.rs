//! JSON persistence for graph content.
//!
//! Documents carry node ids, names, and positions, and edges as bare
//! `sourceId`/`targetId` pairs. Loading is all-or-nothing at the syntax level
//! and forgiving at the record level: a malformed document is an error, while
//! individual records that would break a store invariant are dropped and
//! counted.

use std::f64::consts::PI;

use log::{info, warn};

use super::error::{CodecError, CodecResult};
use super::store::{GraphSnapshot, GraphStore};
use super::types::{DocumentEdge, DocumentNode, GraphDocument, Point};

/// File name offered when saving.
pub const DEFAULT_FILE_NAME: &str = "graph.json";

/// Radius of the ring that position-less nodes are laid out on.
const RING_RADIUS: f64 = 100.0;

/// What a load had to throw away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
	/// Nodes skipped for reusing an earlier id.
	pub dropped_nodes: usize,
	/// Edges skipped as self-loops, dangling, or duplicates.
	pub dropped_edges: usize,
}

/// A freshly built store plus the record-level fallout of building it.
#[derive(Debug)]
pub struct LoadedGraph {
	/// The rebuilt graph.
	pub store: GraphStore,
	/// What was dropped on the way.
	pub report: LoadReport,
}

/// Converts a snapshot into its document form.
pub fn to_document(snapshot: &GraphSnapshot) -> GraphDocument {
	GraphDocument {
		nodes: snapshot
			.nodes()
			.map(|n| DocumentNode {
				id: n.id.clone(),
				name: n.name.clone(),
				x: Some(n.position.x),
				y: Some(n.position.y),
			})
			.collect(),
		edges: snapshot
			.edges()
			.map(|e| DocumentEdge {
				id: e.id.clone(),
				source_id: e.source_id.clone(),
				target_id: e.target_id.clone(),
			})
			.collect(),
	}
}

/// Builds a store from a document, dropping records that do not fit.
///
/// Nodes without coordinates are spread on a ring around `center`.
pub fn from_document(document: GraphDocument, center: Point) -> LoadedGraph {
	let mut store = GraphStore::new();
	let mut report = LoadReport::default();
	let count = document.nodes.len().max(1) as f64;

	for (i, node) in document.nodes.into_iter().enumerate() {
		let position = match (node.x, node.y) {
			(Some(x), Some(y)) if x.is_finite() && y.is_finite() => Point::new(x, y),
			_ => {
				let angle = i as f64 * 2.0 * PI / count;
				Point::new(
					center.x + RING_RADIUS * angle.cos(),
					center.y + RING_RADIUS * angle.sin(),
				)
			}
		};
		if !store.restore_node(node.id.clone(), node.name, position) {
			warn!("codec: duplicate node id {}, keeping the first", node.id);
			report.dropped_nodes += 1;
		}
	}

	for edge in document.edges {
		let id = edge.id.clone();
		if let Err(rejected) = store.restore_edge(edge.id, edge.source_id, edge.target_id) {
			warn!("codec: dropping edge {}: {}", id, rejected);
			report.dropped_edges += 1;
		}
	}

	LoadedGraph { store, report }
}

/// Serializes the snapshot as pretty-printed JSON.
pub fn save(snapshot: &GraphSnapshot) -> CodecResult<String> {
	let text = serde_json::to_string_pretty(&to_document(snapshot)).map_err(CodecError::Serialize)?;
	info!(
		"codec: saved {} nodes, {} edges",
		snapshot.node_count(),
		snapshot.edge_count()
	);
	Ok(text)
}

/// Parses a document into a new store. Fails only if the text is not a graph
/// document at all.
pub fn load(text: &str, center: Point) -> CodecResult<LoadedGraph> {
	let document: GraphDocument = serde_json::from_str(text).map_err(CodecError::Parse)?;
	let loaded = from_document(document, center);
	info!(
		"codec: loaded {} nodes, {} edges ({} nodes and {} edges dropped)",
		loaded.store.current().node_count(),
		loaded.store.current().edge_count(),
		loaded.report.dropped_nodes,
		loaded.report.dropped_edges
	);
	Ok(loaded)
}
