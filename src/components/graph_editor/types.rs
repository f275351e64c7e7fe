//! Shared value types: identifiers, points, the persisted document shape, and
//! the per-tick frame handed to the renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque node identifier. Unique within a store and never reassigned.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Opaque edge identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl NodeId {
	/// The id text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl EdgeId {
	/// The id text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Display for EdgeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

impl From<&str> for EdgeId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

/// A position in graph (world) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downward.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// A node as it appears in a saved document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
	/// Node id, kept as-is on load.
	pub id: NodeId,
	/// Display label.
	pub name: String,
	/// Saved position. Missing on input means "place on the ring".
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<f64>,
	/// See `x`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub y: Option<f64>,
}

/// An edge as it appears in a saved document. Only endpoint ids are stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEdge {
	/// Edge id, kept as-is on load.
	pub id: EdgeId,
	/// Written as `sourceId`.
	pub source_id: NodeId,
	/// Written as `targetId`.
	pub target_id: NodeId,
}

/// Complete persisted graph: `{ "nodes": [...], "edges": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
	/// Nodes in store order.
	pub nodes: Vec<DocumentNode>,
	/// Edges in store order.
	pub edges: Vec<DocumentEdge>,
}

/// A node ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameNode {
	/// Node drawn.
	pub id: NodeId,
	/// Live x in graph coordinates.
	pub x: f64,
	/// Live y in graph coordinates.
	pub y: f64,
	/// Label text.
	pub name: String,
	/// Drawn with the selection ring.
	pub selected: bool,
}

/// An edge ready to draw, with both endpoints already resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameEdge {
	/// Edge drawn.
	pub id: EdgeId,
	/// Source x.
	pub x1: f64,
	/// Source y.
	pub y1: f64,
	/// Target x.
	pub x2: f64,
	/// Target y.
	pub y2: f64,
	/// Drawn dashed in the selection color.
	pub selected: bool,
}

/// Everything the renderer needs for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	/// Nodes, drawn after edges.
	pub nodes: Vec<FrameNode>,
	/// Edges with both endpoints present.
	pub edges: Vec<FrameEdge>,
}
