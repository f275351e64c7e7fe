//! Id-keyed graph storage with copy-on-write snapshots.
//!
//! Nodes live in an insertion-ordered arena keyed by [`NodeId`]; edges only
//! hold endpoint ids and are resolved against the arena when read. Every
//! mutation that changes content installs a new [`GraphSnapshot`], and calls
//! that turn out to be no-ops keep the current `Rc` untouched, so consumers can
//! skip work with `Rc::ptr_eq`.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use log::debug;

use super::error::EdgeRejected;
use super::types::{EdgeId, NodeId, Point};

/// A graph vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Stable key, never reused within a store.
	pub id: NodeId,
	/// Display label. Cosmetic only, never used as a key.
	pub name: String,
	/// Initial or last committed position. The live position is owned by the
	/// simulation.
	pub position: Point,
}

/// A connection between two distinct nodes, stored by endpoint id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Stable key, never reused within a store.
	pub id: EdgeId,
	/// One endpoint. Edges are undirected; source and target only fix the order.
	pub source_id: NodeId,
	/// The other endpoint.
	pub target_id: NodeId,
}

impl Edge {
	/// True if `node` is either endpoint.
	pub fn touches(&self, node: &NodeId) -> bool {
		&self.source_id == node || &self.target_id == node
	}
}

/// An edge with both endpoints looked up in the snapshot it came from.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedEdge<'a> {
	/// The stored edge.
	pub edge: &'a Edge,
	/// Node behind `edge.source_id`.
	pub source: &'a Node,
	/// Node behind `edge.target_id`.
	pub target: &'a Node,
}

type PairKey = (NodeId, NodeId);

/// Unordered pair key: the same for `(a, b)` and `(b, a)`.
fn pair_key(a: &NodeId, b: &NodeId) -> PairKey {
	if a <= b {
		(a.clone(), b.clone())
	} else {
		(b.clone(), a.clone())
	}
}

/// Immutable view of the graph at one point in time.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
	nodes: IndexMap<NodeId, Node>,
	edges: IndexMap<EdgeId, Edge>,
	pairs: HashMap<PairKey, EdgeId>,
}

impl GraphSnapshot {
	/// Looks up a node.
	pub fn node(&self, id: &NodeId) -> Option<&Node> {
		self.nodes.get(id)
	}

	/// True if the node exists.
	pub fn contains_node(&self, id: &NodeId) -> bool {
		self.nodes.contains_key(id)
	}

	/// Looks up an edge, hiding it if either endpoint is gone.
	pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
		self.edges
			.get(id)
			.filter(|e| self.contains_node(&e.source_id) && self.contains_node(&e.target_id))
	}

	/// All nodes in insertion order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.values()
	}

	/// All edges whose endpoints exist, in insertion order.
	pub fn edges(&self) -> impl Iterator<Item = &Edge> {
		self.resolved_edges().map(|r| r.edge)
	}

	/// Edges paired with their endpoint nodes. Dangling edges are skipped.
	pub fn resolved_edges(&self) -> impl Iterator<Item = ResolvedEdge<'_>> {
		self.edges.values().filter_map(|edge| {
			Some(ResolvedEdge {
				edge,
				source: self.nodes.get(&edge.source_id)?,
				target: self.nodes.get(&edge.target_id)?,
			})
		})
	}

	/// The edge connecting `a` and `b` in either direction.
	pub fn edge_between(&self, a: &NodeId, b: &NodeId) -> Option<&Edge> {
		self.pairs
			.get(&pair_key(a, b))
			.and_then(|id| self.edge(id))
	}

	/// Resolved edges touching `node`.
	pub fn incident_edges<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
		self.edges().filter(move |e| e.touches(node))
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges with both endpoints present.
	pub fn edge_count(&self) -> usize {
		self.edges().count()
	}

	/// True when there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	fn check_edge(&self, source: &NodeId, target: &NodeId) -> Result<(), EdgeRejected> {
		if source == target {
			return Err(EdgeRejected::SelfLoop {
				node: source.to_string(),
			});
		}
		for endpoint in [source, target] {
			if !self.contains_node(endpoint) {
				return Err(EdgeRejected::MissingEndpoint {
					node: endpoint.to_string(),
				});
			}
		}
		if let Some(existing) = self.edge_between(source, target) {
			return Err(EdgeRejected::DuplicatePair {
				source_id: source.to_string(),
				target_id: target.to_string(),
				existing: existing.id.to_string(),
			});
		}
		Ok(())
	}

	fn insert_edge(&mut self, edge: Edge) {
		self.pairs
			.insert(pair_key(&edge.source_id, &edge.target_id), edge.id.clone());
		self.edges.insert(edge.id.clone(), edge);
	}

	fn remove_edge_entry(&mut self, id: &EdgeId) -> Option<Edge> {
		let edge = self.edges.shift_remove(id)?;
		let key = pair_key(&edge.source_id, &edge.target_id);
		if self.pairs.get(&key) == Some(id) {
			self.pairs.remove(&key);
		}
		Some(edge)
	}
}

/// Owner of the current snapshot and the id generators.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
	snapshot: Rc<GraphSnapshot>,
	last_node_id: u64,
	last_edge_id: u64,
}

impl GraphStore {
	/// Empty store; the first generated ids are "1".
	pub fn new() -> Self {
		Self::default()
	}

	/// The current snapshot. Cheap to clone and safe to hold across mutations.
	pub fn snapshot(&self) -> Rc<GraphSnapshot> {
		Rc::clone(&self.snapshot)
	}

	/// Borrow the current snapshot without bumping the refcount.
	pub fn current(&self) -> &GraphSnapshot {
		&self.snapshot
	}

	fn next_node_id(&mut self) -> NodeId {
		loop {
			// Wraps after u64::MAX; the contains check still keeps ids unique.
			self.last_node_id = self.last_node_id.wrapping_add(1);
			let id = NodeId(self.last_node_id.to_string());
			if !self.snapshot.nodes.contains_key(&id) {
				return id;
			}
		}
	}

	fn next_edge_id(&mut self) -> EdgeId {
		loop {
			self.last_edge_id = self.last_edge_id.wrapping_add(1);
			let id = EdgeId(self.last_edge_id.to_string());
			if !self.snapshot.edges.contains_key(&id) {
				return id;
			}
		}
	}

	/// Adds a node under a freshly generated id.
	pub fn add_node(&mut self, name: impl Into<String>, position: Point) -> NodeId {
		let id = self.next_node_id();
		let node = Node {
			id: id.clone(),
			name: name.into(),
			position,
		};
		debug!("store: add node {} ({:?})", id, node.name);
		Rc::make_mut(&mut self.snapshot)
			.nodes
			.insert(id.clone(), node);
		id
	}

	/// Adds a node under an existing id, as read from a document.
	///
	/// Returns `false` if the id is already taken. The generator skips past
	/// numeric ids so later [`add_node`](Self::add_node) calls cannot clash.
	pub fn restore_node(&mut self, id: NodeId, name: impl Into<String>, position: Point) -> bool {
		if self.snapshot.nodes.contains_key(&id) {
			return false;
		}
		if let Ok(n) = id.as_str().parse::<u64>() {
			self.last_node_id = self.last_node_id.max(n);
		}
		let node = Node {
			id: id.clone(),
			name: name.into(),
			position,
		};
		Rc::make_mut(&mut self.snapshot).nodes.insert(id, node);
		true
	}

	/// Changes a node's label. Returns `false` if the node is missing or the name is unchanged.
	pub fn rename_node(&mut self, id: &NodeId, name: &str) -> bool {
		match self.snapshot.nodes.get(id) {
			Some(node) if node.name != name => {}
			_ => return false,
		}
		if let Some(node) = Rc::make_mut(&mut self.snapshot).nodes.get_mut(id) {
			debug!("store: rename node {} to {:?}", id, name);
			node.name = name.to_string();
		}
		true
	}

	/// Removes a node and every edge incident to it.
	pub fn remove_node(&mut self, id: &NodeId) -> bool {
		if !self.snapshot.nodes.contains_key(id) {
			return false;
		}
		let snapshot = Rc::make_mut(&mut self.snapshot);
		snapshot.nodes.shift_remove(id);
		let incident: Vec<EdgeId> = snapshot
			.edges
			.values()
			.filter(|e| e.touches(id))
			.map(|e| e.id.clone())
			.collect();
		for edge in &incident {
			snapshot.remove_edge_entry(edge);
		}
		debug!(
			"store: remove node {} and {} incident edge(s)",
			id,
			incident.len()
		);
		true
	}

	/// Connects two distinct, existing, not-yet-connected nodes.
	pub fn add_edge(&mut self, source: &NodeId, target: &NodeId) -> Result<EdgeId, EdgeRejected> {
		self.snapshot.check_edge(source, target)?;
		let id = self.next_edge_id();
		debug!("store: add edge {} ({} -> {})", id, source, target);
		Rc::make_mut(&mut self.snapshot).insert_edge(Edge {
			id: id.clone(),
			source_id: source.clone(),
			target_id: target.clone(),
		});
		Ok(id)
	}

	/// Adds an edge under an existing id, as read from a document.
	pub fn restore_edge(
		&mut self,
		id: EdgeId,
		source: NodeId,
		target: NodeId,
	) -> Result<(), EdgeRejected> {
		if self.snapshot.edges.contains_key(&id) {
			return Err(EdgeRejected::DuplicateId { edge: id.to_string() });
		}
		self.snapshot.check_edge(&source, &target)?;
		if let Ok(n) = id.as_str().parse::<u64>() {
			self.last_edge_id = self.last_edge_id.max(n);
		}
		Rc::make_mut(&mut self.snapshot).insert_edge(Edge {
			id,
			source_id: source,
			target_id: target,
		});
		Ok(())
	}

	/// Removes one edge, leaving both endpoints.
	pub fn remove_edge(&mut self, id: &EdgeId) -> bool {
		if !self.snapshot.edges.contains_key(id) {
			return false;
		}
		debug!("store: remove edge {}", id);
		Rc::make_mut(&mut self.snapshot).remove_edge_entry(id);
		true
	}

	/// Writes live positions back onto the stored nodes. Unknown ids are
	/// ignored; nothing is replaced if no position actually changed.
	pub fn set_positions<'a>(&mut self, positions: impl IntoIterator<Item = (&'a NodeId, Point)>) {
		let changed: Vec<(&NodeId, Point)> = positions
			.into_iter()
			.filter(|(id, p)| {
				self.snapshot
					.nodes
					.get(*id)
					.is_some_and(|n| n.position != *p)
			})
			.collect();
		if changed.is_empty() {
			return;
		}
		let snapshot = Rc::make_mut(&mut self.snapshot);
		for (id, p) in changed {
			if let Some(node) = snapshot.nodes.get_mut(id) {
				node.position = p;
			}
		}
	}
}
