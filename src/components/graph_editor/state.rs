//! Editor state: the store, the layout, and the gesture controller wired
//! together, plus the view transform the canvas draws through.
//!
//! [`EditorState`] is the only thing the component talks to. Events go in
//! through [`dispatch`](EditorState::dispatch), the layout advances through
//! [`tick`](EditorState::tick), and the renderer reads a [`Frame`] back out.

use log::{info, warn};

use super::codec::{self, LoadReport};
use super::controller::{
	InteractionConfig, InteractionController, InteractionEvent, InteractionState, NamePrompt,
	PointerTarget, Workspace,
};
use super::error::CodecResult;
use super::simulation::{ForceSimulator, SimulationConfig, SimulationState, TickOutcome};
use super::store::{GraphStore, Node};
use super::types::{Frame, FrameEdge, FrameNode, Point};

/// How far (in graph units) from an edge's line a click still hits it.
pub const EDGE_HIT_TOLERANCE: f64 = 6.0;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	/// Horizontal pan in screen pixels.
	pub x: f64,
	/// Vertical pan in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Maps a canvas pixel to graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zooms by `factor` keeping the graph point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	if len2 == 0.0 {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Graph, layout, and interaction state for one canvas.
pub struct EditorState {
	store: GraphStore,
	simulator: ForceSimulator,
	layout: SimulationState,
	controller: InteractionController,
	notice: Option<String>,
	dirty: bool,
}

impl EditorState {
	/// Empty editor for a canvas of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self::from_store(GraphStore::new(), width, height)
	}

	/// Editor over an existing store with default tuning.
	pub fn from_store(store: GraphStore, width: f64, height: f64) -> Self {
		Self::with_config(
			store,
			SimulationConfig::default(),
			InteractionConfig::default(),
			width,
			height,
		)
	}

	/// Editor with explicit layout and gesture tuning.
	pub fn with_config(
		store: GraphStore,
		simulation: SimulationConfig,
		interaction: InteractionConfig,
		width: f64,
		height: f64,
	) -> Self {
		Self {
			store,
			simulator: ForceSimulator::new(simulation, width, height),
			layout: SimulationState::new(),
			controller: InteractionController::new(interaction),
			notice: None,
			dirty: true,
		}
	}

	/// Graph content.
	pub fn store(&self) -> &GraphStore {
		&self.store
	}

	/// Layout tuning and bounds.
	pub fn simulator(&self) -> &ForceSimulator {
		&self.simulator
	}

	/// Live positions and alpha.
	pub fn layout(&self) -> &SimulationState {
		&self.layout
	}

	/// Current selection or drag.
	pub fn interaction(&self) -> &InteractionState {
		self.controller.state()
	}

	/// True while a node is held.
	pub fn is_dragging(&self) -> bool {
		matches!(self.controller.state(), InteractionState::Dragging { .. })
	}

	/// Feeds one renderer event to the controller.
	pub fn dispatch(&mut self, event: InteractionEvent, prompt: &mut dyn NamePrompt) {
		self.controller.handle(
			event,
			Workspace {
				store: &mut self.store,
				simulator: &self.simulator,
				layout: &mut self.layout,
				prompt,
			},
		);
		self.dirty = true;
	}

	/// Advances the layout one step against the current snapshot.
	pub fn tick(&mut self) -> TickOutcome {
		let snapshot = self.store.snapshot();
		let outcome = self.simulator.tick(&mut self.layout, &snapshot);
		if !outcome.settled {
			self.dirty = true;
		}
		outcome
	}

	/// True when ticking would do nothing until the next change.
	pub fn is_settled(&self) -> bool {
		!self.layout.needs_sync(&self.store.snapshot()) && self.simulator.is_settled(&self.layout)
	}

	/// Moves the layout bounds and warms the layout so bodies re-center.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.simulator.resize(width, height);
		self.layout.nudge(0.3);
		self.dirty = true;
	}

	/// Requests a redraw, e.g. after a pan or zoom.
	pub fn mark_dirty(&mut self) {
		self.dirty = true;
	}

	/// Returns whether a redraw is due and clears the flag.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::take(&mut self.dirty)
	}

	/// User-visible message from the last failed operation.
	pub fn notice(&self) -> Option<&str> {
		self.notice.as_deref()
	}

	/// Hides the notice banner.
	pub fn clear_notice(&mut self) {
		if self.notice.take().is_some() {
			self.dirty = true;
		}
	}

	fn position_of(&self, node: &Node) -> Point {
		self.layout.position(&node.id).unwrap_or(node.position)
	}

	/// Positions and selection flags for every visible node and edge.
	pub fn frame(&self) -> Frame {
		let snapshot = self.store.current();
		let nodes = snapshot
			.nodes()
			.map(|n| {
				let p = self.position_of(n);
				FrameNode {
					id: n.id.clone(),
					x: p.x,
					y: p.y,
					name: n.name.clone(),
					selected: self.controller.is_node_selected(&n.id),
				}
			})
			.collect();
		let edges = snapshot
			.resolved_edges()
			.map(|r| {
				let (a, b) = (self.position_of(r.source), self.position_of(r.target));
				FrameEdge {
					id: r.edge.id.clone(),
					x1: a.x,
					y1: a.y,
					x2: b.x,
					y2: b.y,
					selected: self.controller.is_edge_selected(&r.edge.id),
				}
			})
			.collect();
		Frame { nodes, edges }
	}

	/// Hit-tests a graph-space point. Nodes win over edges; among overlapping
	/// nodes the closest center wins.
	pub fn target_at(&self, p: Point) -> PointerTarget {
		let snapshot = self.store.current();
		let radius = self.simulator.config().node_radius;
		let node = snapshot
			.nodes()
			.map(|n| (n, p.distance(self.position_of(n))))
			.filter(|(_, d)| *d <= radius)
			.min_by(|a, b| a.1.total_cmp(&b.1));
		if let Some((n, _)) = node {
			return PointerTarget::Node(n.id.clone());
		}
		let edge = snapshot
			.resolved_edges()
			.map(|r| {
				let d = distance_to_segment(p, self.position_of(r.source), self.position_of(r.target));
				(r.edge, d)
			})
			.filter(|(_, d)| *d <= EDGE_HIT_TOLERANCE)
			.min_by(|a, b| a.1.total_cmp(&b.1));
		match edge {
			Some((e, _)) => PointerTarget::Edge(e.id.clone()),
			None => PointerTarget::Canvas,
		}
	}

	/// Replaces the whole graph with the document in `text`.
	///
	/// On failure nothing changes except the notice.
	pub fn load_document(&mut self, text: &str) -> CodecResult<LoadReport> {
		match codec::load(text, self.simulator.center()) {
			Ok(loaded) => {
				self.store = loaded.store;
				self.layout = SimulationState::new();
				self.controller.reset();
				self.notice = None;
				self.dirty = true;
				Ok(loaded.report)
			}
			Err(err) => {
				warn!("editor: load failed: {}", err);
				self.notice = Some(err.to_string());
				self.dirty = true;
				Err(err)
			}
		}
	}

	/// Commits live positions to the store and serializes it.
	pub fn save_document(&mut self) -> CodecResult<String> {
		self.store.set_positions(self.layout.positions());
		let text = codec::save(self.store.current())?;
		info!("editor: document ready as {}", codec::DEFAULT_FILE_NAME);
		Ok(text)
	}
}
