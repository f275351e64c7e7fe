//! Gesture state machine.
//!
//! The renderer reports clicks, double-clicks, drags, and the Delete key as
//! [`InteractionEvent`]s, already hit-tested to a [`PointerTarget`]. The
//! controller owns selection and drag state and turns those events into store
//! mutations, pins, and alpha changes.

use log::{debug, info};

use super::simulation::{ForceSimulator, SimulationState};
use super::store::GraphStore;
use super::types::{EdgeId, NodeId, Point};

/// What the pointer was over when an event fired.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
	/// Empty background.
	Canvas,
	/// A node, nodes taking precedence over edges.
	Node(NodeId),
	/// An edge line.
	Edge(EdgeId),
}

/// Keys the editor reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
	/// Delete or Backspace.
	Delete,
}

/// Input from the renderer, in graph coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
	/// Single click that did not turn into a drag.
	Click {
		/// What was under the pointer.
		target: PointerTarget,
		/// Pointer position.
		at: Point,
	},
	/// Double click. On the canvas this creates a node, on a node it renames.
	DoubleClick {
		/// What was under the pointer.
		target: PointerTarget,
		/// Pointer position.
		at: Point,
	},
	/// Pointer pressed on a node and started moving.
	DragStart {
		/// The grabbed node.
		node: NodeId,
		/// Pointer position at the press.
		at: Point,
	},
	/// Pointer moved while a node is held.
	DragMove {
		/// Current pointer position.
		at: Point,
	},
	/// Pointer released after a drag.
	DragEnd {
		/// Release position.
		at: Point,
	},
	/// A key press.
	Key(Key),
}

/// Selection outside of a drag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	/// Nothing selected.
	#[default]
	None,
	/// A selected node.
	Node(NodeId),
	/// A selected edge.
	Edge(EdgeId),
}

/// Controller state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
	/// No selection, no drag.
	#[default]
	Idle,
	/// One node is selected and Delete would remove it.
	NodeSelected(NodeId),
	/// One edge is selected and Delete would remove it.
	EdgeSelected(EdgeId),
	/// A node is held by the pointer.
	Dragging {
		/// The pinned node.
		node: NodeId,
		/// Selection restored on release.
		resume: Selection,
	},
}

impl From<Selection> for InteractionState {
	fn from(selection: Selection) -> Self {
		match selection {
			Selection::None => Self::Idle,
			Selection::Node(id) => Self::NodeSelected(id),
			Selection::Edge(id) => Self::EdgeSelected(id),
		}
	}
}

/// Asks the user for a new node name. `None` means cancelled.
pub trait NamePrompt {
	/// Shows `current` as the default answer and returns the user's input.
	fn prompt_name(&mut self, current: &str) -> Option<String>;
}

impl<F> NamePrompt for F
where
	F: FnMut(&str) -> Option<String>,
{
	fn prompt_name(&mut self, current: &str) -> Option<String> {
		self(current)
	}
}

/// Tuning for gesture handling.
#[derive(Clone, Debug)]
pub struct InteractionConfig {
	/// Releasing a dragged node closer than this to another node links them.
	pub link_proximity: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			link_proximity: 100.0,
		}
	}
}

/// Everything an event may touch, borrowed for the duration of one event.
pub struct Workspace<'a> {
	/// Graph content.
	pub store: &'a mut GraphStore,
	/// Layout tuning and bounds.
	pub simulator: &'a ForceSimulator,
	/// Live positions, pins, and alpha.
	pub layout: &'a mut SimulationState,
	/// Source of node names.
	pub prompt: &'a mut dyn NamePrompt,
}

/// Turns renderer events into graph edits.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	config: InteractionConfig,
	state: InteractionState,
}

impl InteractionController {
	/// Idle controller.
	pub fn new(config: InteractionConfig) -> Self {
		Self {
			config,
			state: InteractionState::Idle,
		}
	}

	/// Current selection or drag.
	pub fn state(&self) -> &InteractionState {
		&self.state
	}

	/// Gesture tuning.
	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}

	/// Drops any selection or drag without touching the graph.
	pub fn reset(&mut self) {
		self.state = InteractionState::Idle;
	}

	/// True for the selected node, including one selected before a drag began.
	pub fn is_node_selected(&self, id: &NodeId) -> bool {
		match &self.state {
			InteractionState::NodeSelected(n) => n == id,
			InteractionState::Dragging {
				resume: Selection::Node(n),
				..
			} => n == id,
			_ => false,
		}
	}

	/// Edge counterpart of [`is_node_selected`](Self::is_node_selected).
	pub fn is_edge_selected(&self, id: &EdgeId) -> bool {
		match &self.state {
			InteractionState::EdgeSelected(e) => e == id,
			InteractionState::Dragging {
				resume: Selection::Edge(e),
				..
			} => e == id,
			_ => false,
		}
	}

	/// Single entry point for all interaction.
	pub fn handle(&mut self, event: InteractionEvent, ws: Workspace<'_>) {
		match event {
			InteractionEvent::Click { target, .. } => self.click(target, ws),
			InteractionEvent::DoubleClick { target, at } => self.double_click(target, at, ws),
			InteractionEvent::DragStart { node, .. } => self.drag_start(node, ws),
			InteractionEvent::DragMove { at } => self.drag_move(at, ws),
			InteractionEvent::DragEnd { .. } => self.drag_end(ws),
			InteractionEvent::Key(Key::Delete) => self.delete_selected(ws),
		}
	}

	fn click(&mut self, target: PointerTarget, mut ws: Workspace<'_>) {
		// A click while still dragging means the release was lost.
		if let InteractionState::Dragging { node, .. } = &self.state {
			info!("controller: drag on {} was never released, recovering", node);
			let node = node.clone();
			ws.layout.unpin(&node);
			ws.layout.set_alpha_target(0.0);
		}
		self.state = match target {
			PointerTarget::Canvas => InteractionState::Idle,
			PointerTarget::Node(id) => InteractionState::NodeSelected(id),
			PointerTarget::Edge(id) => InteractionState::EdgeSelected(id),
		};
	}

	fn double_click(&mut self, target: PointerTarget, at: Point, mut ws: Workspace<'_>) {
		match target {
			PointerTarget::Node(id) => {
				let Some(current) = ws.store.current().node(&id).map(|n| n.name.clone()) else {
					return;
				};
				let Some(name) = ws.prompt.prompt_name(&current) else {
					return;
				};
				let name = name.trim();
				if !name.is_empty() && ws.store.rename_node(&id, name) {
					info!("controller: renamed node {} to {:?}", id, name);
				}
			}
			PointerTarget::Canvas => {
				let name = format!("Node {}", ws.store.current().node_count() + 1);
				let id = ws.store.add_node(name, at);
				info!("controller: created node {} at ({:.0}, {:.0})", id, at.x, at.y);
			}
			PointerTarget::Edge(_) => {}
		}
	}

	fn drag_start(&mut self, node: NodeId, mut ws: Workspace<'_>) {
		let resume = match std::mem::take(&mut self.state) {
			InteractionState::Idle => Selection::None,
			InteractionState::NodeSelected(id) => Selection::Node(id),
			InteractionState::EdgeSelected(id) => Selection::Edge(id),
			InteractionState::Dragging { node: stale, resume } => {
				debug!("controller: abandoning stale drag on {}", stale);
				ws.layout.unpin(&stale);
				ws.layout.set_alpha_target(0.0);
				resume
			}
		};

		let snapshot = ws.store.snapshot();
		ws.layout.sync(&snapshot);
		let Some(at) = ws.layout.position(&node) else {
			self.state = resume.into();
			return;
		};
		ws.layout.pin(&node, at);
		ws.layout
			.set_alpha_target(ws.simulator.config().drag_alpha_target);
		debug!("controller: drag start on {}", node);
		self.state = InteractionState::Dragging { node, resume };
	}

	fn drag_move(&mut self, at: Point, mut ws: Workspace<'_>) {
		if let InteractionState::Dragging { node, .. } = &self.state {
			ws.layout.pin(node, ws.simulator.clamp(at));
		}
	}

	fn drag_end(&mut self, mut ws: Workspace<'_>) {
		let (node, resume) = match std::mem::take(&mut self.state) {
			InteractionState::Dragging { node, resume } => (node, resume),
			other => {
				self.state = other;
				return;
			}
		};
		let released_at = ws.layout.pinned(&node).or_else(|| ws.layout.position(&node));
		ws.layout.unpin(&node);
		if let Some(at) = released_at {
			self.link_nearest(&node, at, ws.store, ws.layout);
		}
		ws.layout.set_alpha_target(0.0);
		debug!("controller: drag end on {}", node);
		self.state = resume.into();
	}

	/// Links `node` to the single nearest other node if it is close enough and
	/// not already connected.
	fn link_nearest(
		&self,
		node: &NodeId,
		at: Point,
		store: &mut GraphStore,
		layout: &SimulationState,
	) {
		let nearest = layout
			.positions()
			.filter(|(id, _)| *id != node)
			.map(|(id, p)| (id, at.distance(p)))
			.min_by(|a, b| a.1.total_cmp(&b.1));
		let Some((other, distance)) = nearest else {
			return;
		};
		if distance >= self.config.link_proximity {
			return;
		}
		if store.current().edge_between(node, other).is_some() {
			return;
		}
		match store.add_edge(node, other) {
			Ok(edge) => info!(
				"controller: linked {} and {} by proximity (edge {})",
				node, other, edge
			),
			Err(rejected) => debug!("controller: proximity link rejected: {}", rejected),
		}
	}

	fn delete_selected(&mut self, mut ws: Workspace<'_>) {
		match &self.state {
			InteractionState::NodeSelected(id) => {
				if ws.store.remove_node(id) {
					info!("controller: deleted node {}", id);
				}
			}
			InteractionState::EdgeSelected(id) => {
				if ws.store.remove_edge(id) {
					info!("controller: deleted edge {}", id);
				}
			}
			InteractionState::Idle | InteractionState::Dragging { .. } => return,
		}
		self.state = InteractionState::Idle;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_editor::simulation::SimulationConfig;

	struct Rig {
		store: GraphStore,
		simulator: ForceSimulator,
		layout: SimulationState,
		controller: InteractionController,
	}

	impl Rig {
		fn new() -> Self {
			Self {
				store: GraphStore::new(),
				simulator: ForceSimulator::new(SimulationConfig::default(), 800.0, 600.0),
				layout: SimulationState::new(),
				controller: InteractionController::default(),
			}
		}

		fn send_with(&mut self, event: InteractionEvent, mut prompt: impl FnMut(&str) -> Option<String>) {
			self.controller.handle(
				event,
				Workspace {
					store: &mut self.store,
					simulator: &self.simulator,
					layout: &mut self.layout,
					prompt: &mut prompt,
				},
			);
		}

		fn send(&mut self, event: InteractionEvent) {
			self.send_with(event, |_| None);
		}
	}

	fn click(target: PointerTarget) -> InteractionEvent {
		InteractionEvent::Click {
			target,
			at: Point::default(),
		}
	}

	#[test]
	fn clicks_move_selection_between_targets() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::new(100.0, 100.0));
		let b = rig.store.add_node("b", Point::new(300.0, 100.0));
		let e = rig.store.add_edge(&a, &b).unwrap();

		rig.send(click(PointerTarget::Node(a.clone())));
		assert_eq!(rig.controller.state(), &InteractionState::NodeSelected(a.clone()));
		rig.send(click(PointerTarget::Edge(e.clone())));
		assert_eq!(rig.controller.state(), &InteractionState::EdgeSelected(e));
		rig.send(click(PointerTarget::Canvas));
		assert_eq!(rig.controller.state(), &InteractionState::Idle);
	}

	#[test]
	fn double_click_on_canvas_creates_numbered_node() {
		let mut rig = Rig::new();
		rig.send(InteractionEvent::DoubleClick {
			target: PointerTarget::Canvas,
			at: Point::new(120.0, 80.0),
		});
		rig.send(InteractionEvent::DoubleClick {
			target: PointerTarget::Canvas,
			at: Point::new(220.0, 80.0),
		});
		let names: Vec<String> = rig.store.current().nodes().map(|n| n.name.clone()).collect();
		assert_eq!(names, vec!["Node 1", "Node 2"]);
		let first = rig.store.current().nodes().next().unwrap();
		assert_eq!(first.position, Point::new(120.0, 80.0));
		assert_eq!(rig.controller.state(), &InteractionState::Idle);
	}

	#[test]
	fn double_click_on_node_renames_only_when_confirmed_and_different() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("Node 1", Point::default());
		rig.send(click(PointerTarget::Node(a.clone())));
		let dbl = InteractionEvent::DoubleClick {
			target: PointerTarget::Node(a.clone()),
			at: Point::default(),
		};

		let before = rig.store.snapshot();
		rig.send_with(dbl.clone(), |_| None);
		rig.send_with(dbl.clone(), |current| Some(current.to_string()));
		rig.send_with(dbl.clone(), |_| Some("   ".into()));
		assert!(std::rc::Rc::ptr_eq(&before, &rig.store.snapshot()));

		rig.send_with(dbl, |_| Some("  Start ".into()));
		assert_eq!(rig.store.current().node(&a).unwrap().name, "Start");
		assert_eq!(rig.controller.state(), &InteractionState::NodeSelected(a));
	}

	#[test]
	fn delete_removes_selected_node_with_its_edges() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::new(100.0, 100.0));
		let b = rig.store.add_node("b", Point::new(300.0, 100.0));
		let c = rig.store.add_node("c", Point::new(300.0, 300.0));
		rig.store.add_edge(&a, &b).unwrap();
		rig.store.add_edge(&c, &a).unwrap();
		let bc = rig.store.add_edge(&b, &c).unwrap();

		rig.send(click(PointerTarget::Node(a.clone())));
		rig.send(InteractionEvent::Key(Key::Delete));

		let snap = rig.store.current();
		assert!(!snap.contains_node(&a));
		assert_eq!(snap.node_count(), 2);
		assert_eq!(snap.edges().map(|e| e.id.clone()).collect::<Vec<_>>(), vec![bc]);
		assert_eq!(rig.controller.state(), &InteractionState::Idle);
	}

	#[test]
	fn delete_removes_selected_edge_only() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::default());
		let b = rig.store.add_node("b", Point::default());
		let e = rig.store.add_edge(&a, &b).unwrap();
		rig.send(click(PointerTarget::Edge(e)));
		rig.send(InteractionEvent::Key(Key::Delete));
		assert_eq!(rig.store.current().edge_count(), 0);
		assert_eq!(rig.store.current().node_count(), 2);
		assert_eq!(rig.controller.state(), &InteractionState::Idle);
	}

	#[test]
	fn delete_is_ignored_while_idle() {
		let mut rig = Rig::new();
		rig.store.add_node("a", Point::default());
		let before = rig.store.snapshot();
		rig.send(InteractionEvent::Key(Key::Delete));
		assert!(std::rc::Rc::ptr_eq(&before, &rig.store.snapshot()));
	}

	#[test]
	fn drag_pins_then_releases_and_restores_selection() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::new(100.0, 100.0));
		let b = rig.store.add_node("b", Point::new(500.0, 400.0));
		rig.send(click(PointerTarget::Node(b.clone())));

		rig.send(InteractionEvent::DragStart {
			node: a.clone(),
			at: Point::new(100.0, 100.0),
		});
		assert_eq!(rig.layout.pinned(&a), Some(Point::new(100.0, 100.0)));
		assert!((rig.layout.alpha_target() - 0.3).abs() < 1e-12);
		assert!(rig.controller.is_node_selected(&b));

		rig.send(InteractionEvent::DragMove {
			at: Point::new(-50.0, 2_000.0),
		});
		assert_eq!(rig.layout.pinned(&a), Some(Point::new(40.0, 560.0)));

		rig.send(InteractionEvent::DragEnd {
			at: Point::new(-50.0, 2_000.0),
		});
		assert_eq!(rig.layout.pinned(&a), None);
		assert_eq!(rig.layout.alpha_target(), 0.0);
		assert_eq!(rig.controller.state(), &InteractionState::NodeSelected(b));
		assert_eq!(rig.store.current().edge_count(), 0);
	}

	#[test]
	fn releasing_near_a_node_links_only_the_nearest() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::new(100.0, 100.0));
		let b = rig.store.add_node("b", Point::new(400.0, 300.0));
		let c = rig.store.add_node("c", Point::new(460.0, 300.0));

		rig.send(InteractionEvent::DragStart {
			node: a.clone(),
			at: Point::new(100.0, 100.0),
		});
		rig.send(InteractionEvent::DragMove {
			at: Point::new(390.0, 300.0),
		});
		rig.send(InteractionEvent::DragEnd {
			at: Point::new(390.0, 300.0),
		});

		let snap = rig.store.current();
		assert_eq!(snap.edge_count(), 1);
		assert!(snap.edge_between(&a, &b).is_some());
		assert!(snap.edge_between(&a, &c).is_none());

		// Releasing next to b again neither duplicates the edge nor falls
		// through to c.
		rig.send(InteractionEvent::DragStart {
			node: a.clone(),
			at: Point::new(100.0, 100.0),
		});
		rig.send(InteractionEvent::DragMove {
			at: Point::new(395.0, 300.0),
		});
		rig.send(InteractionEvent::DragEnd {
			at: Point::new(395.0, 300.0),
		});
		assert_eq!(rig.store.current().edge_count(), 1);
	}

	#[test]
	fn releasing_far_from_everything_creates_nothing() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::new(100.0, 100.0));
		rig.store.add_node("b", Point::new(400.0, 300.0));
		rig.send(InteractionEvent::DragStart {
			node: a,
			at: Point::new(100.0, 100.0),
		});
		rig.send(InteractionEvent::DragMove {
			at: Point::new(300.0, 300.0),
		});
		rig.send(InteractionEvent::DragEnd {
			at: Point::new(300.0, 300.0),
		});
		assert_eq!(rig.store.current().edge_count(), 0);
	}

	#[test]
	fn click_recovers_from_a_lost_release() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::new(100.0, 100.0));
		rig.store.add_node("b", Point::new(150.0, 100.0));
		rig.send(InteractionEvent::DragStart {
			node: a.clone(),
			at: Point::new(100.0, 100.0),
		});
		rig.send(click(PointerTarget::Canvas));

		assert_eq!(rig.controller.state(), &InteractionState::Idle);
		assert_eq!(rig.layout.pinned(&a), None);
		assert_eq!(rig.layout.alpha_target(), 0.0);
		// Recovery does not run the proximity link.
		assert_eq!(rig.store.current().edge_count(), 0);
	}

	#[test]
	fn second_drag_start_releases_the_stale_pin() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::new(100.0, 100.0));
		let b = rig.store.add_node("b", Point::new(400.0, 100.0));
		rig.send(InteractionEvent::DragStart {
			node: a.clone(),
			at: Point::default(),
		});
		rig.send(InteractionEvent::DragStart {
			node: b.clone(),
			at: Point::default(),
		});
		assert_eq!(rig.layout.pinned(&a), None);
		assert!(rig.layout.pinned(&b).is_some());
		assert_eq!(
			rig.controller.state(),
			&InteractionState::Dragging {
				node: b,
				resume: Selection::None
			}
		);
	}

	#[test]
	fn drag_events_outside_a_drag_are_ignored() {
		let mut rig = Rig::new();
		let a = rig.store.add_node("a", Point::new(100.0, 100.0));
		rig.send(click(PointerTarget::Node(a.clone())));
		rig.send(InteractionEvent::DragMove {
			at: Point::new(10.0, 10.0),
		});
		rig.send(InteractionEvent::DragEnd {
			at: Point::new(10.0, 10.0),
		});
		rig.send(InteractionEvent::DragStart {
			node: NodeId::from("missing"),
			at: Point::default(),
		});
		assert_eq!(rig.controller.state(), &InteractionState::NodeSelected(a));
	}

	#[test]
	fn stale_drag_cools_even_when_the_new_drag_misses() {
		let mut rig = Rig::new();
		rig.send(InteractionEvent::DoubleClick {
			target: PointerTarget::Canvas,
			at: Point::new(300.0, 300.0),
		});
		let first = NodeId::from("1");
		rig.send(InteractionEvent::DragStart {
			node: first.clone(),
			at: Point::new(300.0, 300.0),
		});
		rig.send(InteractionEvent::DragStart {
			node: NodeId::from("ghost"),
			at: Point::default(),
		});

		assert_eq!(rig.controller.state(), &InteractionState::Idle);
		assert_eq!(rig.layout.pinned(&first), None);
		assert_eq!(rig.layout.alpha_target(), 0.0);

		let snapshot = rig.store.snapshot();
		let settled = (0..2_000).any(|_| rig.simulator.tick(&mut rig.layout, &snapshot).settled);
		assert!(settled);
	}

	#[test]
	fn proximity_link_needs_strictly_less_than_the_threshold() {
		for (gap, linked) in [(100.0, false), (99.9, true)] {
			let mut rig = Rig::new();
			let a = rig.store.add_node("a", Point::new(100.0, 100.0));
			let b = rig.store.add_node("b", Point::new(400.0, 300.0));
			let drop_at = Point::new(400.0 - gap, 300.0);

			rig.send(InteractionEvent::DragStart {
				node: a.clone(),
				at: Point::new(100.0, 100.0),
			});
			rig.send(InteractionEvent::DragMove { at: drop_at });
			rig.send(InteractionEvent::DragEnd { at: drop_at });

			assert_eq!(
				rig.store.current().edge_between(&a, &b).is_some(),
				linked,
				"release {gap} units away"
			);
		}
	}
}
