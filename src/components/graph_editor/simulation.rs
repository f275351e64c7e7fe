//! Force-directed layout.
//!
//! [`ForceSimulator`] holds the tuning and canvas bounds; all mutable physics
//! lives in a [`SimulationState`] that the caller passes to every
//! [`tick`](ForceSimulator::tick). Each tick first syncs the state against the
//! latest store snapshot (bodies are matched by node id), then applies link,
//! charge, collision, and centering forces scaled by the decaying `alpha`, and
//! finally integrates velocities and clamps every body into the canvas.
//!
//! Pinned bodies are placed exactly on their pin after integration but still
//! push and pull on everything else.

use std::collections::HashMap;
use std::rc::Rc;

use super::store::GraphSnapshot;
use super::types::{EdgeId, NodeId, Point};

/// Magnitude of the separation used when two bodies sit on the same spot.
const JIGGLE: f64 = 1e-6;

/// Golden angle in radians, used to spread jiggle directions across pairs.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Tuning for the layout forces and the cooling schedule.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
	/// Rest length of every edge spring.
	pub link_distance: f64,
	/// Pairwise charge. Negative values repel. The push between two bodies is
	/// `|charge_strength| * alpha / d²`.
	pub charge_strength: f64,
	/// Inside this distance the charge fades linearly to zero instead of
	/// growing without bound.
	pub charge_distance_min: f64,
	/// Collision radius per node. Centers are kept `2 * node_radius` apart.
	pub node_radius: f64,
	/// Fraction of an overlap resolved per tick.
	pub collide_strength: f64,
	/// Pull toward the canvas midpoint, applied per axis.
	pub center_strength: f64,
	/// Distance from each canvas edge that bodies are clamped to.
	pub boundary_margin: f64,
	/// Below this alpha (with no target) the layout counts as settled.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Hard cap on ticks after a reheat, for when alpha stalls above `alpha_min`.
	pub max_ticks: u32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 150.0,
			charge_strength: -500.0,
			charge_distance_min: 1.0,
			node_radius: 30.0,
			collide_strength: 1.0,
			center_strength: 0.1,
			boundary_margin: 40.0,
			alpha_min,
			// Reaches alpha_min in roughly 300 ticks from a full reheat.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			max_ticks: 600,
		}
	}
}

/// One simulated node.
#[derive(Clone, Debug)]
pub struct Body {
	/// Node this body tracks.
	pub id: NodeId,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Horizontal velocity, added to `x` each tick.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// When set, integration snaps the body here instead of moving it freely.
	pub pin: Option<Point>,
}

impl Body {
	fn at(id: NodeId, p: Point) -> Self {
		Self {
			id,
			x: p.x,
			y: p.y,
			vx: 0.0,
			vy: 0.0,
			pin: None,
		}
	}

	/// Current position.
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

#[derive(Clone, Copy, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target; the source takes the rest.
	bias: f64,
}

/// Result of a single tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickOutcome {
	/// Alpha after the step.
	pub alpha: f64,
	/// True once further ticks would not move anything meaningful.
	pub settled: bool,
}

/// Mutable physics state, rebuilt incrementally from store snapshots.
#[derive(Clone, Debug)]
pub struct SimulationState {
	bodies: Vec<Body>,
	index: HashMap<NodeId, usize>,
	links: Vec<Link>,
	edge_ids: Vec<EdgeId>,
	alpha: f64,
	alpha_target: f64,
	ticks: u32,
	synced: Option<Rc<GraphSnapshot>>,
}

impl Default for SimulationState {
	fn default() -> Self {
		Self {
			bodies: Vec::new(),
			index: HashMap::new(),
			links: Vec::new(),
			edge_ids: Vec::new(),
			alpha: 1.0,
			alpha_target: 0.0,
			ticks: 0,
			synced: None,
		}
	}
}

impl SimulationState {
	/// Empty layout. The first sync creates bodies and heats to alpha 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current heat. Forces scale with it.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Value alpha is cooling toward.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Full reheat: alpha back to 1.
	pub fn reheat(&mut self) {
		self.alpha = 1.0;
		self.ticks = 0;
	}

	/// Sets the level alpha decays toward, raising alpha immediately if it is
	/// below the new target.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
		if target > self.alpha {
			self.alpha = target;
		}
		self.ticks = 0;
	}

	/// Raises alpha to at least `alpha` without touching the target.
	pub fn nudge(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha);
		self.ticks = 0;
	}

	/// True when `snapshot` is not the one the bodies were last matched to.
	pub fn needs_sync(&self, snapshot: &Rc<GraphSnapshot>) -> bool {
		!self
			.synced
			.as_ref()
			.is_some_and(|seen| Rc::ptr_eq(seen, snapshot))
	}

	/// Holds a body at `at` until unpinned. Returns `false` for unknown ids.
	pub fn pin(&mut self, id: &NodeId, at: Point) -> bool {
		self.body_mut(id).map(|b| b.pin = Some(at)).is_some()
	}

	/// Releases a pin, keeping the body where it is.
	pub fn unpin(&mut self, id: &NodeId) -> bool {
		self.body_mut(id).map(|b| b.pin = None).is_some()
	}

	/// Where a body is pinned, if it is.
	pub fn pinned(&self, id: &NodeId) -> Option<Point> {
		self.body(id).and_then(|b| b.pin)
	}

	/// Live position of a node, if it has a body yet.
	pub fn position(&self, id: &NodeId) -> Option<Point> {
		self.body(id).map(Body::position)
	}

	/// Every live position in body order.
	pub fn positions(&self) -> impl Iterator<Item = (&NodeId, Point)> {
		self.bodies.iter().map(|b| (&b.id, b.position()))
	}

	/// All bodies, in node order as of the last sync.
	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// The body tracking `id`.
	pub fn body(&self, id: &NodeId) -> Option<&Body> {
		self.index.get(id).map(|&i| &self.bodies[i])
	}

	fn body_mut(&mut self, id: &NodeId) -> Option<&mut Body> {
		let i = *self.index.get(id)?;
		self.bodies.get_mut(i)
	}

	/// Matches bodies and links to `snapshot`. Returns true (and reheats) when
	/// the node or edge set changed. Cheap when the snapshot is the one last
	/// seen.
	pub fn sync(&mut self, snapshot: &Rc<GraphSnapshot>) -> bool {
		if !self.needs_sync(snapshot) {
			return false;
		}

		let mut previous: HashMap<NodeId, Body> = self
			.bodies
			.drain(..)
			.map(|b| (b.id.clone(), b))
			.collect();
		let nodes_changed = previous.len() != snapshot.node_count()
			|| snapshot.nodes().any(|n| !previous.contains_key(&n.id));

		self.bodies = snapshot
			.nodes()
			.map(|n| {
				previous
					.remove(&n.id)
					.unwrap_or_else(|| Body::at(n.id.clone(), n.position))
			})
			.collect();
		self.index = self
			.bodies
			.iter()
			.enumerate()
			.map(|(i, b)| (b.id.clone(), i))
			.collect();

		let edge_ids: Vec<EdgeId> = snapshot.edges().map(|e| e.id.clone()).collect();
		let edges_changed = edge_ids != self.edge_ids;

		let pairs: Vec<(usize, usize)> = snapshot
			.edges()
			.filter_map(|e| Some((*self.index.get(&e.source_id)?, *self.index.get(&e.target_id)?)))
			.collect();
		let mut degree = vec![0usize; self.bodies.len()];
		for &(s, t) in &pairs {
			degree[s] += 1;
			degree[t] += 1;
		}
		self.links = pairs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Link {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();
		self.edge_ids = edge_ids;
		self.synced = Some(Rc::clone(snapshot));

		let changed = nodes_changed || edges_changed;
		if changed {
			self.reheat();
		}
		changed
	}
}

/// Deterministic, antisymmetric offset from body `i` to body `j` for when the
/// two coincide.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
	let (lo, hi) = (i.min(j), i.max(j));
	let angle = (lo * 31 + hi * 17 + 1) as f64 * GOLDEN_ANGLE;
	let (dx, dy) = (JIGGLE * angle.cos(), JIGGLE * angle.sin());
	if i < j { (dx, dy) } else { (-dx, -dy) }
}

fn clamp_axis(v: f64, extent: f64, margin: f64) -> f64 {
	if extent <= 2.0 * margin {
		extent / 2.0
	} else {
		v.clamp(margin, extent - margin)
	}
}

/// Stateless force integrator bound to a canvas size.
#[derive(Clone, Debug)]
pub struct ForceSimulator {
	config: SimulationConfig,
	width: f64,
	height: f64,
}

impl ForceSimulator {
	/// Simulator for a canvas of the given size.
	pub fn new(config: SimulationConfig, width: f64, height: f64) -> Self {
		Self {
			config,
			width,
			height,
		}
	}

	/// Tuning in use.
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Canvas width.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Canvas height.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Midpoint that centering pulls toward.
	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// Moves the bounds. Bodies are clamped on the next tick.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Clamps a point into the boundary box.
	pub fn clamp(&self, p: Point) -> Point {
		let m = self.config.boundary_margin;
		Point::new(clamp_axis(p.x, self.width, m), clamp_axis(p.y, self.height, m))
	}

	/// True once alpha has cooled with no target, or the tick cap is hit.
	pub fn is_settled(&self, state: &SimulationState) -> bool {
		state.alpha_target < self.config.alpha_min
			&& (state.alpha < self.config.alpha_min || state.ticks >= self.config.max_ticks)
	}

	/// Advances the layout by one step against the latest snapshot.
	pub fn tick(&self, state: &mut SimulationState, snapshot: &Rc<GraphSnapshot>) -> TickOutcome {
		state.sync(snapshot);
		if self.is_settled(state) {
			return TickOutcome {
				alpha: state.alpha,
				settled: true,
			};
		}

		state.alpha += (state.alpha_target - state.alpha) * self.config.alpha_decay;
		state.ticks = state.ticks.saturating_add(1);

		if state.bodies.len() >= 2 {
			self.apply_links(state);
			self.apply_charge(state);
			self.apply_collision(state);
			self.apply_centering(state);
		}
		self.integrate(state);

		TickOutcome {
			alpha: state.alpha,
			settled: self.is_settled(state),
		}
	}

	fn apply_links(&self, state: &mut SimulationState) {
		let alpha = state.alpha;
		let bodies = &mut state.bodies;
		for link in &state.links {
			let (s, t) = (&bodies[link.source], &bodies[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = jiggle(link.source, link.target);
			}
			let l = (dx * dx + dy * dy).sqrt();
			let k = (l - self.config.link_distance) / l * alpha * link.strength;
			dx *= k;
			dy *= k;

			let target = &mut bodies[link.target];
			target.vx -= dx * link.bias;
			target.vy -= dy * link.bias;
			let source = &mut bodies[link.source];
			source.vx += dx * (1.0 - link.bias);
			source.vy += dy * (1.0 - link.bias);
		}
	}

	fn apply_charge(&self, state: &mut SimulationState) {
		let strength = self.config.charge_strength * state.alpha;
		if strength == 0.0 {
			return;
		}
		let min2 = self.config.charge_distance_min * self.config.charge_distance_min;
		let bodies = &mut state.bodies;
		let n = bodies.len();
		for i in 0..n {
			let (xi, yi) = (bodies[i].x, bodies[i].y);
			let (mut fx, mut fy) = (0.0, 0.0);
			for (j, other) in bodies.iter().enumerate() {
				if i == j {
					continue;
				}
				let (mut dx, mut dy) = (other.x - xi, other.y - yi);
				if dx == 0.0 && dy == 0.0 {
					(dx, dy) = jiggle(i, j);
				}
				// Inverse-square: the unit vector (dx, dy) / l scaled by 1 / l².
				let l2 = (dx * dx + dy * dy).max(min2);
				let w = strength / (l2 * l2.sqrt());
				fx += dx * w;
				fy += dy * w;
			}
			bodies[i].vx += fx;
			bodies[i].vy += fy;
		}
	}

	fn apply_collision(&self, state: &mut SimulationState) {
		let r = self.config.node_radius * 2.0;
		if r <= 0.0 || self.config.collide_strength == 0.0 {
			return;
		}
		let bodies = &mut state.bodies;
		let n = bodies.len();
		for i in 0..n {
			let (xi, yi) = (bodies[i].x + bodies[i].vx, bodies[i].y + bodies[i].vy);
			for j in (i + 1)..n {
				let mut dx = xi - (bodies[j].x + bodies[j].vx);
				let mut dy = yi - (bodies[j].y + bodies[j].vy);
				let mut l2 = dx * dx + dy * dy;
				if l2 >= r * r {
					continue;
				}
				if l2 == 0.0 {
					(dx, dy) = jiggle(j, i);
					l2 = dx * dx + dy * dy;
				}
				let l = l2.sqrt();
				let k = (r - l) / l * self.config.collide_strength;
				dx *= k;
				dy *= k;
				// Equal radii split the correction evenly.
				bodies[i].vx += dx * 0.5;
				bodies[i].vy += dy * 0.5;
				bodies[j].vx -= dx * 0.5;
				bodies[j].vy -= dy * 0.5;
			}
		}
	}

	fn apply_centering(&self, state: &mut SimulationState) {
		let k = self.config.center_strength * state.alpha;
		if k == 0.0 {
			return;
		}
		let mid = self.center();
		for b in &mut state.bodies {
			b.vx += (mid.x - b.x) * k;
			b.vy += (mid.y - b.y) * k;
		}
	}

	fn integrate(&self, state: &mut SimulationState) {
		let keep = 1.0 - self.config.velocity_decay;
		for b in &mut state.bodies {
			if let Some(p) = b.pin {
				b.x = p.x;
				b.y = p.y;
				b.vx = 0.0;
				b.vy = 0.0;
			} else {
				b.vx *= keep;
				b.vy *= keep;
				b.x += b.vx;
				b.y += b.vy;
			}

			let clamped = self.clamp(b.position());
			if clamped.x != b.x {
				b.x = clamped.x;
				b.vx = 0.0;
			}
			if clamped.y != b.y {
				b.y = clamped.y;
				b.vy = 0.0;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_editor::store::GraphStore;

	fn link_only() -> SimulationConfig {
		SimulationConfig {
			charge_strength: 0.0,
			node_radius: 0.0,
			center_strength: 0.0,
			..SimulationConfig::default()
		}
	}

	fn run_until_settled(sim: &ForceSimulator, state: &mut SimulationState, store: &GraphStore) {
		let snapshot = store.snapshot();
		for _ in 0..2_000 {
			if sim.tick(state, &snapshot).settled {
				return;
			}
		}
		panic!("simulation did not settle");
	}

	fn distance(state: &SimulationState, a: &NodeId, b: &NodeId) -> f64 {
		state.position(a).unwrap().distance(state.position(b).unwrap())
	}

	#[test]
	fn linked_pair_converges_to_rest_length() {
		for (start, gap) in [(300.0, 20.0), (100.0, 700.0), (400.0, 150.5)] {
			let mut store = GraphStore::new();
			let a = store.add_node("a", Point::new(start, 500.0));
			let b = store.add_node("b", Point::new(start + gap, 500.0));
			store.add_edge(&a, &b).unwrap();

			let sim = ForceSimulator::new(link_only(), 1000.0, 1000.0);
			let mut state = SimulationState::new();
			let snapshot = store.snapshot();
			let mut errors = Vec::new();
			loop {
				let outcome = sim.tick(&mut state, &snapshot);
				let err = (distance(&state, &a, &b) - 150.0).abs();
				assert!(err.is_finite());
				errors.push((outcome.alpha, err));
				if outcome.settled {
					break;
				}
			}

			let cooled: Vec<f64> = errors
				.iter()
				.filter(|(alpha, _)| *alpha < 0.1)
				.map(|(_, e)| *e)
				.collect();
			assert!(!cooled.is_empty());
			for w in cooled.windows(2) {
				assert!(w[1] <= w[0] + 1e-6, "error grew from {} to {}", w[0], w[1]);
			}
			assert!(errors.last().unwrap().1 < 1.0);
		}
	}

	#[test]
	fn coincident_bodies_separate_without_nan() {
		let mut store = GraphStore::new();
		let a = store.add_node("a", Point::new(200.0, 200.0));
		let b = store.add_node("b", Point::new(200.0, 200.0));
		let sim = ForceSimulator::new(SimulationConfig::default(), 400.0, 400.0);
		let mut state = SimulationState::new();
		let snapshot = store.snapshot();
		for _ in 0..50 {
			sim.tick(&mut state, &snapshot);
			for (_, p) in state.positions() {
				assert!(p.x.is_finite() && p.y.is_finite());
			}
		}
		assert!(distance(&state, &a, &b) > 1.0);
	}

	#[test]
	fn charge_falls_off_with_the_square_of_distance() {
		let config = SimulationConfig {
			node_radius: 0.0,
			center_strength: 0.0,
			velocity_decay: 0.0,
			..SimulationConfig::default()
		};
		let sim = ForceSimulator::new(config, 2000.0, 2000.0);
		let push = |gap: f64| {
			let mut store = GraphStore::new();
			let a = store.add_node("a", Point::new(1000.0 - gap / 2.0, 1000.0));
			store.add_node("b", Point::new(1000.0 + gap / 2.0, 1000.0));
			let mut state = SimulationState::new();
			sim.tick(&mut state, &store.snapshot());
			let body = state.body(&a).unwrap();
			assert_eq!(body.vy, 0.0);
			-body.vx
		};

		let (near, far) = (push(100.0), push(200.0));
		assert!(near > 0.0 && far > 0.0);
		assert!((near / far - 4.0).abs() < 1e-9, "ratio was {}", near / far);
	}

	#[test]
	fn empty_and_single_node_graphs_are_inert() {
		let sim = ForceSimulator::new(SimulationConfig::default(), 800.0, 600.0);

		let empty = GraphStore::new();
		let mut state = SimulationState::new();
		sim.tick(&mut state, &empty.snapshot());
		assert!(state.bodies().is_empty());

		let mut single = GraphStore::new();
		let a = single.add_node("a", Point::new(100.0, 100.0));
		let mut state = SimulationState::new();
		for _ in 0..20 {
			sim.tick(&mut state, &single.snapshot());
		}
		assert_eq!(state.position(&a), Some(Point::new(100.0, 100.0)));
	}

	#[test]
	fn pinned_body_holds_still_but_still_repels() {
		let mut store = GraphStore::new();
		let a = store.add_node("a", Point::new(300.0, 300.0));
		let b = store.add_node("b", Point::new(320.0, 300.0));
		let sim = ForceSimulator::new(SimulationConfig::default(), 800.0, 600.0);
		let mut state = SimulationState::new();
		let snapshot = store.snapshot();
		state.sync(&snapshot);
		assert!(state.pin(&a, Point::new(300.0, 300.0)));
		for _ in 0..30 {
			sim.tick(&mut state, &snapshot);
			assert_eq!(state.position(&a), Some(Point::new(300.0, 300.0)));
		}
		assert!(distance(&state, &a, &b) > 60.0);
	}

	#[test]
	fn bodies_stay_inside_the_margin() {
		let mut store = GraphStore::new();
		let ids: Vec<NodeId> = (0..30)
			.map(|i| store.add_node(format!("n{i}"), Point::new(-500.0 + i as f64, 5_000.0)))
			.collect();
		for pair in ids.windows(2) {
			store.add_edge(&pair[0], &pair[1]).unwrap();
		}
		let sim = ForceSimulator::new(SimulationConfig::default(), 500.0, 400.0);
		let mut state = SimulationState::new();
		let snapshot = store.snapshot();
		for _ in 0..100 {
			sim.tick(&mut state, &snapshot);
			for (_, p) in state.positions() {
				assert!((40.0..=460.0).contains(&p.x), "x out of bounds: {}", p.x);
				assert!((40.0..=360.0).contains(&p.y), "y out of bounds: {}", p.y);
			}
		}
	}

	#[test]
	fn drag_plateau_holds_alpha_until_released() {
		let mut store = GraphStore::new();
		store.add_node("a", Point::new(100.0, 100.0));
		store.add_node("b", Point::new(300.0, 100.0));
		let sim = ForceSimulator::new(SimulationConfig::default(), 800.0, 600.0);
		let mut state = SimulationState::new();
		run_until_settled(&sim, &mut state, &store);

		state.set_alpha_target(0.3);
		assert!((state.alpha() - 0.3).abs() < 1e-12);
		let snapshot = store.snapshot();
		for _ in 0..1_000 {
			assert!(!sim.tick(&mut state, &snapshot).settled);
		}
		assert!((state.alpha() - 0.3).abs() < 1e-6);

		state.set_alpha_target(0.0);
		run_until_settled(&sim, &mut state, &store);
		assert!(state.alpha() < 0.3);
	}

	#[test]
	fn structural_change_reheats() {
		let mut store = GraphStore::new();
		let a = store.add_node("a", Point::new(100.0, 100.0));
		let b = store.add_node("b", Point::new(300.0, 100.0));
		let sim = ForceSimulator::new(SimulationConfig::default(), 800.0, 600.0);
		let mut state = SimulationState::new();
		run_until_settled(&sim, &mut state, &store);

		store.rename_node(&a, "renamed");
		let outcome = sim.tick(&mut state, &store.snapshot());
		assert!(outcome.settled);

		store.add_edge(&a, &b).unwrap();
		let outcome = sim.tick(&mut state, &store.snapshot());
		assert!(!outcome.settled);
		assert!(outcome.alpha > 0.9);
	}

	#[test]
	fn sync_keeps_existing_bodies_by_id() {
		let mut store = GraphStore::new();
		let a = store.add_node("a", Point::new(100.0, 100.0));
		let mut state = SimulationState::new();
		state.sync(&store.snapshot());
		state.pin(&a, Point::new(50.0, 60.0));

		let b = store.add_node("b", Point::new(400.0, 400.0));
		assert!(state.sync(&store.snapshot()));
		assert_eq!(state.pinned(&a), Some(Point::new(50.0, 60.0)));
		assert_eq!(state.position(&b), Some(Point::new(400.0, 400.0)));

		store.remove_node(&a);
		state.sync(&store.snapshot());
		assert!(state.body(&a).is_none());
		assert!(!state.pin(&a, Point::default()));
	}

	#[test]
	fn a_few_hundred_nodes_settle_cleanly() {
		let mut store = GraphStore::new();
		let ids: Vec<NodeId> = (0..200)
			.map(|i| {
				let (x, y) = ((i % 20) as f64 * 7.0, (i / 20) as f64 * 7.0);
				store.add_node(format!("n{i}"), Point::new(400.0 + x, 300.0 + y))
			})
			.collect();
		for i in 1..ids.len() {
			store.add_edge(&ids[i], &ids[(i * 7919 + 13) % i]).unwrap();
		}
		let sim = ForceSimulator::new(SimulationConfig::default(), 1600.0, 1200.0);
		let mut state = SimulationState::new();
		run_until_settled(&sim, &mut state, &store);
		for (_, p) in state.positions() {
			assert!(p.x.is_finite() && p.y.is_finite());
		}
	}
}
