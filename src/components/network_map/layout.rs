//! Force-directed layout of the mesh.
//!
//! A velocity-Verlet style simulation: every step cools `alpha` toward
//! `alpha_target`, lets each force add to the node velocities (scaled by
//! `alpha`), then damps the velocities and moves the nodes. The settle
//! target stays above `alpha_min`, so once started the layout keeps
//! reacting to drags and graph changes until it is stopped or disposed.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{info, warn};

use super::config::MapConfig;
use super::model::MeshGraph;
use super::types::{LinkType, Relationship};
use super::viewport::Point;

/// Rest length the link force pulls a link toward.
pub fn link_distance(link_type: LinkType) -> f64 {
	match link_type {
		LinkType::BrokenLink => 450.0,
		LinkType::Router2Router | LinkType::Coordinator2Router => 200.0,
		LinkType::Coordinator2EndDevice | LinkType::EndDevice2Router => 50.0,
		LinkType::Other => 200.0,
	}
}

/// How hard the link force pulls; zero leaves the link to the other forces.
pub fn link_strength(link_type: LinkType, relationships: &[Relationship]) -> f64 {
	let parent_or_child = relationships
		.iter()
		.any(|r| matches!(r, Relationship::Parent | Relationship::Child));
	match link_type {
		LinkType::Router2Router => 1.0,
		LinkType::Coordinator2Router
		| LinkType::Coordinator2EndDevice
		| LinkType::EndDevice2Router
		| LinkType::BrokenLink
		| LinkType::Other => {
			if parent_or_child {
				0.5
			} else {
				0.0
			}
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutStatus {
	/// No nodes; the simulation has nothing to lay out.
	Empty,
	Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
	Idle,
	Running,
	Stopped,
	Disposed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Body {
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
	fx: Option<f64>,
	fy: Option<f64>,
}

impl Body {
	/// Phyllotaxis placement around the origin.
	fn seed(i: usize) -> Self {
		let radius = 10.0 * (0.5 + i as f64).sqrt();
		let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
		Self {
			x: radius * angle.cos(),
			y: radius * angle.sin(),
			..Self::default()
		}
	}
}

#[derive(Clone, Copy, Debug)]
struct Spring {
	source: usize,
	target: usize,
	distance: f64,
	strength: f64,
	bias: f64,
}

/// Deterministic generator for separating coincident nodes.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	fn next_f64(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

/// The layout's working copy of node positions, index-aligned with the
/// nodes of the last graph handed to [`Simulation::set_graph`].
#[derive(Clone, Debug)]
pub struct Simulation {
	bodies: Vec<Body>,
	addrs: Vec<String>,
	springs: Vec<Spring>,
	center: Point,
	charge: f64,
	x_strength: f64,
	y_strength: f64,
	collide_radius: f64,
	iterations: usize,
	velocity_decay: f64,
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	settle_alpha: f64,
	drag_alpha: f64,
	rng: Lcg,
	phase: Phase,
}

impl Simulation {
	pub fn new(config: &MapConfig, width: f64, height: f64) -> Self {
		Self {
			bodies: Vec::new(),
			addrs: Vec::new(),
			springs: Vec::new(),
			center: Point::new(width / 2.0, height / 2.0),
			charge: config.charge_strength,
			x_strength: config.x_strength,
			y_strength: config.y_strength,
			collide_radius: config.collide_radius,
			iterations: config.link_iterations,
			velocity_decay: config.velocity_decay,
			alpha: 1.0,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay,
			alpha_target: config.alpha_target,
			settle_alpha: config.alpha_target,
			drag_alpha: config.drag_alpha_target,
			rng: Lcg(1),
			phase: Phase::Idle,
		}
	}

	/// Re-seed the forces for `graph` restricted to the links at `visible`.
	/// Nodes already known by address keep their position and velocity.
	pub fn set_graph(&mut self, graph: &MeshGraph, visible: &[usize]) -> LayoutStatus {
		if self.phase == Phase::Disposed {
			warn!("set_graph on a disposed simulation");
			return LayoutStatus::Empty;
		}

		let previous: HashMap<String, Body> = self
			.addrs
			.drain(..)
			.zip(self.bodies.drain(..))
			.collect();
		self.springs.clear();
		if graph.is_empty() {
			return LayoutStatus::Empty;
		}

		let mut fresh = 0;
		for (i, node) in graph.nodes.iter().enumerate() {
			let body = previous.get(&node.addr).copied().unwrap_or_else(|| {
				fresh += 1;
				Body::seed(i)
			});
			self.bodies.push(body);
			self.addrs.push(node.addr.clone());
		}

		let mut degree = vec![0usize; graph.nodes.len()];
		for &i in visible {
			let link = &graph.links[i];
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		self.springs = visible
			.iter()
			.map(|&i| {
				let link = &graph.links[i];
				let (ds, dt) = (degree[link.source] as f64, degree[link.target] as f64);
				Spring {
					source: link.source,
					target: link.target,
					distance: link_distance(link.link_type),
					strength: link_strength(link.link_type, &link.relationships),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		if fresh > 0 && !previous.is_empty() {
			self.alpha = 1.0;
		}
		LayoutStatus::Ready
	}

	pub fn start(&mut self) {
		if self.phase == Phase::Disposed {
			return;
		}
		self.alpha_target = self.settle_alpha;
		self.phase = Phase::Running;
		info!("layout simulation started with {} nodes", self.bodies.len());
	}

	pub fn stop(&mut self) {
		if self.phase == Phase::Running {
			self.phase = Phase::Stopped;
		}
	}

	/// Release all layout state. A disposed simulation never runs again.
	pub fn dispose(&mut self) {
		self.bodies = Vec::new();
		self.addrs = Vec::new();
		self.springs = Vec::new();
		self.phase = Phase::Disposed;
		info!("layout simulation disposed");
	}

	pub fn is_running(&self) -> bool {
		self.phase == Phase::Running
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn is_pinned(&self, node: usize) -> bool {
		self.bodies.get(node).is_some_and(|b| b.fx.is_some() || b.fy.is_some())
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	pub fn position(&self, node: usize) -> Option<Point> {
		self.bodies.get(node).map(|b| Point::new(b.x, b.y))
	}

	pub fn positions(&self) -> Vec<Point> {
		self.bodies.iter().map(|b| Point::new(b.x, b.y)).collect()
	}

	/// Fix `node` at `at` (model space) and heat the layout up for dragging.
	pub fn pin(&mut self, node: usize, at: Point) {
		if let Some(body) = self.bodies.get_mut(node) {
			body.fx = Some(at.x);
			body.fy = Some(at.y);
			self.alpha_target = self.drag_alpha;
		}
	}

	pub fn release(&mut self, node: usize) {
		if let Some(body) = self.bodies.get_mut(node) {
			body.fx = None;
			body.fy = None;
		}
		self.alpha_target = self.settle_alpha;
	}

	/// Advance one step. Returns whether any work was done.
	pub fn step(&mut self) -> bool {
		if self.phase != Phase::Running || self.bodies.is_empty() {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		if self.alpha < self.alpha_min {
			self.alpha = self.alpha_min;
		}

		for _ in 0..self.iterations {
			self.apply_links();
		}
		self.apply_charge();
		self.apply_collide();
		self.apply_center();
		self.apply_axis_pull();

		let keep = 1.0 - self.velocity_decay;
		for body in &mut self.bodies {
			match body.fx {
				Some(fx) => {
					body.x = fx;
					body.vx = 0.0;
				}
				None => {
					body.vx *= keep;
					body.x += body.vx;
				}
			}
			match body.fy {
				Some(fy) => {
					body.y = fy;
					body.vy = 0.0;
				}
				None => {
					body.vy *= keep;
					body.y += body.vy;
				}
			}
		}
		true
	}

	fn apply_links(&mut self) {
		let alpha = self.alpha;
		for spring in &self.springs {
			let (s, t) = (self.bodies[spring.source], self.bodies[spring.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let len = (x * x + y * y).sqrt();
			let l = (len - spring.distance) / len * alpha * spring.strength;
			let (x, y) = (x * l, y * l);

			let target = &mut self.bodies[spring.target];
			target.vx -= x * spring.bias;
			target.vy -= y * spring.bias;
			let source = &mut self.bodies[spring.source];
			source.vx += x * (1.0 - spring.bias);
			source.vy += y * (1.0 - spring.bias);
		}
	}

	/// Pairwise inverse-distance charge with a unit distance floor.
	fn apply_charge(&mut self) {
		if self.charge == 0.0 {
			return;
		}
		let weight = self.charge * self.alpha;
		let n = self.bodies.len();
		for i in 0..n {
			let (xi, yi) = (self.bodies[i].x, self.bodies[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut x = self.bodies[j].x - xi;
				let mut y = self.bodies[j].y - yi;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				if l < 1.0 {
					l = l.sqrt();
				}
				dvx += x * weight / l;
				dvy += y * weight / l;
			}
			self.bodies[i].vx += dvx;
			self.bodies[i].vy += dvy;
		}
	}

	fn apply_collide(&mut self) {
		let r = self.collide_radius * 2.0;
		if r <= 0.0 {
			return;
		}
		let n = self.bodies.len();
		for i in 0..n {
			let xi = self.bodies[i].x + self.bodies[i].vx;
			let yi = self.bodies[i].y + self.bodies[i].vy;
			for j in (i + 1)..n {
				let other = self.bodies[j];
				let mut x = xi - other.x - other.vx;
				let mut y = yi - other.y - other.vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let len = l.sqrt();
				let push = (r - len) / len;
				let (x, y) = (x * push, y * push);
				// equal radii split the correction evenly
				self.bodies[i].vx += x * 0.5;
				self.bodies[i].vy += y * 0.5;
				self.bodies[j].vx -= x * 0.5;
				self.bodies[j].vy -= y * 0.5;
			}
		}
	}

	/// Shift every node so the centroid sits on the viewport center.
	fn apply_center(&mut self) {
		let n = self.bodies.len() as f64;
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
		let (dx, dy) = (sx / n - self.center.x, sy / n - self.center.y);
		for body in &mut self.bodies {
			body.x -= dx;
			body.y -= dy;
		}
	}

	/// Weak independent pulls toward the container's top-left edges.
	fn apply_axis_pull(&mut self) {
		let (kx, ky) = (self.x_strength * self.alpha, self.y_strength * self.alpha);
		for body in &mut self.bodies {
			body.vx -= body.x * kx;
			body.vy -= body.y * ky;
		}
	}
}
