use log::{debug, warn};

use super::config::MapConfig;
use super::filter::{VisibleLinks, filter_links};
use super::highlight::{Highlight, Selection};
use super::layout::{LayoutStatus, Simulation};
use super::model::MeshGraph;
use super::tick::{Frame, compute_frame};
use super::types::NetworkGraph;
use super::viewport::{DeltaMode, Point, ViewTransform, ZoomBehavior};

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<usize>,
	pub start: Point,
	pub node_start: Point,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start: Point,
	pub transform_start: ViewTransform,
}

/// Everything the map canvas needs between animation frames.
pub struct MapState {
	pub graph: MeshGraph,
	pub simulation: Simulation,
	pub zoom: ZoomBehavior,
	pub transform: ViewTransform,
	pub visible: VisibleLinks,
	pub selection: Selection,
	pub drag: DragState,
	pub pan: PanState,
	pub frame: Frame,
	pub width: f64,
	pub height: f64,
	pub config: MapConfig,
	visible_links: Vec<usize>,
	status: LayoutStatus,
}

impl MapState {
	pub fn new(
		snapshot: &NetworkGraph,
		visible: VisibleLinks,
		width: f64,
		height: f64,
		config: MapConfig,
	) -> Self {
		let config = match config.validate() {
			Ok(()) => config,
			Err(e) => {
				warn!("{}, using defaults", e);
				MapConfig::default()
			}
		};
		let mut state = Self {
			graph: MeshGraph::default(),
			simulation: Simulation::new(&config, width, height),
			zoom: ZoomBehavior::new(width, height, config.min_scale, config.max_scale),
			transform: ViewTransform::IDENTITY,
			visible,
			selection: Selection::new(config.selection_policy),
			drag: DragState::default(),
			pan: PanState::default(),
			frame: Frame::default(),
			width,
			height,
			config,
			visible_links: Vec::new(),
			status: LayoutStatus::Empty,
		};
		state.set_snapshot(snapshot);
		state.simulation.start();
		state
	}

	/// Replace the graph wholesale. Layout positions of surviving nodes carry
	/// over; selection and gestures do not.
	pub fn set_snapshot(&mut self, snapshot: &NetworkGraph) {
		// node indices of a running drag refer to the old graph
		self.end_gesture();
		self.graph = MeshGraph::from_snapshot(snapshot);
		self.selection.clear();
		self.reseed();
	}

	pub fn set_visible(&mut self, visible: VisibleLinks) {
		if visible == self.visible {
			return;
		}
		self.visible = visible;
		self.reseed();
	}

	fn reseed(&mut self) {
		self.visible_links = filter_links(&self.graph.links, &self.visible);
		self.status = self.simulation.set_graph(&self.graph, &self.visible_links);
		self.repaint();
	}

	pub fn is_empty(&self) -> bool {
		self.status == LayoutStatus::Empty
	}

	pub fn visible_links(&self) -> &[usize] {
		&self.visible_links
	}

	/// Advance the layout one step and recompute the frame.
	pub fn tick(&mut self) -> &Frame {
		if !self.is_empty() {
			self.simulation.step();
			self.repaint();
		}
		&self.frame
	}

	/// Recompute the frame from current positions without stepping.
	pub fn repaint(&mut self) {
		let highlight = Highlight {
			selected: self.selection.selected(),
			adjacency: self.graph.adjacency(),
			faded: self.config.faded_opacity,
		};
		self.frame = compute_frame(
			&self.graph,
			&self.simulation.positions(),
			&self.visible_links,
			self.transform,
			&highlight,
			&self.config,
		);
	}

	pub fn pointer_down(&mut self, at: Point) {
		if let Some(node) = self.frame.node_at(at) {
			let node_start = self.simulation.position(node).unwrap_or_default();
			self.drag = DragState {
				node: Some(node),
				start: at,
				node_start,
				moved: false,
			};
		} else {
			self.pan = PanState {
				active: true,
				start: at,
				transform_start: self.transform,
			};
		}
	}

	pub fn pointer_move(&mut self, at: Point) {
		if let Some(node) = self.drag.node {
			let (dx, dy) = (at.x - self.drag.start.x, at.y - self.drag.start.y);
			if !self.drag.moved && dx.hypot(dy) < self.config.click_tolerance {
				return;
			}
			self.drag.moved = true;
			let k = self.transform.k;
			let to = Point::new(self.drag.node_start.x + dx / k, self.drag.node_start.y + dy / k);
			self.simulation.pin(node, to);
		} else if self.pan.active {
			self.transform = self.zoom.pan(
				&self.pan.transform_start,
				at.x - self.pan.start.x,
				at.y - self.pan.start.y,
			);
			self.repaint();
		}
	}

	/// Ends a gesture; a press and release on a node without dragging is a
	/// click and toggles the selection.
	pub fn pointer_up(&mut self) {
		if let (Some(node), false) = (self.drag.node, self.drag.moved) {
			self.selection.click(node);
			self.repaint();
		}
		self.end_gesture();
	}

	pub fn pointer_leave(&mut self) {
		self.end_gesture();
	}

	/// Drop any drag or pan in progress, unpinning a dragged node.
	fn end_gesture(&mut self) {
		if let (Some(node), true) = (self.drag.node, self.drag.moved) {
			self.simulation.release(node);
		}
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn wheel(&mut self, delta_y: f64, mode: DeltaMode, at: Point) {
		self.transform = self.zoom.wheel(&self.transform, delta_y, mode, at);
		debug!("zoom -> {:?}", self.transform);
		self.repaint();
	}

	pub fn dispose(&mut self) {
		self.simulation.dispose();
		self.frame = Frame::default();
		self.status = LayoutStatus::Empty;
	}
}
