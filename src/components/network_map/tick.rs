//! Screen-space paint data for one simulation step.

use super::config::MapConfig;
use super::highlight::Highlight;
use super::model::MeshGraph;
use super::types::{LinkType, NodeRole};
use super::viewport::{Point, ViewTransform};

#[derive(Clone, Debug, PartialEq)]
pub struct LinkPaint {
	pub link: usize,
	pub from: Point,
	pub to: Point,
	pub label_at: Point,
	pub label: Option<String>,
	pub link_type: LinkType,
	pub opacity: f64,
}

impl LinkPaint {
	/// SVG path data of the straight line between the projected endpoints.
	pub fn path(&self) -> String {
		format!("M {} {} L {} {}", self.from.x, self.from.y, self.to.x, self.to.y)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodePaint {
	pub node: usize,
	pub center: Point,
	/// Top-left corner of the icon box.
	pub origin: Point,
	pub role: NodeRole,
	pub name: String,
	pub opacity: f64,
}

impl NodePaint {
	pub fn transform(&self) -> String {
		format!("translate({}, {})", self.origin.x, self.origin.y)
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	pub transform: ViewTransform,
	pub icon_half: f64,
	pub links: Vec<LinkPaint>,
	pub nodes: Vec<NodePaint>,
}

impl Frame {
	/// Topmost node whose icon box contains the screen point.
	pub fn node_at(&self, p: Point) -> Option<usize> {
		self.nodes
			.iter()
			.rev()
			.find(|n| (p.x - n.center.x).abs() <= self.icon_half && (p.y - n.center.y).abs() <= self.icon_half)
			.map(|n| n.node)
	}
}

/// Point `offset` model units from `s` along the direction to `t`.
pub fn along(s: Point, t: Point, offset: f64) -> Point {
	let angle = (t.y - s.y).atan2(t.x - s.x);
	Point::new(offset * angle.cos() + s.x, offset * angle.sin() + s.y)
}

/// Project the current positions through `transform`. `positions` is
/// index-aligned with `graph.nodes`; `visible` indexes `graph.links`.
pub fn compute_frame(
	graph: &MeshGraph,
	positions: &[Point],
	visible: &[usize],
	transform: ViewTransform,
	highlight: &Highlight<'_>,
	config: &MapConfig,
) -> Frame {
	let half = config.icon_half();

	let links = visible
		.iter()
		.filter_map(|&i| {
			let link = graph.links.get(i)?;
			let (s, t) = (*positions.get(link.source)?, *positions.get(link.target)?);
			Some(LinkPaint {
				link: i,
				from: transform.apply(s),
				to: transform.apply(t),
				label_at: transform.apply(along(s, t, config.label_offset)),
				label: link.linkquality.map(|q| q.to_string()),
				link_type: link.link_type,
				opacity: highlight.link_opacity(link),
			})
		})
		.collect();

	let nodes = graph
		.nodes
		.iter()
		.zip(positions)
		.enumerate()
		.map(|(i, (node, &p))| {
			let center = transform.apply(p);
			NodePaint {
				node: i,
				center,
				origin: Point::new(center.x - half, center.y - half),
				role: node.role,
				name: node.name.clone(),
				opacity: highlight.node_opacity(i),
			}
		})
		.collect();

	Frame {
		transform,
		icon_half: half,
		links,
		nodes,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_map::fixtures::{link, node, small_graph};
	use crate::components::network_map::types::{NetworkGraph, Relationship};
	use proptest::prelude::*;

	fn two_routers() -> MeshGraph {
		let mut l = link("a", "b", LinkType::Router2Router, Relationship::Parent);
		l.linkquality = Some(87);
		MeshGraph::from_snapshot(&NetworkGraph {
			nodes: vec![node("a", NodeRole::Router), node("b", NodeRole::Router)],
			links: vec![l],
		})
	}

	fn no_highlight(graph: &MeshGraph) -> Highlight<'_> {
		Highlight {
			selected: None,
			adjacency: graph.adjacency(),
			faded: 0.15,
		}
	}

	#[test]
	fn straight_link_under_identity() {
		let graph = two_routers();
		let positions = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
		let frame = compute_frame(
			&graph,
			&positions,
			&[0],
			ViewTransform::IDENTITY,
			&no_highlight(&graph),
			&MapConfig::default(),
		);

		assert_eq!(frame.links[0].path(), "M 0 0 L 10 0");
		assert_eq!(frame.links[0].label_at, Point::new(100.0, 0.0));
		assert_eq!(frame.links[0].label.as_deref(), Some("87"));
		assert_eq!(frame.nodes[0].transform(), "translate(-16, -16)");
		assert_eq!(frame.nodes[1].transform(), "translate(-6, -16)");
	}

	#[test]
	fn label_is_offset_before_transform() {
		let graph = two_routers();
		let positions = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
		let transform = ViewTransform { x: 5.0, y: 7.0, k: 2.0 };
		let frame = compute_frame(
			&graph,
			&positions,
			&[0],
			transform,
			&no_highlight(&graph),
			&MapConfig::default(),
		);

		assert_eq!(frame.links[0].path(), "M 5 7 L 25 7");
		assert_eq!(frame.links[0].label_at, Point::new(205.0, 7.0));
		assert_eq!(frame.nodes[1].transform(), "translate(9, -9)");
	}

	#[test]
	fn along_follows_the_link_angle() {
		let p = along(Point::new(1.0, 1.0), Point::new(1.0, 5.0), 100.0);
		assert!((p.x - 1.0).abs() < 1e-9);
		assert!((p.y - 101.0).abs() < 1e-9);
	}

	#[test]
	fn hidden_links_are_not_painted() {
		let graph = small_graph();
		let positions: Vec<Point> = (0..graph.nodes.len()).map(|i| Point::new(i as f64 * 40.0, 0.0)).collect();
		let frame = compute_frame(
			&graph,
			&positions,
			&[0, 2],
			ViewTransform::IDENTITY,
			&no_highlight(&graph),
			&MapConfig::default(),
		);
		assert_eq!(frame.links.iter().map(|l| l.link).collect::<Vec<_>>(), vec![0, 2]);
		assert_eq!(frame.nodes.len(), graph.nodes.len());
	}

	#[test]
	fn opacities_follow_selection() {
		let graph = small_graph();
		let e = graph.node_index("e").unwrap();
		let positions = vec![Point::default(); graph.nodes.len()];
		let visible: Vec<usize> = (0..graph.links.len()).collect();
		let highlight = Highlight {
			selected: Some(e),
			adjacency: graph.adjacency(),
			faded: 0.15,
		};
		let frame = compute_frame(
			&graph,
			&positions,
			&visible,
			ViewTransform::IDENTITY,
			&highlight,
			&MapConfig::default(),
		);

		for paint in &frame.links {
			let l = &graph.links[paint.link];
			assert_eq!(paint.opacity, if l.touches(e) { 1.0 } else { 0.15 });
		}
		let faded: Vec<_> = frame.nodes.iter().filter(|n| n.opacity < 1.0).map(|n| n.name.as_str()).collect();
		assert_eq!(faded, vec!["c", "r1"]);
	}

	#[test]
	fn hit_test_prefers_topmost_icon() {
		let graph = two_routers();
		let positions = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
		let frame = compute_frame(
			&graph,
			&positions,
			&[0],
			ViewTransform::IDENTITY,
			&no_highlight(&graph),
			&MapConfig::default(),
		);
		assert_eq!(frame.node_at(Point::new(5.0, 0.0)), Some(1));
		assert_eq!(frame.node_at(Point::new(-15.0, 3.0)), Some(0));
		assert_eq!(frame.node_at(Point::new(60.0, 60.0)), None);
	}

	proptest! {
		#[test]
		fn recomputing_is_byte_identical(
			coords in prop::collection::vec((-1e4f64..1e4, -1e4f64..1e4), 4),
			k in 0.1f64..8.0,
			tx in -500.0f64..500.0,
			ty in -500.0f64..500.0,
		) {
			let graph = small_graph();
			let positions: Vec<Point> = coords.into_iter().map(|(x, y)| Point::new(x, y)).collect();
			let visible: Vec<usize> = (0..graph.links.len()).collect();
			let transform = ViewTransform { x: tx, y: ty, k };
			let paint = || {
				let frame = compute_frame(&graph, &positions, &visible, transform, &no_highlight(&graph), &MapConfig::default());
				(
					frame.links.iter().map(LinkPaint::path).collect::<Vec<_>>(),
					frame.nodes.iter().map(NodePaint::transform).collect::<Vec<_>>(),
				)
			};
			prop_assert_eq!(paint(), paint());
		}
	}
}
