//! Snapshot builders shared by the unit tests.

use super::model::MeshGraph;
use super::types::{GraphLink, GraphNode, LinkType, NetworkGraph, NodeRole, Relationship};

pub fn node(addr: &str, role: NodeRole) -> GraphNode {
	GraphNode {
		ieee_addr: addr.into(),
		friendly_name: None,
		role,
	}
}

pub fn link(src: &str, dst: &str, link_type: LinkType, rel: Relationship) -> GraphLink {
	GraphLink {
		source_ieee_addr: src.into(),
		target_ieee_addr: dst.into(),
		link_type,
		relationship: rel,
		relationships: Vec::new(),
		linkquality: None,
	}
}

/// Coordinator `c`, routers `r1`/`r2`, end device `e` hanging off `r2`.
pub fn small_mesh() -> NetworkGraph {
	NetworkGraph {
		nodes: vec![
			node("c", NodeRole::Coordinator),
			node("r1", NodeRole::Router),
			node("r2", NodeRole::Router),
			node("e", NodeRole::EndDevice),
		],
		links: vec![
			link("r1", "c", LinkType::Coordinator2Router, Relationship::Parent),
			link("r2", "r1", LinkType::Router2Router, Relationship::Sibling),
			link("e", "r2", LinkType::EndDevice2Router, Relationship::Parent),
			link("r2", "c", LinkType::Coordinator2Router, Relationship::Child),
		],
	}
}

pub fn small_graph() -> MeshGraph {
	MeshGraph::from_snapshot(&small_mesh())
}
