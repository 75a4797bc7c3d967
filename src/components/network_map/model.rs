use std::collections::HashMap;

use log::{info, warn};

use super::highlight::AdjacencyIndex;
use super::types::{LinkType, NetworkGraph, NodeRole, Relationship};

#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
	pub addr: String,
	pub role: NodeRole,
	pub name: String,
}

/// A link whose endpoints are indices into [`MeshGraph::nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct MeshLink {
	pub source: usize,
	pub target: usize,
	pub link_type: LinkType,
	pub relationships: Vec<Relationship>,
	pub linkquality: Option<u32>,
}

impl MeshLink {
	pub fn touches(&self, node: usize) -> bool {
		self.source == node || self.target == node
	}
}

/// Validated, immutable view of one bridge snapshot.
#[derive(Clone, Debug, Default)]
pub struct MeshGraph {
	pub nodes: Vec<MeshNode>,
	pub links: Vec<MeshLink>,
	index: HashMap<String, usize>,
	adjacency: AdjacencyIndex,
}

impl MeshGraph {
	pub fn from_snapshot(snapshot: &NetworkGraph) -> Self {
		let mut nodes = Vec::with_capacity(snapshot.nodes.len());
		let mut index = HashMap::with_capacity(snapshot.nodes.len());

		for node in &snapshot.nodes {
			if index.contains_key(&node.ieee_addr) {
				warn!("duplicate node {} in snapshot, keeping the first", node.ieee_addr);
				continue;
			}
			index.insert(node.ieee_addr.clone(), nodes.len());
			nodes.push(MeshNode {
				addr: node.ieee_addr.clone(),
				role: node.role,
				name: node
					.friendly_name
					.clone()
					.unwrap_or_else(|| node.ieee_addr.clone()),
			});
		}

		let links: Vec<MeshLink> = snapshot
			.links
			.iter()
			.filter_map(|link| {
				let source = *index.get(&link.source_ieee_addr)?;
				let target = *index.get(&link.target_ieee_addr)?;
				Some(MeshLink {
					source,
					target,
					link_type: link.link_type,
					relationships: link.relationship_set(),
					linkquality: link.linkquality,
				})
			})
			.collect();

		let dropped = snapshot.links.len() - links.len();
		if dropped > 0 {
			warn!("dropped {} links with unknown endpoints", dropped);
		}
		info!("loaded mesh snapshot: {} nodes, {} links", nodes.len(), links.len());

		let adjacency = AdjacencyIndex::build(nodes.len(), &links);
		Self {
			nodes,
			links,
			index,
			adjacency,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node_index(&self, addr: &str) -> Option<usize> {
		self.index.get(addr).copied()
	}

	pub fn adjacency(&self) -> &AdjacencyIndex {
		&self.adjacency
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_map::fixtures::{link, node};

	#[test]
	fn drops_links_with_missing_endpoints() {
		let snapshot = NetworkGraph {
			nodes: vec![node("a", NodeRole::Coordinator), node("b", NodeRole::Router)],
			links: vec![
				link("a", "b", LinkType::Coordinator2Router, Relationship::Child),
				link("b", "ghost", LinkType::Router2Router, Relationship::Sibling),
				link("ghost", "a", LinkType::BrokenLink, Relationship::Parent),
			],
		};
		let graph = MeshGraph::from_snapshot(&snapshot);

		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
		assert_eq!((graph.links[0].source, graph.links[0].target), (0, 1));
	}

	#[test]
	fn duplicate_addresses_keep_first_node() {
		let mut second = node("a", NodeRole::Router);
		second.friendly_name = Some("impostor".into());
		let snapshot = NetworkGraph {
			nodes: vec![node("a", NodeRole::Coordinator), second],
			links: Vec::new(),
		};
		let graph = MeshGraph::from_snapshot(&snapshot);

		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].role, NodeRole::Coordinator);
		assert_eq!(graph.nodes[0].name, "a");
		assert_eq!(graph.node_index("a"), Some(0));
	}

	#[test]
	fn empty_snapshot_is_empty() {
		assert!(MeshGraph::from_snapshot(&NetworkGraph::default()).is_empty());
	}
}
