use std::collections::HashSet;

use log::debug;
use serde::Deserialize;

use super::model::MeshLink;

/// Node-to-neighbors lookup over the full link set of a snapshot.
/// Every node counts as its own neighbor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyIndex(Vec<HashSet<usize>>);

impl AdjacencyIndex {
	pub fn build(node_count: usize, links: &[MeshLink]) -> Self {
		let mut adjacent: Vec<HashSet<usize>> = (0..node_count).map(|i| HashSet::from([i])).collect();
		for link in links {
			adjacent[link.source].insert(link.target);
			adjacent[link.target].insert(link.source);
		}
		Self(adjacent)
	}

	pub fn are_neighbors(&self, a: usize, b: usize) -> bool {
		self.0.get(a).is_some_and(|n| n.contains(&b))
	}
}

/// What a click on a node does when some node is already selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum SelectionPolicy {
	/// Any click while something is selected clears the selection.
	#[default]
	ClearOnAnyClick,
	/// Clicking the selected node clears it, clicking another node moves
	/// the selection there.
	SwitchToClicked,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	selected: Option<usize>,
	policy: SelectionPolicy,
}

impl Selection {
	pub fn new(policy: SelectionPolicy) -> Self {
		Self {
			selected: None,
			policy,
		}
	}

	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	pub fn click(&mut self, node: usize) {
		self.selected = match (self.selected, self.policy) {
			(None, _) => Some(node),
			(Some(_), SelectionPolicy::ClearOnAnyClick) => None,
			(Some(current), SelectionPolicy::SwitchToClicked) if current == node => None,
			(Some(_), SelectionPolicy::SwitchToClicked) => Some(node),
		};
		debug!("selection -> {:?}", self.selected);
	}

	pub fn clear(&mut self) {
		self.selected = None;
	}
}

/// Opacity rules for the current selection.
#[derive(Clone, Copy, Debug)]
pub struct Highlight<'a> {
	pub selected: Option<usize>,
	pub adjacency: &'a AdjacencyIndex,
	pub faded: f64,
}

impl Highlight<'_> {
	pub fn node_opacity(&self, node: usize) -> f64 {
		match self.selected {
			None => 1.0,
			Some(sel) if self.adjacency.are_neighbors(sel, node) => 1.0,
			Some(_) => self.faded,
		}
	}

	/// Also used for the link's label.
	pub fn link_opacity(&self, link: &MeshLink) -> f64 {
		match self.selected {
			None => 1.0,
			Some(sel) if link.touches(sel) => 1.0,
			Some(_) => self.faded,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_map::fixtures::small_graph;
	use crate::components::network_map::filter::{VisibleLinks, filter_links};

	#[test]
	fn click_toggles_selection() {
		let mut sel = Selection::default();
		sel.click(2);
		assert_eq!(sel.selected(), Some(2));
		sel.click(2);
		assert_eq!(sel.selected(), None);
	}

	#[test]
	fn click_on_other_node_clears_under_default_policy() {
		let mut sel = Selection::default();
		sel.click(2);
		sel.click(3);
		assert_eq!(sel.selected(), None);
	}

	#[test]
	fn switch_policy_moves_selection() {
		let mut sel = Selection::new(SelectionPolicy::SwitchToClicked);
		sel.click(2);
		sel.click(3);
		assert_eq!(sel.selected(), Some(3));
		sel.click(3);
		assert_eq!(sel.selected(), None);
	}

	#[test]
	fn adjacency_uses_the_full_link_set() {
		let graph = small_graph();
		let r1 = graph.node_index("r1").unwrap();
		let r2 = graph.node_index("r2").unwrap();

		// r1<->r2 is a sibling link, hidden by the default filter
		let visible = filter_links(&graph.links, &VisibleLinks::default());
		assert!(visible.iter().all(|&i| !(graph.links[i].touches(r1) && graph.links[i].touches(r2))));
		assert!(graph.adjacency().are_neighbors(r1, r2));
		assert!(graph.adjacency().are_neighbors(r1, r1));
	}

	#[test]
	fn nothing_selected_is_fully_opaque() {
		let graph = small_graph();
		let hl = Highlight {
			selected: None,
			adjacency: graph.adjacency(),
			faded: 0.15,
		};
		assert!((0..graph.nodes.len()).all(|n| hl.node_opacity(n) == 1.0));
		assert!(graph.links.iter().all(|l| hl.link_opacity(l) == 1.0));
	}

	#[test]
	fn selection_fades_non_neighbors() {
		let graph = small_graph();
		let e = graph.node_index("e").unwrap();
		let r2 = graph.node_index("r2").unwrap();
		let c = graph.node_index("c").unwrap();
		let hl = Highlight {
			selected: Some(e),
			adjacency: graph.adjacency(),
			faded: 0.15,
		};

		assert_eq!(hl.node_opacity(e), 1.0);
		assert_eq!(hl.node_opacity(r2), 1.0);
		assert_eq!(hl.node_opacity(c), 0.15);
		for link in &graph.links {
			let expected = if link.source == e || link.target == e { 1.0 } else { 0.15 };
			assert_eq!(hl.link_opacity(link), expected);
		}
	}
}
