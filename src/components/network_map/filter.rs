use std::collections::BTreeSet;

use log::debug;

use super::model::MeshLink;
use super::types::Relationship;

/// Relationship types whose links take part in layout and rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleLinks(BTreeSet<Relationship>);

impl Default for VisibleLinks {
	fn default() -> Self {
		Self::from_iter([Relationship::Parent, Relationship::Child])
	}
}

impl FromIterator<Relationship> for VisibleLinks {
	fn from_iter<I: IntoIterator<Item = Relationship>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl VisibleLinks {
	pub fn contains(&self, rel: Relationship) -> bool {
		self.0.contains(&rel)
	}

	/// Checkbox handler: `enabled` is the new checked state.
	pub fn set(&mut self, rel: Relationship, enabled: bool) {
		if enabled {
			self.0.insert(rel);
		} else {
			self.0.remove(&rel);
		}
		debug!("link filter {:?} -> {}", rel, enabled);
	}

	pub fn toggle(&mut self, rel: Relationship) {
		let enabled = !self.contains(rel);
		self.set(rel, enabled);
	}

	pub fn admits(&self, link: &MeshLink) -> bool {
		link.relationships.iter().any(|r| self.0.contains(r))
	}
}

/// Indices, in input order, of the links whose relationship set intersects
/// `visible`.
pub fn filter_links(links: &[MeshLink], visible: &VisibleLinks) -> Vec<usize> {
	links
		.iter()
		.enumerate()
		.filter(|(_, link)| visible.admits(link))
		.map(|(i, _)| i)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_map::types::LinkType;
	use proptest::prelude::*;

	fn mesh_link(rels: Vec<Relationship>) -> MeshLink {
		MeshLink {
			source: 0,
			target: 1,
			link_type: LinkType::Other,
			relationships: rels,
			linkquality: None,
		}
	}

	fn relationship() -> impl Strategy<Value = Relationship> {
		(0i64..7).prop_map(Relationship::from)
	}

	fn links() -> impl Strategy<Value = Vec<MeshLink>> {
		prop::collection::vec(
			prop::collection::vec(relationship(), 0..4).prop_map(mesh_link),
			0..24,
		)
	}

	fn visible() -> impl Strategy<Value = VisibleLinks> {
		prop::collection::vec(relationship(), 0..5).prop_map(VisibleLinks::from_iter)
	}

	#[test]
	fn defaults_to_parent_and_child() {
		let v = VisibleLinks::default();
		assert!(v.contains(Relationship::Parent));
		assert!(v.contains(Relationship::Child));
		assert!(!v.contains(Relationship::Sibling));
	}

	#[test]
	fn toggling_adds_and_removes() {
		let mut v = VisibleLinks::default();
		v.toggle(Relationship::Sibling);
		assert!(v.contains(Relationship::Sibling));
		v.set(Relationship::Parent, false);
		assert!(!v.contains(Relationship::Parent));
		v.toggle(Relationship::Sibling);
		assert_eq!(v, VisibleLinks::from_iter([Relationship::Child]));
	}

	#[test]
	fn keeps_links_sharing_any_relationship() {
		let links = vec![
			mesh_link(vec![Relationship::Sibling]),
			mesh_link(vec![Relationship::Sibling, Relationship::Child]),
			mesh_link(vec![]),
			mesh_link(vec![Relationship::Parent]),
		];
		assert_eq!(filter_links(&links, &VisibleLinks::default()), vec![1, 3]);
	}

	proptest! {
		#[test]
		fn result_is_exactly_the_intersecting_subset(links in links(), v in visible()) {
			let kept = filter_links(&links, &v);
			for (i, link) in links.iter().enumerate() {
				let intersects = link.relationships.iter().any(|r| v.contains(*r));
				prop_assert_eq!(kept.contains(&i), intersects);
			}
		}

		#[test]
		fn filtering_is_idempotent(links in links(), v in visible()) {
			let once: Vec<MeshLink> = filter_links(&links, &v).into_iter().map(|i| links[i].clone()).collect();
			let twice = filter_links(&once, &v);
			prop_assert_eq!(twice, (0..once.len()).collect::<Vec<_>>());
		}

		#[test]
		fn commutes_with_reordering(links in links(), v in visible()) {
			let mut reversed = links.clone();
			reversed.reverse();
			let forward: Vec<_> = filter_links(&links, &v).into_iter().map(|i| &links[i]).collect();
			let mut backward: Vec<_> = filter_links(&reversed, &v).into_iter().map(|i| &reversed[i]).collect();
			backward.reverse();
			prop_assert_eq!(forward, backward);
		}
	}
}
