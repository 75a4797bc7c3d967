//! Network-map snapshot as delivered by the bridge.

use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Role of a device in the mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum NodeRole {
	Coordinator,
	Router,
	EndDevice,
	#[default]
	#[serde(other)]
	Unknown,
}

/// Role pair of the two ends of a link, as classified by the bridge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum LinkType {
	Router2Router,
	Coordinator2Router,
	Coordinator2EndDevice,
	EndDevice2Router,
	BrokenLink,
	#[default]
	#[serde(other)]
	Other,
}

/// Neighbor relationship reported by a device's neighbor table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relationship {
	Parent,
	Child,
	Sibling,
	NoneOfTheAbove,
	PreviousChild,
	Other(i64),
}

impl From<i64> for Relationship {
	fn from(value: i64) -> Self {
		match value {
			0 => Self::Parent,
			1 => Self::Child,
			2 => Self::Sibling,
			3 => Self::NoneOfTheAbove,
			4 => Self::PreviousChild,
			n => Self::Other(n),
		}
	}
}

impl<'de> Deserialize<'de> for Relationship {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		// Anything that is not an integer falls back instead of failing the
		// whole snapshot.
		let value = Value::deserialize(deserializer)?;
		Ok(match value.as_i64() {
			Some(n) => Self::from(n),
			None => {
				debug!("unreadable relationship {}, treating as none of the above", value);
				Self::NoneOfTheAbove
			}
		})
	}
}

/// A checkbox in the relationship filter row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelationshipToggle {
	pub title: &'static str,
	pub relationship: Relationship,
}

pub const RELATIONSHIP_TOGGLES: &[RelationshipToggle] = &[
	RelationshipToggle { title: "Parent", relationship: Relationship::Parent },
	RelationshipToggle { title: "Child", relationship: Relationship::Child },
	RelationshipToggle { title: "Sibling", relationship: Relationship::Sibling },
	RelationshipToggle {
		title: "None of the above",
		relationship: Relationship::NoneOfTheAbove,
	},
	RelationshipToggle {
		title: "Previous child",
		relationship: Relationship::PreviousChild,
	},
];

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub ieee_addr: String,
	#[serde(default)]
	pub friendly_name: Option<String>,
	#[serde(rename = "type", default)]
	pub role: NodeRole,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLink {
	pub source_ieee_addr: String,
	pub target_ieee_addr: String,
	#[serde(default)]
	pub link_type: LinkType,
	#[serde(default = "default_relationship")]
	pub relationship: Relationship,
	#[serde(default)]
	pub relationships: Vec<Relationship>,
	#[serde(default)]
	pub linkquality: Option<u32>,
}

fn default_relationship() -> Relationship {
	Relationship::NoneOfTheAbove
}

impl GraphLink {
	/// Relationship set of the link; a link without an explicit list carries
	/// its single `relationship`.
	pub fn relationship_set(&self) -> Vec<Relationship> {
		if self.relationships.is_empty() {
			vec![self.relationship]
		} else {
			self.relationships.clone()
		}
	}
}

/// Whole-snapshot replacement delivered by the bridge.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NetworkGraph {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl NetworkGraph {
	pub fn from_json(json: &str) -> Result<Self, super::error::SnapshotError> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
