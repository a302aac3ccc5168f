use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::Result;

/// A single selectable point of the passive tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassiveNode {
	/// Horizontal position in tree space.
	pub x: f64,
	/// Vertical position in tree space.
	pub y: f64,
	/// Effects a mastery node lets the player pick from. Empty for regular nodes.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub mastery_effects: Vec<String>,
}

impl PassiveNode {
	/// Whether this node offers a choice of mastery effect.
	pub fn is_mastery(&self) -> bool {
		!self.mastery_effects.is_empty()
	}
}

/// Undirected edge between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
	/// One endpoint.
	pub a: String,
	/// The other endpoint.
	pub b: String,
}

impl Connection {
	/// Identifier shared by both orientations of the edge: the endpoint ids
	/// sorted and joined with `-`.
	pub fn id(&self) -> String {
		let (lo, hi) = if self.a <= self.b {
			(&self.a, &self.b)
		} else {
			(&self.b, &self.a)
		};
		format!("{lo}-{hi}")
	}
}

/// Stat lines granted by one mastery effect variant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MasteryEffect {
	/// Human readable stat descriptions.
	pub stats: Vec<String>,
}

/// Origin and extent of the tree's own coordinate frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Width.
	#[serde(default)]
	pub w: f64,
	/// Height.
	#[serde(default)]
	pub h: f64,
}

/// The static skill graph every build is a selection of.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassiveTree {
	/// Node id to node.
	pub nodes: HashMap<String, PassiveNode>,
	/// Every edge of the graph, in source order.
	pub connections: Vec<Connection>,
	/// Effect id to effect.
	#[serde(default)]
	pub mastery_effects: HashMap<String, MasteryEffect>,
	/// Frame origin subtracted from computed bounds.
	pub view_box: ViewBox,
}

impl PassiveTree {
	/// Parse a tree from its JSON export.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Tree-space position of `node_id` translated into the view box frame.
	pub fn framed_position(&self, node_id: &str) -> Option<(f64, f64)> {
		self.nodes
			.get(node_id)
			.map(|n| (n.x - self.view_box.x, n.y - self.view_box.y))
	}
}

/// One build state: the allocated nodes plus the mastery effect picked on
/// each allocated mastery node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlTree {
	/// Allocated node ids.
	pub nodes: Vec<String>,
	/// Mastery node id to chosen effect id.
	#[serde(default)]
	pub mastery_lookup: HashMap<String, String>,
}

impl UrlTree {
	/// Parse a snapshot from JSON.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}
}
