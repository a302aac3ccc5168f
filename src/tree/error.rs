use thiserror::Error;

/// Result alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Failures raised while diffing or bounding a passive tree.
///
/// The tree is assumed to be consistent with the snapshots handed to it, so
/// the lookup variants signal bad input data rather than anything transient.
#[derive(Debug, Error)]
pub enum TreeError {
	/// A snapshot, connection or delta references a node the tree lacks.
	#[error("node `{node_id}` is not part of the passive tree")]
	UnknownNode {
		/// The missing node id.
		node_id: String,
	},

	/// A mastery choice references an effect the tree lacks.
	#[error("mastery effect `{effect_id}` chosen on node `{node_id}` is not in the passive tree")]
	UnknownMasteryEffect {
		/// Node the effect was chosen on.
		node_id: String,
		/// The missing effect id.
		effect_id: String,
	},

	/// Bounds were requested over a delta with no nodes at all.
	#[error("cannot compute bounds over an empty node set")]
	EmptyBounds,

	/// Tree or snapshot JSON failed to parse.
	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl TreeError {
	pub(crate) fn unknown_node(node_id: &str) -> Self {
		Self::UnknownNode {
			node_id: node_id.to_owned(),
		}
	}
}
