use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::debug;
use serde::Serialize;

use super::data::{PassiveTree, UrlTree};
use super::error::{Result, TreeError};

/// Description shown for a mastery node touched by either build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MasteryInfo {
	/// Stat lines of the chosen effect, newline separated.
	pub info: String,
}

/// Classification of nodes and connections between two builds.
///
/// Node sets are disjoint. Connection ids use [`Connection::id`] and land in
/// the partition implied by their endpoints.
///
/// [`Connection::id`]: super::data::Connection::id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlTreeDelta {
	/// Allocated in both builds (mastery nodes only with an unchanged effect).
	pub nodes_active: BTreeSet<String>,
	/// Allocated only in the current build.
	pub nodes_added: BTreeSet<String>,
	/// Allocated only in the previous build.
	pub nodes_removed: BTreeSet<String>,
	/// Both endpoints active.
	pub connections_active: BTreeSet<String>,
	/// Newly traversable through at least one added endpoint.
	pub connections_added: BTreeSet<String>,
	/// No longer traversable through at least one removed endpoint.
	pub connections_removed: BTreeSet<String>,
	/// Mastery node id to description of its chosen effect.
	pub mastery_infos: BTreeMap<String, MasteryInfo>,
}

impl UrlTreeDelta {
	/// True when both builds allocate the same nodes with the same masteries.
	pub fn is_unchanged(&self) -> bool {
		self.nodes_added.is_empty() && self.nodes_removed.is_empty()
	}

	/// Total number of classified nodes.
	pub fn node_count(&self) -> usize {
		self.nodes_active.len() + self.nodes_added.len() + self.nodes_removed.len()
	}
}

/// Diff `previous` against `current` over the static `tree`.
///
/// A mastery node whose chosen effect differs between the builds is dropped
/// from a copy of the previous selection before the set algebra runs, so it
/// reports as added instead of active. Neither snapshot is modified.
pub fn build_url_tree_delta(
	current: &UrlTree,
	previous: &UrlTree,
	tree: &PassiveTree,
) -> Result<UrlTreeDelta> {
	check_snapshot(current, tree)?;
	check_snapshot(previous, tree)?;

	let cur_nodes: HashSet<&str> = current.nodes.iter().map(String::as_str).collect();
	let mut prev_nodes: HashSet<&str> = previous.nodes.iter().map(String::as_str).collect();

	for (node_id, effect_id) in &current.mastery_lookup {
		if previous.mastery_lookup.get(node_id) != Some(effect_id) {
			prev_nodes.remove(node_id.as_str());
		}
	}

	let mut mastery_infos = BTreeMap::new();
	for lookup in [&previous.mastery_lookup, &current.mastery_lookup] {
		for (node_id, effect_id) in lookup {
			let effect = tree.mastery_effects.get(effect_id).ok_or_else(|| {
				TreeError::UnknownMasteryEffect {
					node_id: node_id.clone(),
					effect_id: effect_id.clone(),
				}
			})?;
			mastery_infos.insert(
				node_id.clone(),
				MasteryInfo {
					info: effect.stats.join("\n"),
				},
			);
		}
	}

	let nodes_active = owned(cur_nodes.intersection(&prev_nodes));
	let nodes_added = owned(cur_nodes.difference(&prev_nodes));
	let nodes_removed = owned(prev_nodes.difference(&cur_nodes));

	let mut connections_active = BTreeSet::new();
	let mut connections_added = BTreeSet::new();
	let mut connections_removed = BTreeSet::new();

	for connection in &tree.connections {
		for endpoint in [&connection.a, &connection.b] {
			if !tree.nodes.contains_key(endpoint) {
				return Err(TreeError::unknown_node(endpoint));
			}
		}

		let (a, b) = (connection.a.as_str(), connection.b.as_str());
		let (a_active, b_active) = (nodes_active.contains(a), nodes_active.contains(b));
		let (a_added, b_added) = (nodes_added.contains(a), nodes_added.contains(b));
		let (a_removed, b_removed) = (nodes_removed.contains(a), nodes_removed.contains(b));

		if a_active && b_active {
			connections_active.insert(connection.id());
		}
		// An edge between an added and a removed node never existed as a
		// continuous path and stays unclassified.
		if (a_added && (b_added || b_active)) || (b_added && (a_added || a_active)) {
			connections_added.insert(connection.id());
		}
		if (a_removed && (b_removed || b_active)) || (b_removed && (a_removed || a_active)) {
			connections_removed.insert(connection.id());
		}
	}

	debug!(
		"tree delta: nodes {}/{}/{} connections {}/{}/{} (active/added/removed), {} masteries",
		nodes_active.len(),
		nodes_added.len(),
		nodes_removed.len(),
		connections_active.len(),
		connections_added.len(),
		connections_removed.len(),
		mastery_infos.len(),
	);

	Ok(UrlTreeDelta {
		nodes_active,
		nodes_added,
		nodes_removed,
		connections_active,
		connections_added,
		connections_removed,
		mastery_infos,
	})
}

fn owned<'a, 'b: 'a>(ids: impl Iterator<Item = &'a &'b str>) -> BTreeSet<String> {
	ids.map(|id| (*id).to_owned()).collect()
}

fn check_snapshot(snapshot: &UrlTree, tree: &PassiveTree) -> Result<()> {
	snapshot
		.nodes
		.iter()
		.chain(snapshot.mastery_lookup.keys())
		.find(|id| !tree.nodes.contains_key(id.as_str()))
		.map_or(Ok(()), |id| Err(TreeError::unknown_node(id)))
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::tree::data::{Connection, MasteryEffect, PassiveNode};

	fn tree() -> PassiveTree {
		let node = |x, y| PassiveNode {
			x,
			y,
			mastery_effects: Vec::new(),
		};
		let mut nodes = HashMap::new();
		nodes.insert("A".to_owned(), node(0.0, 0.0));
		nodes.insert("B".to_owned(), node(100.0, 0.0));
		nodes.insert("C".to_owned(), node(100.0, 100.0));
		nodes.insert(
			"M".to_owned(),
			PassiveNode {
				x: 50.0,
				y: 50.0,
				mastery_effects: vec!["life".into(), "mana".into()],
			},
		);

		let mut mastery_effects = HashMap::new();
		mastery_effects.insert(
			"life".to_owned(),
			MasteryEffect {
				stats: vec!["+50 to maximum Life".into(), "5% increased Life".into()],
			},
		);
		mastery_effects.insert(
			"mana".to_owned(),
			MasteryEffect {
				stats: vec!["+50 to maximum Mana".into()],
			},
		);

		let link = |a: &str, b: &str| Connection {
			a: a.into(),
			b: b.into(),
		};
		PassiveTree {
			nodes,
			connections: vec![link("A", "B"), link("B", "C"), link("B", "M")],
			mastery_effects,
			..Default::default()
		}
	}

	fn build(nodes: &[&str], masteries: &[(&str, &str)]) -> UrlTree {
		UrlTree {
			nodes: nodes.iter().map(|n| (*n).to_owned()).collect(),
			mastery_lookup: masteries
				.iter()
				.map(|(n, e)| ((*n).to_owned(), (*e).to_owned()))
				.collect(),
		}
	}

	fn set(ids: &[&str]) -> BTreeSet<String> {
		ids.iter().map(|id| (*id).to_owned()).collect()
	}

	#[test]
	fn shifting_selection_classifies_nodes_and_edges() {
		let delta =
			build_url_tree_delta(&build(&["B", "C"], &[]), &build(&["A", "B"], &[]), &tree())
				.unwrap();

		assert_eq!(delta.nodes_active, set(&["B"]));
		assert_eq!(delta.nodes_added, set(&["C"]));
		assert_eq!(delta.nodes_removed, set(&["A"]));
		assert!(delta.connections_active.is_empty());
		assert_eq!(delta.connections_added, set(&["B-C"]));
		assert_eq!(delta.connections_removed, set(&["A-B"]));
		assert!(delta.mastery_infos.is_empty());
	}

	#[test]
	fn identical_builds_are_all_active() {
		let snapshot = build(&["A", "B", "M"], &[("M", "life")]);
		let delta = build_url_tree_delta(&snapshot, &snapshot, &tree()).unwrap();

		assert!(delta.is_unchanged());
		assert_eq!(delta.nodes_active, set(&["A", "B", "M"]));
		assert_eq!(delta.connections_active, set(&["A-B", "B-M"]));
		assert_eq!(
			delta.mastery_infos["M"].info,
			"+50 to maximum Life\n5% increased Life"
		);
	}

	#[test]
	fn changed_mastery_effect_counts_as_added() {
		let current = build(&["B", "M"], &[("M", "mana")]);
		let previous = build(&["B", "M"], &[("M", "life")]);
		let delta = build_url_tree_delta(&current, &previous, &tree()).unwrap();

		assert_eq!(delta.nodes_active, set(&["B"]));
		assert_eq!(delta.nodes_added, set(&["M"]));
		assert!(delta.nodes_removed.is_empty());
		assert_eq!(delta.connections_added, set(&["B-M"]));
		// current choice wins
		assert_eq!(delta.mastery_infos["M"].info, "+50 to maximum Mana");
	}

	#[test]
	fn mastery_dropped_from_current_still_gets_info() {
		let current = build(&["B"], &[]);
		let previous = build(&["B", "M"], &[("M", "life")]);
		let delta = build_url_tree_delta(&current, &previous, &tree()).unwrap();

		assert_eq!(delta.nodes_removed, set(&["M"]));
		assert_eq!(delta.connections_removed, set(&["B-M"]));
		assert!(delta.mastery_infos.contains_key("M"));
	}

	#[test]
	fn edge_between_added_and_removed_is_unclassified() {
		let delta =
			build_url_tree_delta(&build(&["B"], &[]), &build(&["A"], &[]), &tree()).unwrap();

		assert_eq!(delta.nodes_added, set(&["B"]));
		assert_eq!(delta.nodes_removed, set(&["A"]));
		assert!(delta.connections_active.is_empty());
		assert!(delta.connections_added.is_empty());
		assert!(delta.connections_removed.is_empty());
	}

	#[test]
	fn unknown_snapshot_node_is_an_integrity_error() {
		let err = build_url_tree_delta(&build(&["Z"], &[]), &build(&[], &[]), &tree()).unwrap_err();
		assert!(matches!(err, TreeError::UnknownNode { node_id } if node_id == "Z"));
	}

	#[test]
	fn unknown_mastery_effect_is_an_integrity_error() {
		let current = build(&["M"], &[("M", "armour")]);
		let err = build_url_tree_delta(&current, &build(&[], &[]), &tree()).unwrap_err();
		assert!(matches!(
			err,
			TreeError::UnknownMasteryEffect { node_id, effect_id }
				if node_id == "M" && effect_id == "armour"
		));
	}

	#[test]
	fn dangling_connection_is_an_integrity_error() {
		let mut tree = tree();
		tree.connections.push(Connection {
			a: "A".into(),
			b: "ghost".into(),
		});
		let err =
			build_url_tree_delta(&build(&["A"], &[]), &build(&["A"], &[]), &tree).unwrap_err();
		assert!(matches!(err, TreeError::UnknownNode { node_id } if node_id == "ghost"));
	}

	#[test]
	fn delta_serializes_with_camel_case_keys() {
		let current = build(&["B", "M"], &[("M", "mana")]);
		let previous = build(&["A", "B"], &[]);
		let delta = build_url_tree_delta(&current, &previous, &tree()).unwrap();
		let written = serde_json::to_value(&delta).unwrap();

		for key in [
			"nodesActive",
			"nodesAdded",
			"nodesRemoved",
			"connectionsActive",
			"connectionsAdded",
			"connectionsRemoved",
			"masteryInfos",
		] {
			assert!(written.get(key).is_some(), "missing `{key}`");
		}
		assert_eq!(written["nodesActive"], serde_json::json!(["B"]));
		assert_eq!(written["nodesAdded"], serde_json::json!(["M"]));
		assert_eq!(written["nodesRemoved"], serde_json::json!(["A"]));
		assert_eq!(written["connectionsAdded"], serde_json::json!(["B-M"]));
		assert_eq!(written["connectionsRemoved"], serde_json::json!(["A-B"]));
		assert_eq!(written["masteryInfos"]["M"]["info"], "+50 to maximum Mana");
	}

	#[test]
	fn inputs_are_left_untouched() {
		let current = build(&["B", "M"], &[("M", "mana")]);
		let previous = build(&["B", "M"], &[("M", "life")]);
		let (cur_copy, prev_copy) = (current.clone(), previous.clone());
		build_url_tree_delta(&current, &previous, &tree()).unwrap();
		assert_eq!(current, cur_copy);
		assert_eq!(previous, prev_copy);
	}
}
