use std::collections::BTreeMap;

use log::{error, warn};

use crate::tree::{
	MasteryInfo, PassiveTree, Rect, TreeError, UrlTree, UrlTreeDelta, build_url_tree_delta,
	calculate_bounds, calculate_tree_bounds,
};

pub const NODE_RADIUS: f64 = 40.0;
pub const MASTERY_RADIUS: f64 = 70.0;
pub const HIT_RADIUS: f64 = 90.0;
pub const MIN_ZOOM: f64 = 0.002;
pub const MAX_ZOOM: f64 = 2.0;

/// Which side of the diff a node or connection falls on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeltaClass {
	/// Not allocated in either build.
	#[default]
	Unallocated,
	Active,
	Added,
	Removed,
}

impl DeltaClass {
	pub fn color(self) -> &'static str {
		match self {
			Self::Unallocated => "#3a3a4a",
			Self::Active => "#c8aa6e",
			Self::Added => "#4caf50",
			Self::Removed => "#e53935",
		}
	}

	pub fn is_changed(self) -> bool {
		matches!(self, Self::Added | Self::Removed)
	}
}

#[derive(Clone, Debug)]
pub struct NodeView {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub mastery: bool,
	pub class: DeltaClass,
}

#[derive(Clone, Debug)]
pub struct EdgeView {
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub class: DeltaClass,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub highlight_t: f64,
	pub screen_x: f64,
	pub screen_y: f64,
}

pub struct TreeViewerState {
	pub nodes: Vec<NodeView>,
	pub edges: Vec<EdgeView>,
	pub mastery_infos: BTreeMap<String, MasteryInfo>,
	pub bounds: Rect,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl TreeViewerState {
	pub fn new(
		tree: &PassiveTree,
		current: &UrlTree,
		previous: &UrlTree,
		width: f64,
		height: f64,
	) -> Self {
		let delta = build_url_tree_delta(current, previous, tree).unwrap_or_else(|e| {
			error!("Failed to diff builds: {e}");
			UrlTreeDelta::default()
		});
		let bounds = match calculate_bounds(&delta, tree) {
			Ok(rect) => rect,
			Err(TreeError::EmptyBounds) => calculate_tree_bounds(tree).unwrap_or_default(),
			Err(e) => {
				warn!("Falling back to whole tree bounds: {e}");
				calculate_tree_bounds(tree).unwrap_or_default()
			}
		};

		let mut nodes: Vec<NodeView> = tree
			.nodes
			.iter()
			.filter_map(|(id, node)| {
				let (x, y) = tree.framed_position(id)?;
				Some(NodeView {
					id: id.clone(),
					x,
					y,
					mastery: node.is_mastery(),
					class: node_class(&delta, id),
				})
			})
			.collect();
		// allocated nodes paint over unallocated ones
		nodes.sort_by(|a, b| {
			let allocated = |n: &NodeView| n.class != DeltaClass::Unallocated;
			allocated(a).cmp(&allocated(b)).then_with(|| a.id.cmp(&b.id))
		});

		let edges = tree
			.connections
			.iter()
			.filter_map(|connection| {
				let from = tree.framed_position(&connection.a)?;
				let to = tree.framed_position(&connection.b)?;
				Some(EdgeView {
					from,
					to,
					class: connection_class(&delta, &connection.id()),
				})
			})
			.collect();

		let mut state = Self {
			nodes,
			edges,
			mastery_infos: delta.mastery_infos,
			bounds,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		};
		state.fit_bounds();
		state
	}

	/// Center the camera on the delta bounds, scaled to fit the canvas.
	pub fn fit_bounds(&mut self) {
		let Rect { width, height, .. } = self.bounds;
		if width <= 0.0 || height <= 0.0 {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		}
		let k = (self.width / width).min(self.height / height).clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = self.bounds.center();
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// last hit wins, matching paint order
		self.nodes.iter().rposition(|node| {
			let (dx, dy) = (node.x - gx, node.y - gy);
			(dx * dx + dy * dy).sqrt() < HIT_RADIUS
		})
	}

	pub fn set_hover(&mut self, node: Option<usize>, sx: f64, sy: f64) {
		self.hover.screen_x = sx;
		self.hover.screen_y = sy;
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.highlight_t = 0.0;
	}

	/// Mastery description of the hovered node, if it has one.
	pub fn hovered_info(&self) -> Option<&str> {
		let node = self.nodes.get(self.hover.node?)?;
		self.mastery_infos.get(&node.id).map(|m| m.info.as_str())
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * 6.0 * dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.fit_bounds();
	}
}

fn node_class(delta: &UrlTreeDelta, id: &str) -> DeltaClass {
	if delta.nodes_added.contains(id) {
		DeltaClass::Added
	} else if delta.nodes_removed.contains(id) {
		DeltaClass::Removed
	} else if delta.nodes_active.contains(id) {
		DeltaClass::Active
	} else {
		DeltaClass::Unallocated
	}
}

fn connection_class(delta: &UrlTreeDelta, id: &str) -> DeltaClass {
	if delta.connections_added.contains(id) {
		DeltaClass::Added
	} else if delta.connections_removed.contains(id) {
		DeltaClass::Removed
	} else if delta.connections_active.contains(id) {
		DeltaClass::Active
	} else {
		DeltaClass::Unallocated
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::tree::{Connection, MasteryEffect, PassiveNode, ViewBox};

	fn sample() -> (PassiveTree, UrlTree, UrlTree) {
		let mut nodes = HashMap::new();
		for (id, x, y) in [("A", 0.0, 0.0), ("B", 100.0, 0.0), ("C", 100.0, 100.0)] {
			nodes.insert(
				id.to_owned(),
				PassiveNode {
					x,
					y,
					mastery_effects: Vec::new(),
				},
			);
		}
		nodes.insert(
			"M".to_owned(),
			PassiveNode {
				x: 5000.0,
				y: 5000.0,
				mastery_effects: vec!["e".into()],
			},
		);
		let tree = PassiveTree {
			nodes,
			connections: vec![
				Connection {
					a: "A".into(),
					b: "B".into(),
				},
				Connection {
					a: "C".into(),
					b: "B".into(),
				},
			],
			mastery_effects: HashMap::from([(
				"e".to_owned(),
				MasteryEffect {
					stats: vec!["10% more Damage".into()],
				},
			)]),
			view_box: ViewBox {
				x: -500.0,
				y: -500.0,
				..Default::default()
			},
		};
		let current = UrlTree {
			nodes: vec!["B".into(), "C".into(), "M".into()],
			mastery_lookup: HashMap::from([("M".to_owned(), "e".to_owned())]),
		};
		let previous = UrlTree {
			nodes: vec!["A".into(), "B".into(), "M".into()],
			mastery_lookup: HashMap::from([("M".to_owned(), "e".to_owned())]),
		};
		(tree, current, previous)
	}

	#[test]
	fn fitted_camera_centers_delta_bounds() {
		let (tree, current, previous) = sample();
		let state = TreeViewerState::new(&tree, &current, &previous, 800.0, 600.0);
		let (cx, cy) = state.bounds.center();
		let sx = cx * state.transform.k + state.transform.x;
		let sy = cy * state.transform.k + state.transform.y;
		assert!((sx - 400.0).abs() < 1e-6);
		assert!((sy - 300.0).abs() < 1e-6);
		// the far away mastery node is active and stays out of the framing
		assert!(!state.bounds.contains(5500.0, 5500.0));
	}

	#[test]
	fn nodes_and_edges_carry_their_delta_class() {
		let (tree, current, previous) = sample();
		let state = TreeViewerState::new(&tree, &current, &previous, 800.0, 600.0);
		let class_of = |id: &str| state.nodes.iter().find(|n| n.id == id).unwrap().class;
		assert_eq!(class_of("A"), DeltaClass::Removed);
		assert_eq!(class_of("B"), DeltaClass::Active);
		assert_eq!(class_of("C"), DeltaClass::Added);
		assert_eq!(class_of("M"), DeltaClass::Active);

		let mut classes: Vec<_> = state.edges.iter().map(|e| e.class).collect();
		classes.sort_by_key(|c| *c as u8);
		assert_eq!(classes, vec![DeltaClass::Added, DeltaClass::Removed]);
	}

	#[test]
	fn hovering_a_mastery_shows_its_description() {
		let (tree, current, previous) = sample();
		let mut state = TreeViewerState::new(&tree, &current, &previous, 800.0, 600.0);
		let idx = state.nodes.iter().position(|n| n.id == "M").unwrap();
		state.set_hover(Some(idx), 0.0, 0.0);
		assert_eq!(state.hovered_info(), Some("10% more Damage"));
	}

	#[test]
	fn node_lookup_uses_screen_space() {
		let (tree, current, previous) = sample();
		let state = TreeViewerState::new(&tree, &current, &previous, 800.0, 600.0);
		let node = state.nodes.iter().position(|n| n.id == "C").unwrap();
		let (x, y) = (state.nodes[node].x, state.nodes[node].y);
		let sx = x * state.transform.k + state.transform.x;
		let sy = y * state.transform.k + state.transform.y;
		assert_eq!(state.node_at_position(sx, sy), Some(node));
	}

	#[test]
	fn broken_snapshot_falls_back_to_whole_tree() {
		let (tree, mut current, previous) = sample();
		current.nodes.push("missing".into());
		let state = TreeViewerState::new(&tree, &current, &previous, 800.0, 600.0);
		assert!(state.nodes.iter().all(|n| n.class == DeltaClass::Unallocated));
		assert!(state.bounds.contains(5500.0, 5500.0));
	}
}
