use serde::Serialize;

use super::data::PassiveTree;
use super::delta::UrlTreeDelta;
use super::error::{Result, TreeError};

/// Margin added around the bounded nodes on every side.
pub const PADDING: f64 = 1250.0;

/// Axis-aligned rectangle in the tree's view box frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

impl Rect {
	/// Midpoint of the rectangle.
	pub fn center(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// Whether `(x, y)` lies inside the rectangle, edges included.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
	}
}

#[derive(Clone, Copy)]
struct Extent {
	min_x: f64,
	min_y: f64,
	max_x: f64,
	max_y: f64,
}

impl Extent {
	fn of<'a>(tree: &PassiveTree, ids: impl IntoIterator<Item = &'a String>) -> Result<Self> {
		let mut extent: Option<Extent> = None;
		for id in ids {
			let node = tree
				.nodes
				.get(id)
				.ok_or_else(|| TreeError::unknown_node(id))?;
			extent = Some(match extent {
				None => Extent {
					min_x: node.x,
					min_y: node.y,
					max_x: node.x,
					max_y: node.y,
				},
				Some(e) => Extent {
					min_x: e.min_x.min(node.x),
					min_y: e.min_y.min(node.y),
					max_x: e.max_x.max(node.x),
					max_y: e.max_y.max(node.y),
				},
			});
		}
		extent.ok_or(TreeError::EmptyBounds)
	}

	fn padded(self, tree: &PassiveTree, padding: f64) -> Rect {
		Rect {
			// anchor to the view box origin
			x: self.min_x - padding - tree.view_box.x,
			y: self.min_y - padding - tree.view_box.y,
			width: self.max_x - self.min_x + padding * 2.0,
			height: self.max_y - self.min_y + padding * 2.0,
		}
	}
}

/// Viewport framing `delta` with the default [`PADDING`].
///
/// An unchanged delta frames the whole active selection; otherwise only the
/// added and removed nodes are framed.
pub fn calculate_bounds(delta: &UrlTreeDelta, tree: &PassiveTree) -> Result<Rect> {
	calculate_bounds_with_padding(delta, tree, PADDING)
}

/// [`calculate_bounds`] with a caller supplied margin.
pub fn calculate_bounds_with_padding(
	delta: &UrlTreeDelta,
	tree: &PassiveTree,
	padding: f64,
) -> Result<Rect> {
	let extent = if delta.is_unchanged() {
		Extent::of(tree, &delta.nodes_active)?
	} else {
		Extent::of(tree, delta.nodes_added.iter().chain(&delta.nodes_removed))?
	};
	Ok(extent.padded(tree, padding))
}

/// Padded viewport over every node of the tree.
pub fn calculate_tree_bounds(tree: &PassiveTree) -> Result<Rect> {
	Ok(Extent::of(tree, tree.nodes.keys())?.padded(tree, PADDING))
}
