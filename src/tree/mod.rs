//! Passive tree data, build diffing and viewport bounds.

mod bounds;
mod data;
mod delta;
mod error;

pub use bounds::{
	PADDING, Rect, calculate_bounds, calculate_bounds_with_padding, calculate_tree_bounds,
};
pub use data::{Connection, MasteryEffect, PassiveNode, PassiveTree, UrlTree, ViewBox};
pub use delta::{MasteryInfo, UrlTreeDelta, build_url_tree_delta};
pub use error::{Result, TreeError};
