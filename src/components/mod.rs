pub mod tree_viewer;
