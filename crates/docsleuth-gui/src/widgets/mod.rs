/// UI widgets for DocSleuth.
pub mod status_bar;
pub mod toolbar;
pub mod tree_view;
