/// Top-level panels composed by the application layout.
pub mod document_panel;
pub mod listing_panel;
pub mod tree_panel;
