// StashScope - ui/panels/mod.rs

pub mod about;
pub mod charts;
pub mod filters;
pub mod summary;
pub mod table;
