// StashScope - core/mod.rs
//
// Core business logic layer: the parse, filter, aggregate, sort and export
// pipeline.
// Must NOT depend on: ui, platform, app.

pub mod aggregate;
pub mod datefmt;
pub mod export;
pub mod filter;
pub mod model;
pub mod parser;
pub mod raster;
pub mod sort;
