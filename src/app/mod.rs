// StashScope - app/mod.rs
//
// Application layer: session controller and chart lifecycle.
// Dependencies: core layer, platform (config values, file access).
// Must NOT depend on: ui.

pub mod charts;
pub mod state;
