//! Story Score — the story breakdown engine for scrap-assembly narrative games.
//!
//! Players fill a fixed number of story slots with narrative scraps (quotes,
//! facts, photos). The engine turns that selection into a breakdown of
//! quality, picture coverage and how closely the attribute mix matches the
//! editor's target distribution.

pub mod core;
pub mod schema;
