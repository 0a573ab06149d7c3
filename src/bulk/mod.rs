//! Bulk "select N items" helper
//!
//! Gathers items starting from the page on screen, fetching following pages
//! one at a time until enough are held, then picks from them by strategy and
//! writes the result to the selection store in a single merge.

mod selector;
mod strategy;

pub use selector::*;
pub use strategy::*;
