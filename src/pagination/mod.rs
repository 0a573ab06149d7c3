//! Pagination over the remote catalog
//!
//! Tracks which page is on screen and drives page loads, discarding any
//! response that was superseded by a newer load before it arrived.

mod controller;
mod window;

pub use controller::*;
pub use window::*;
