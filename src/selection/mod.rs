//! Selection state and its persistence
//!
//! The selection is an ordered map from catalog identifier to a small
//! snapshot record, mirrored into a key-value blob store after every change.

mod blob;
mod record;
mod store;

pub use blob::*;
pub use record::*;
pub use store::*;
