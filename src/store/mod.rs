//! Store module for remembering the last location between runs
//!
//! `KeyValueStore` keeps string entries in a JSON file in the user's data
//! directory; `LastLocationStore` layers the last-location record on top of
//! it and turns every storage failure into a logged no-op.

mod last_location;
mod manager;

pub use last_location::{LastLocationStore, StoredLocation};
pub use manager::{KeyValueStore, StoreError};
