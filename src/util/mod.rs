// Utility Module - Main module file

pub mod store;

pub use store::{load_cache, read_value, store_derived, write_value, StoreError};
