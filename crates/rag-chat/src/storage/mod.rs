//! Persistent vector index lifecycle

mod index;

pub use index::{IndexOrigin, VectorIndex};
