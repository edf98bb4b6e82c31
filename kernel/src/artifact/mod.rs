//! Artifact module: the versioned model artifact and its loader.
//!
//! `schema` is the wire shape, `model` the validated in-memory value, and
//! `load` the bytes-in entry point joining the two.

pub mod error;
pub mod load;
pub mod model;
pub mod schema;

pub use error::{ArtifactInvariant, LoadError};
pub use load::load;
pub use model::{Model, ModelBuilder};
