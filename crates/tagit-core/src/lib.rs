//! tagit-core - Core library for tagit
//!
//! Tags live inside image file names (`photo @beach @2020.jpg`). This crate
//! holds the tag model, the tag vocabulary, the tracked-file registry with its
//! rename primitive, the startup scan/reconciliation and the persisted state
//! used by every tagit interface.

pub mod audit;
pub mod error;
pub mod export;
pub mod models;
pub mod observer;
pub mod operations;
pub mod registry;
pub mod repository;
pub mod store;

pub use error::{Error, Result};
pub use models::{decode_tag_names, encode_tags, FileEvent, Tag, TaggedFile};
pub use operations::{Interaction, RemovalOutcome, TagOperations};
pub use registry::{RegistryEvent, TagRegistry};
pub use repository::Repository;
