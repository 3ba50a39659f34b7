//! Tower Core - Foundational types for the Tower scene editor
//!
//! This crate provides the core types that all other Tower crates depend on:
//! - `Guid` - Canonical object identifiers
//! - `GroupId` - Group tag vocabulary
//! - `Vec3`, `Quat` - Spatial types matching the save document shape
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{DocumentKind, Result, TowerError};
pub use id::{GroupId, Guid, NO_GROUP};
pub use types::{Quat, Vec3};
