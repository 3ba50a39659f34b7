//! Tower Scene - object graph editing for Tower saves
//!
//! This crate holds the dual-view object model and the selection duplication
//! pass that keeps identifiers, connections and group tags consistent.

mod connection;
mod copy;
mod document;
mod groups;
mod object;
mod options;
mod rewrite;
mod save;
mod selection;

pub use connection::{
    empty_connections, FloatProperty, GuidRef, ItemConnection, NameProperty, CONNECTIONS_KEY,
};
pub use copy::{copy_selection, copy_selection_with};
pub use document::Document;
pub use groups::{ActiveSave, GroupRemapper};
pub use object::TowerObject;
pub use options::CopyOptions;
pub use rewrite::{rewrite_document, rewrite_references, ReplacementTable, RewriteMode};
pub use save::MemorySave;
pub use selection::Selection;
