//! Full-text indexing of literal properties
//!
//! - **entity** - which predicates feed which index fields
//! - **analyzer** - the n-gram analyzer shared by indexing and querying
//! - **text_index** - the in-memory index and the `TextSearch` capability

pub mod analyzer;
pub mod entity;
pub mod text_index;

pub use entity::EntityDefinition;
pub use text_index::{TextHit, TextIndex, TextRequest, TextSearch};
