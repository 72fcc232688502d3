//! # rdf-text-search
//!
//! SPARQL over an RDF dump, with free-text search over selected literals.
//!
//! A [`DumpQueryExecutor`] loads a Turtle document into an in-memory triple
//! store and builds an n-gram inverted index over one configurable literal
//! property plus `rdfs:label` and `skos:prefLabel`. Queries are standard
//! SPARQL 1.1; the `text:query` predicate (`<http://jena.apache.org/text#query>`)
//! performs a full-text lookup inside any graph pattern.
//!
//! ## Features
//!
//! - Lazy, idempotent loading from any `Read`
//! - Substring search through 3-character shingles (configurable window)
//! - Turtle dump of the loaded graph into a caller-owned writer
//! - JSON descriptor to persist and rebuild the executor configuration
//!
//! ## Example
//!
//! ```rust
//! use rdf_text_search::{DumpQueryExecutor, Result};
//!
//! fn example() -> Result<()> {
//!     let executor = DumpQueryExecutor::default();
//!     executor.initialize(
//!         r#"<ex:Paris> <http://www.w3.org/2000/01/rdf-schema#label> "Paris" ."#.as_bytes(),
//!     )?;
//!     let results = executor.sparql(
//!         r#"SELECT ?s WHERE { ?s <http://jena.apache.org/text#query> "Par" }"#,
//!     )?;
//!     println!("{:?}", results.to_bindings());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::len_without_is_empty)]

/// Text index and executor configuration
pub mod config;

/// Error types and result definitions
pub mod error;

/// Query executors and the store they own
pub mod executor;

/// Full-text indexing of literal properties
pub mod indexing;

/// Turtle input handling
pub mod parsing;

/// SPARQL rewriting and results
pub mod querying;

// Re-export commonly used types
pub use config::{ExecutorDescriptor, TextIndexConfig};
pub use error::{ExecutorError, Result};
pub use executor::{DumpQueryExecutor, QueryExecutor, TextDataset};
pub use indexing::{TextHit, TextRequest, TextSearch};
pub use querying::{QuerySolutions, TEXT_QUERY};
