//! SPARQL query support
//!
//! - **text_rewriter** - answers `text:query` clauses and inlines their hits
//! - **results** - SELECT rows materialized for the caller

pub mod results;
pub mod text_rewriter;

pub use results::QuerySolutions;
pub use text_rewriter::{TextPatternRewriter, TEXT_QUERY};
