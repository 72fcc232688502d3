//! Error types for executor operations

use thiserror::Error;

/// Result type alias for executor operations
pub type Result<T> = std::result::Result<T, ExecutorError>;

/// Main error type for the dump query executor
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The executor holds no loaded graph (never initialized, or disposed)
    #[error("Model is not loaded")]
    NotLoaded,

    /// The executor was disposed and can no longer be initialized
    #[error("Executor has been disposed")]
    Disposed,

    /// Invalid text index configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed Turtle input
    #[error("Parse error: {0}")]
    RdfParse(#[from] oxigraph::io::RdfParseError),

    /// Malformed SPARQL query text
    #[error("Query syntax error: {0}")]
    QuerySyntax(#[from] spargebra::SparqlSyntaxError),

    /// Query rejected by the store's own SPARQL parser
    #[error("Query error: {0}")]
    Query(String),

    /// SPARQL evaluation failure
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] oxigraph::sparql::QueryEvaluationError),

    /// Only SELECT queries produce a result set
    #[error("Unsupported query form: {0}")]
    UnsupportedQueryForm(&'static str),

    /// Malformed text search clause
    #[error("Text query error: {0}")]
    TextQuery(String),

    /// Triple store failure
    #[error("Store error: {0}")]
    Storage(#[from] oxigraph::store::StorageError),

    /// Text index failure
    #[error("Index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    /// Turtle serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Descriptor (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutorError {
    /// Returns true for the error raised when no graph is available to query.
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, ExecutorError::NotLoaded)
    }
}
