//! SPARQL over a Turtle dump, with full-text search over chosen literals.
//!
//! The executor is built once per dump and is costly to build; share one
//! instance (behind an `Arc`) between callers.
//!
//! # Example
//!
//! ```rust
//! use rdf_text_search::DumpQueryExecutor;
//!
//! let executor = DumpQueryExecutor::with_property("http://www.w3.org/2000/01/rdf-schema#label")?;
//! executor.initialize(
//!     r#"<ex:Paris> <http://www.w3.org/2000/01/rdf-schema#label> "Paris" ."#.as_bytes(),
//! )?;
//!
//! let results = executor.sparql(
//!     r#"PREFIX text: <http://jena.apache.org/text#>
//!        SELECT ?s WHERE { ?s text:query "Par" }"#,
//! )?;
//! assert_eq!(results.len(), 1);
//! # Ok::<(), rdf_text_search::ExecutorError>(())
//! ```

use crate::config::{ExecutorDescriptor, TextIndexConfig};
use crate::error::{ExecutorError, Result};
use crate::executor::dataset::TextDataset;
use crate::executor::QueryExecutor;
use crate::parsing::rdf_parser::{graph_to_quads, parse_turtle};
use crate::querying::results::QuerySolutions;
use oxigraph::model::Graph;
use parking_lot::RwLock;
use std::io::{Read, Write};

/// Lifecycle of an executor.
///
/// `Unloaded → Loaded` happens once, and only after a load fully succeeds.
/// `Disposed` is terminal.
enum ExecutorState {
    Unloaded,
    Loaded(TextDataset),
    Disposed,
}

impl ExecutorState {
    fn name(&self) -> &'static str {
        match self {
            ExecutorState::Unloaded => "unloaded",
            ExecutorState::Loaded(_) => "loaded",
            ExecutorState::Disposed => "disposed",
        }
    }
}

pub struct DumpQueryExecutor {
    config: TextIndexConfig,
    state: RwLock<ExecutorState>,
}

impl Default for DumpQueryExecutor {
    fn default() -> Self {
        Self { config: TextIndexConfig::default(), state: RwLock::new(ExecutorState::Unloaded) }
    }
}

impl DumpQueryExecutor {
    /// Unloaded executor; nothing is indexed until [`initialize`](Self::initialize).
    pub fn new(config: TextIndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, state: RwLock::new(ExecutorState::Unloaded) })
    }

    /// Unloaded executor indexing `property_uri` with the default shingle window.
    pub fn with_property(property_uri: impl Into<String>) -> Result<Self> {
        Self::new(TextIndexConfig::with_property(property_uri))
    }

    /// Loaded executor over an already materialized graph.
    pub fn from_graph(graph: &Graph, config: TextIndexConfig) -> Result<Self> {
        config.validate()?;
        let dataset = TextDataset::from_quads(graph_to_quads(graph), &config)?;
        log::info!(
            "Loaded {} triples from an in-memory graph ({} text documents)",
            graph.len(),
            dataset.index().document_count()
        );
        Ok(Self { config, state: RwLock::new(ExecutorState::Loaded(dataset)) })
    }

    /// Unloaded executor configured from a persisted descriptor.
    pub fn from_descriptor(descriptor: &ExecutorDescriptor) -> Result<Self> {
        match descriptor.property_uri() {
            Some(property_uri) => Self::with_property(property_uri),
            None => Self::new(TextIndexConfig::default()),
        }
    }

    pub fn config(&self) -> &TextIndexConfig {
        &self.config
    }

    pub fn property_uri(&self) -> Option<&str> {
        self.config.property_uri.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(*self.state.read(), ExecutorState::Loaded(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(*self.state.read(), ExecutorState::Disposed)
    }

    /// Load and index a Turtle stream.
    ///
    /// Returns `Ok(true)` when this call loaded the graph and `Ok(false)` when
    /// the executor was already loaded. On error the executor stays unloaded
    /// and may be initialized again.
    pub fn initialize<R: Read>(&self, reader: R) -> Result<bool> {
        if self.is_loaded() {
            return Ok(false);
        }

        let mut state = self.state.write();
        match &*state {
            ExecutorState::Loaded(_) => return Ok(false),
            ExecutorState::Disposed => {
                log::warn!("Refusing to initialize a disposed executor");
                return Err(ExecutorError::Disposed);
            }
            ExecutorState::Unloaded => {}
        }

        let quads = parse_turtle(reader)?;
        let dataset = TextDataset::from_quads(quads, &self.config)?;
        log::info!(
            "Loaded {} triples ({} text documents, property {})",
            dataset.len()?,
            dataset.index().document_count(),
            self.property_uri().unwrap_or("none")
        );
        *state = ExecutorState::Loaded(dataset);
        Ok(true)
    }

    /// Run a SELECT query.
    ///
    /// The read scope is held only for the duration of the call and released
    /// whether the query succeeds or fails.
    pub fn sparql(&self, query: &str) -> Result<QuerySolutions> {
        let state = self.state.read();
        let ExecutorState::Loaded(dataset) = &*state else {
            log::debug!("Query rejected, executor is {}", state.name());
            return Err(ExecutorError::NotLoaded);
        };
        dataset.select(query)
    }

    /// Number of triples in the loaded graph.
    pub fn triple_count(&self) -> Result<usize> {
        let state = self.state.read();
        match &*state {
            ExecutorState::Loaded(dataset) => dataset.len(),
            _ => Err(ExecutorError::NotLoaded),
        }
    }

    pub fn descriptor(&self) -> ExecutorDescriptor {
        ExecutorDescriptor::Dump { property_uri: self.config.property_uri.clone() }
    }

    /// Serialize the descriptor as JSON into `writer`.
    pub fn write_descriptor<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, &self.descriptor())?;
        Ok(())
    }

    /// Write the loaded graph as Turtle into `out`.
    ///
    /// `out` is flushed but stays open; closing it is up to the caller.
    pub fn save<W: Write + ?Sized>(&self, service_id: &str, out: &mut W) -> Result<()> {
        let state = self.state.read();
        let ExecutorState::Loaded(dataset) = &*state else {
            return Err(ExecutorError::NotLoaded);
        };
        log::debug!("Saving dump for service {}", service_id);
        dataset.dump(out)
    }

    /// Release the store and the index. Every later query fails.
    pub fn dispose(&self) {
        let previous = std::mem::replace(&mut *self.state.write(), ExecutorState::Disposed);
        if let ExecutorState::Loaded(_) = previous {
            log::info!("Disposed executor, store and text index released");
        }
    }
}

impl QueryExecutor for DumpQueryExecutor {
    fn sparql(&self, query: &str) -> Result<QuerySolutions> {
        DumpQueryExecutor::sparql(self, query)
    }

    fn descriptor(&self) -> ExecutorDescriptor {
        DumpQueryExecutor::descriptor(self)
    }

    fn initialize(&self, input: &mut dyn Read) -> Result<bool> {
        DumpQueryExecutor::initialize(self, input)
    }

    fn save(&self, service_id: &str, out: &mut dyn Write) -> Result<()> {
        DumpQueryExecutor::save(self, service_id, out)
    }

    fn dispose(&self) {
        DumpQueryExecutor::dispose(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        <http://example.org/paris> rdfs:label "Paris" .
    "#;

    #[test]
    fn test_state_transitions() {
        let executor = DumpQueryExecutor::default();
        assert!(!executor.is_loaded());
        assert!(!executor.is_disposed());

        assert!(executor.initialize(DATA.as_bytes()).unwrap());
        assert!(executor.is_loaded());

        executor.dispose();
        assert!(!executor.is_loaded());
        assert!(executor.is_disposed());
    }

    #[test]
    fn test_initialize_after_dispose_fails() {
        let executor = DumpQueryExecutor::default();
        executor.dispose();
        let result = executor.initialize(DATA.as_bytes());
        assert!(matches!(result, Err(ExecutorError::Disposed)));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = TextIndexConfig::default().ngram_window(5, 2);
        assert!(matches!(DumpQueryExecutor::new(config), Err(ExecutorError::Config(_))));
    }

    #[test]
    fn test_triple_count_requires_loaded() {
        let executor = DumpQueryExecutor::default();
        assert!(executor.triple_count().unwrap_err().is_not_loaded());
        executor.initialize(DATA.as_bytes()).unwrap();
        assert_eq!(executor.triple_count().unwrap(), 1);
    }

    #[test]
    fn test_executor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DumpQueryExecutor>();
    }
}
