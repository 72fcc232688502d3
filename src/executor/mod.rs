//! Query executors
//!
//! # Components
//!
//! - **QueryExecutor** - the object-safe surface shared by executors
//! - **DumpQueryExecutor** - SPARQL and text search over a loaded Turtle dump
//! - **TextDataset** - the triple store and text index an executor owns

pub mod dataset;
pub mod dump_executor;

use crate::config::ExecutorDescriptor;
use crate::error::Result;
use crate::querying::results::QuerySolutions;
use std::io::{Read, Write};

pub use dataset::TextDataset;
pub use dump_executor::DumpQueryExecutor;

pub trait QueryExecutor: Send + Sync {
    /// Run a SELECT query against the loaded graph.
    fn sparql(&self, query: &str) -> Result<QuerySolutions>;

    /// Configuration record used to rebuild an equivalent executor.
    fn descriptor(&self) -> ExecutorDescriptor;

    fn write_descriptor(&self, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer(writer, &self.descriptor())?;
        Ok(())
    }

    /// Load the graph from a serialized stream; a no-op once loaded.
    fn initialize(&self, input: &mut dyn Read) -> Result<bool>;

    /// Write the loaded graph into `out`, leaving `out` open.
    fn save(&self, service_id: &str, out: &mut dyn Write) -> Result<()>;

    fn dispose(&self);
}
