//! The composed graph + text index store.

use crate::config::TextIndexConfig;
use crate::error::{ExecutorError, Result};
use crate::indexing::text_index::TextIndex;
use crate::querying::results::QuerySolutions;
use crate::querying::text_rewriter::TextPatternRewriter;
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{GraphNameRef, Quad};
use oxigraph::sparql::{QueryResults, SparqlEvaluator};
use oxigraph::store::Store;
use spargebra::{Query, SparqlParser};
use std::borrow::Cow;
use std::io::Write;

/// Triple store paired with the text index built from the same quads.
pub struct TextDataset {
    store: Store,
    index: TextIndex,
}

impl TextDataset {
    /// Index `quads`, then add them to a fresh store in one atomic batch.
    ///
    /// Nothing is returned unless both steps succeed, so a caller never holds
    /// a store whose index disagrees with its contents.
    pub fn from_quads(quads: Vec<Quad>, config: &TextIndexConfig) -> Result<Self> {
        let index = TextIndex::build(config, &quads)?;
        let store = Store::new()?;
        store.extend(quads)?;
        Ok(Self { store, index })
    }

    /// Number of triples held by the store.
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }

    pub fn index(&self) -> &TextIndex {
        &self.index
    }

    /// Parse, rewrite text clauses and evaluate a SELECT query.
    pub fn select(&self, query: &str) -> Result<QuerySolutions> {
        let parsed = SparqlParser::new().parse_query(query)?;
        let form = query_form(&parsed);
        if form != "SELECT" {
            return Err(ExecutorError::UnsupportedQueryForm(form));
        }

        let rewriter = TextPatternRewriter::new(&self.index);
        let rewritten = rewriter.rewrite_query(parsed)?;
        let query_text = if rewriter.rewritten_clauses() == 0 {
            Cow::Borrowed(query)
        } else {
            let text = rewritten.to_string();
            log::debug!(
                "Rewrote {} text clause(s), executing: {}",
                rewriter.rewritten_clauses(),
                text
            );
            Cow::Owned(text)
        };

        let evaluator = SparqlEvaluator::new();
        let prepared =
            evaluator.parse_query(&*query_text).map_err(|e| ExecutorError::Query(e.to_string()))?;
        match prepared.on_store(&self.store).execute()? {
            QueryResults::Solutions(solutions) => {
                let variables = solutions.variables().to_vec();
                let rows = solutions.collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(QuerySolutions::new(variables, rows))
            }
            _ => Err(ExecutorError::UnsupportedQueryForm(form)),
        }
    }

    /// Write the default graph as Turtle. The writer is flushed, not closed.
    pub fn dump<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle).for_writer(&mut *writer);
        for quad in
            self.store.quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph))
        {
            serializer.serialize_quad(quad?.as_ref())?;
        }
        serializer.finish()?;
        writer.flush()?;
        Ok(())
    }
}

fn query_form(query: &Query) -> &'static str {
    match query {
        Query::Select { .. } => "SELECT",
        Query::Construct { .. } => "CONSTRUCT",
        Query::Describe { .. } => "DESCRIBE",
        Query::Ask { .. } => "ASK",
    }
}
