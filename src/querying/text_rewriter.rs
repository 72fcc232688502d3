//! Rewrites free-text clauses of a parsed SPARQL query into inline data.
//!
//! A clause is any triple pattern whose predicate is [`TEXT_QUERY`]:
//!
//! ```text
//! ?s text:query "Par"
//! ?s text:query ( rdfs:label "Par" )
//! ?s text:query ( rdfs:label "Par" 10 )
//! ```
//!
//! Each clause is answered by the [`TextSearch`] capability and replaced by a
//! `VALUES` block joined with the rest of its basic graph pattern, so the store
//! evaluates an ordinary SPARQL 1.1 query.

use crate::error::{ExecutorError, Result};
use crate::indexing::text_index::{TextHit, TextRequest, TextSearch};
use oxigraph::model::vocab::rdf;
use spargebra::algebra::GraphPattern;
use spargebra::term::{
    BlankNode, GroundTerm, NamedNode, NamedNodePattern, TermPattern, TriplePattern,
};
use spargebra::Query;
use std::cell::Cell;

/// Predicate marking a free-text clause.
pub const TEXT_QUERY: &str = "http://jena.apache.org/text#query";

pub struct TextPatternRewriter<'a> {
    search: &'a dyn TextSearch,
    rewritten: Cell<usize>,
}

impl<'a> TextPatternRewriter<'a> {
    pub fn new(search: &'a dyn TextSearch) -> Self {
        Self { search, rewritten: Cell::new(0) }
    }

    /// Number of clauses replaced so far.
    pub fn rewritten_clauses(&self) -> usize {
        self.rewritten.get()
    }

    pub fn rewrite_query(&self, query: Query) -> Result<Query> {
        Ok(match query {
            Query::Select { dataset, pattern, base_iri } => {
                Query::Select { dataset, pattern: self.rewrite_pattern(pattern)?, base_iri }
            }
            Query::Construct { template, dataset, pattern, base_iri } => Query::Construct {
                template,
                dataset,
                pattern: self.rewrite_pattern(pattern)?,
                base_iri,
            },
            Query::Describe { dataset, pattern, base_iri } => {
                Query::Describe { dataset, pattern: self.rewrite_pattern(pattern)?, base_iri }
            }
            Query::Ask { dataset, pattern, base_iri } => {
                Query::Ask { dataset, pattern: self.rewrite_pattern(pattern)?, base_iri }
            }
        })
    }

    fn rewrite_pattern(&self, pattern: GraphPattern) -> Result<GraphPattern> {
        Ok(match pattern {
            GraphPattern::Bgp { patterns } => self.rewrite_bgp(patterns)?,
            GraphPattern::Join { left, right } => {
                GraphPattern::Join { left: self.rewrite_boxed(left)?, right: self.rewrite_boxed(right)? }
            }
            GraphPattern::LeftJoin { left, right, expression } => GraphPattern::LeftJoin {
                left: self.rewrite_boxed(left)?,
                right: self.rewrite_boxed(right)?,
                expression,
            },
            GraphPattern::Filter { expr, inner } => {
                GraphPattern::Filter { expr, inner: self.rewrite_boxed(inner)? }
            }
            GraphPattern::Union { left, right } => {
                GraphPattern::Union { left: self.rewrite_boxed(left)?, right: self.rewrite_boxed(right)? }
            }
            GraphPattern::Graph { name, inner } => {
                GraphPattern::Graph { name, inner: self.rewrite_boxed(inner)? }
            }
            GraphPattern::Extend { inner, variable, expression } => {
                GraphPattern::Extend { inner: self.rewrite_boxed(inner)?, variable, expression }
            }
            GraphPattern::Minus { left, right } => {
                GraphPattern::Minus { left: self.rewrite_boxed(left)?, right: self.rewrite_boxed(right)? }
            }
            GraphPattern::OrderBy { inner, expression } => {
                GraphPattern::OrderBy { inner: self.rewrite_boxed(inner)?, expression }
            }
            GraphPattern::Project { inner, variables } => {
                GraphPattern::Project { inner: self.rewrite_boxed(inner)?, variables }
            }
            GraphPattern::Distinct { inner } => {
                GraphPattern::Distinct { inner: self.rewrite_boxed(inner)? }
            }
            GraphPattern::Reduced { inner } => {
                GraphPattern::Reduced { inner: self.rewrite_boxed(inner)? }
            }
            GraphPattern::Slice { inner, start, length } => {
                GraphPattern::Slice { inner: self.rewrite_boxed(inner)?, start, length }
            }
            GraphPattern::Group { inner, variables, aggregates } => {
                GraphPattern::Group { inner: self.rewrite_boxed(inner)?, variables, aggregates }
            }
            // SERVICE bodies run remotely, property paths and inline data carry no clause.
            other => other,
        })
    }

    fn rewrite_boxed(&self, pattern: Box<GraphPattern>) -> Result<Box<GraphPattern>> {
        Ok(Box::new(self.rewrite_pattern(*pattern)?))
    }

    fn rewrite_bgp(&self, patterns: Vec<TriplePattern>) -> Result<GraphPattern> {
        let clauses: Vec<usize> = patterns
            .iter()
            .enumerate()
            .filter(|(_, pattern)| is_text_clause(pattern))
            .map(|(i, _)| i)
            .collect();
        if clauses.is_empty() {
            return Ok(GraphPattern::Bgp { patterns });
        }

        // List cells of `( field "text" limit )` arguments are consumed along with their clause.
        let mut consumed = vec![false; patterns.len()];
        let mut inline_data = Vec::with_capacity(clauses.len());
        for i in clauses {
            consumed[i] = true;
            let request = parse_request(&patterns[i].object, &patterns, &mut consumed)?;
            let hits = self.search.search(&request)?;
            inline_data.push(values_for(&patterns[i].subject, &hits)?);
            self.rewritten.set(self.rewritten.get() + 1);
        }

        let remaining: Vec<TriplePattern> = patterns
            .into_iter()
            .zip(consumed)
            .filter(|(_, consumed)| !consumed)
            .map(|(pattern, _)| pattern)
            .collect();

        let mut rewritten =
            if remaining.is_empty() { None } else { Some(GraphPattern::Bgp { patterns: remaining }) };
        for values in inline_data.into_iter().rev() {
            rewritten = Some(match rewritten {
                None => values,
                Some(rest) => GraphPattern::Join { left: Box::new(values), right: Box::new(rest) },
            });
        }
        Ok(rewritten.unwrap_or_else(|| GraphPattern::Bgp { patterns: Vec::new() }))
    }
}

fn is_text_clause(pattern: &TriplePattern) -> bool {
    matches!(&pattern.predicate, NamedNodePattern::NamedNode(p) if p.as_str() == TEXT_QUERY)
}

fn parse_request(
    argument: &TermPattern,
    patterns: &[TriplePattern],
    consumed: &mut [bool],
) -> Result<TextRequest> {
    match argument {
        TermPattern::Literal(text) => Ok(TextRequest::new(text.value())),
        TermPattern::BlankNode(head) => {
            let items = collect_list(head, patterns, consumed)?;
            parse_argument_list(items)
        }
        other => Err(ExecutorError::TextQuery(format!(
            "expected a string or a list after text:query, found {}",
            other
        ))),
    }
}

fn parse_argument_list(items: Vec<TermPattern>) -> Result<TextRequest> {
    let mut items = items.into_iter().peekable();

    let predicate = if let Some(TermPattern::NamedNode(predicate)) = items.peek() {
        Some(oxigraph::model::NamedNode::new_unchecked(predicate.as_str()))
    } else {
        None
    };
    if predicate.is_some() {
        items.next();
    }

    let mut request = match items.next() {
        Some(TermPattern::Literal(text)) => TextRequest::new(text.value()),
        Some(other) => {
            return Err(ExecutorError::TextQuery(format!("expected a query string, found {}", other)))
        }
        None => return Err(ExecutorError::TextQuery("missing query string".to_string())),
    };
    request.predicate = predicate;

    match items.next() {
        None => {}
        Some(TermPattern::Literal(limit)) => {
            let limit = match limit.value().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ExecutorError::TextQuery(format!(
                        "hit limit must be a positive integer, found {}",
                        limit.value()
                    )))
                }
            };
            request.limit = Some(limit);
        }
        Some(other) => {
            return Err(ExecutorError::TextQuery(format!("expected a hit limit, found {}", other)))
        }
    }

    if let Some(extra) = items.next() {
        return Err(ExecutorError::TextQuery(format!("unexpected argument {}", extra)));
    }
    Ok(request)
}

/// Walk an RDF collection written inline in the same basic graph pattern.
fn collect_list(
    head: &BlankNode,
    patterns: &[TriplePattern],
    consumed: &mut [bool],
) -> Result<Vec<TermPattern>> {
    let mut items = Vec::new();
    let mut cell = head.clone();
    for _ in 0..patterns.len() {
        let first = find_cell(patterns, consumed, &cell, rdf::FIRST.as_str())?;
        let rest = find_cell(patterns, consumed, &cell, rdf::REST.as_str())?;
        consumed[first] = true;
        consumed[rest] = true;
        items.push(patterns[first].object.clone());

        match &patterns[rest].object {
            TermPattern::NamedNode(nil) if nil.as_str() == rdf::NIL.as_str() => return Ok(items),
            TermPattern::BlankNode(next) => cell = next.clone(),
            other => {
                return Err(ExecutorError::TextQuery(format!("malformed argument list at {}", other)))
            }
        }
    }
    Err(ExecutorError::TextQuery("unterminated argument list".to_string()))
}

fn find_cell(
    patterns: &[TriplePattern],
    consumed: &[bool],
    cell: &BlankNode,
    predicate: &str,
) -> Result<usize> {
    patterns
        .iter()
        .enumerate()
        .position(|(i, pattern)| {
            !consumed[i]
                && matches!(&pattern.subject, TermPattern::BlankNode(b) if b == cell)
                && matches!(&pattern.predicate, NamedNodePattern::NamedNode(p) if p.as_str() == predicate)
        })
        .ok_or_else(|| ExecutorError::TextQuery(format!("text:query argument {} is not a list", cell)))
}

fn values_for(subject: &TermPattern, hits: &[TextHit]) -> Result<GraphPattern> {
    match subject {
        TermPattern::Variable(variable) => Ok(GraphPattern::Values {
            variables: vec![variable.clone()],
            bindings: hits
                .iter()
                .map(|hit| {
                    vec![Some(GroundTerm::NamedNode(NamedNode::new_unchecked(hit.subject.as_str())))]
                })
                .collect(),
        }),
        TermPattern::NamedNode(node) => {
            let matched = hits.iter().any(|hit| hit.subject.as_str() == node.as_str());
            Ok(GraphPattern::Values {
                variables: Vec::new(),
                bindings: if matched { vec![Vec::new()] } else { Vec::new() },
            })
        }
        other => Err(ExecutorError::TextQuery(format!(
            "text:query subject must be a variable or an IRI, found {}",
            other
        ))),
    }
}
