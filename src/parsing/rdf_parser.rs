use crate::error::Result;
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{Graph, GraphName, Quad};
use std::io::Read;

/// Parse a Turtle stream into default-graph quads.
///
/// Parsing is all-or-nothing: the first syntax error aborts and nothing is
/// returned, so callers never index or store half a document.
pub fn parse_turtle<R: Read>(reader: R) -> Result<Vec<Quad>> {
    let quads = RdfParser::from_format(RdfFormat::Turtle)
        .for_reader(reader)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(quads)
}

/// Lift an in-memory graph into default-graph quads.
pub fn graph_to_quads(graph: &Graph) -> Vec<Quad> {
    graph
        .iter()
        .map(|triple| {
            let triple = triple.into_owned();
            Quad::new(triple.subject, triple.predicate, triple.object, GraphName::DefaultGraph)
        })
        .collect()
}
