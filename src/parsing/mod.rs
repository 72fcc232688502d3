//! Turtle input handling

pub mod rdf_parser;

pub use rdf_parser::{graph_to_quads, parse_turtle};
