//! Materialized SELECT results.

use oxigraph::model::Term;
use oxigraph::sparql::{QuerySolution, Variable};
use std::collections::HashMap;

/// Rows of a SELECT query, collected before the read scope is released.
#[derive(Debug)]
pub struct QuerySolutions {
    variables: Vec<Variable>,
    rows: Vec<QuerySolution>,
}

impl QuerySolutions {
    pub fn new(variables: Vec<Variable>, rows: Vec<QuerySolution>) -> Self {
        Self { variables, rows }
    }

    /// Projected variables, in SELECT order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuerySolution> {
        self.rows.iter()
    }

    /// All values bound to `variable`, one per row that binds it.
    pub fn column(&self, variable: &str) -> Vec<&Term> {
        self.rows.iter().filter_map(|row| row.get(variable)).collect()
    }

    /// Each row as variable name -> term in N-Triples syntax.
    pub fn to_bindings(&self) -> Vec<HashMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter().map(|(var, term)| (var.as_str().to_string(), term.to_string())).collect()
            })
            .collect()
    }
}

impl IntoIterator for QuerySolutions {
    type Item = QuerySolution;
    type IntoIter = std::vec::IntoIter<QuerySolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuerySolutions {
    type Item = &'a QuerySolution;
    type IntoIter = std::slice::Iter<'a, QuerySolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
