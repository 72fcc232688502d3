//! In-memory inverted index over literal shingles.
//!
//! ```text
//! Turtle → Quad → (subject, field, literal) → TantivyDocument → RAM index
//! ```
//!
//! One document is written per indexed triple. A text request matches a
//! document when the document's field contains every shingle of the request
//! text, which makes any substring of at least `min_gram` characters a hit.

use crate::config::TextIndexConfig;
use crate::error::{ExecutorError, Result};
use crate::indexing::analyzer::{build_ngram_analyzer, shingles, NGRAM_TOKENIZER};
use crate::indexing::entity::{EntityDefinition, FIELD_URI};
use oxigraph::model::{NamedNode, NamedNodeRef, Quad, Term};
use std::collections::HashSet;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED, STRING,
};
use tantivy::tokenizer::TextAnalyzer;
use tantivy::{doc, Index, IndexReader, ReloadPolicy, TantivyDocument, Term as IndexTerm};

/// A free-text lookup over the designated fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    pub text: String,
    /// Restrict the lookup to the field fed by this predicate
    pub predicate: Option<NamedNode>,
    /// Overrides the configured hit limit
    pub limit: Option<usize>,
}

impl TextRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), predicate: None, limit: None }
    }

    pub fn on_predicate(mut self, predicate: NamedNode) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A subject bearing at least one literal that matched.
#[derive(Debug, Clone, PartialEq)]
pub struct TextHit {
    pub subject: NamedNode,
    pub score: f32,
}

/// Indexed free-text predicates over designated fields.
///
/// This is the capability the query layer relies on; the rewriter never
/// touches the index directly.
pub trait TextSearch {
    /// Matching subjects, best first, each subject at most once.
    fn search(&self, request: &TextRequest) -> Result<Vec<TextHit>>;
}

struct IndexFields {
    uri: Field,
    text_fields: Vec<(&'static str, Field)>,
}

pub struct TextIndex {
    reader: IndexReader,
    fields: IndexFields,
    entity: EntityDefinition,
    analyzer: TextAnalyzer,
    max_hits: usize,
    document_count: u64,
}

impl TextIndex {
    /// Build the index from `quads` in one commit.
    pub fn build<'a>(
        config: &TextIndexConfig,
        quads: impl IntoIterator<Item = &'a Quad>,
    ) -> Result<Self> {
        config.validate()?;
        let entity = EntityDefinition::new(config.property()?);
        let (schema, fields) = build_schema(&entity);

        let index = Index::create_in_ram(schema);
        let analyzer = build_ngram_analyzer(config.min_gram, config.max_gram)?;
        index.tokenizers().register(NGRAM_TOKENIZER, analyzer.clone());

        let mut writer = index.writer_with_num_threads(1, config.writer_memory_bytes)?;
        let mut document_count = 0u64;
        let mut skipped_blank_subjects = 0usize;

        for quad in quads {
            let Term::Literal(literal) = &quad.object else {
                continue;
            };
            if !entity.is_indexed(quad.predicate.as_ref()) {
                continue;
            }
            let Term::NamedNode(subject) = Term::from(quad.subject.clone()) else {
                skipped_blank_subjects += 1;
                continue;
            };
            for field_name in entity.fields_for_predicate(quad.predicate.as_ref()) {
                let Some(field) = fields.text_field(field_name) else {
                    continue;
                };
                writer.add_document(doc!(
                    fields.uri => subject.as_str().to_string(),
                    field => literal.value().to_string(),
                ))?;
                document_count += 1;
            }
        }

        writer.commit()?;

        if skipped_blank_subjects > 0 {
            log::debug!(
                "Skipped {} indexed literals attached to blank nodes",
                skipped_blank_subjects
            );
        }

        let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;

        Ok(Self {
            reader,
            fields,
            entity,
            analyzer,
            max_hits: config.max_hits,
            document_count,
        })
    }

    /// Number of (subject, field, literal) documents written.
    pub fn document_count(&self) -> u64 {
        self.document_count
    }

    pub fn entity(&self) -> &EntityDefinition {
        &self.entity
    }

    fn target_fields(&self, predicate: Option<NamedNodeRef<'_>>) -> Result<Vec<Field>> {
        let Some(predicate) = predicate else {
            return Ok(self.fields.text_fields.iter().map(|(_, field)| *field).collect());
        };
        let fields: Vec<Field> = self
            .entity
            .fields_for_predicate(predicate)
            .filter_map(|name| self.fields.text_field(name))
            .collect();
        if fields.is_empty() {
            return Err(ExecutorError::TextQuery(format!("{} is not an indexed property", predicate)));
        }
        Ok(fields)
    }
}

impl TextSearch for TextIndex {
    fn search(&self, request: &TextRequest) -> Result<Vec<TextHit>> {
        let fields = self.target_fields(request.predicate.as_ref().map(NamedNode::as_ref))?;

        let mut analyzer = self.analyzer.clone();
        let grams = shingles(&mut analyzer, &request.text);
        if grams.is_empty() {
            return Ok(Vec::new());
        }

        let per_field: Vec<(Occur, Box<dyn Query>)> = fields
            .into_iter()
            .map(|field| {
                let all_grams: Vec<(Occur, Box<dyn Query>)> = grams
                    .iter()
                    .map(|gram| {
                        let term = IndexTerm::from_field_text(field, gram);
                        let query: Box<dyn Query> =
                            Box::new(TermQuery::new(term, IndexRecordOption::Basic));
                        (Occur::Must, query)
                    })
                    .collect();
                let query: Box<dyn Query> = Box::new(BooleanQuery::new(all_grams));
                (Occur::Should, query)
            })
            .collect();
        let query = BooleanQuery::new(per_field);

        let limit = request.limit.unwrap_or(self.max_hits);
        if limit == 0 {
            return Err(ExecutorError::TextQuery("hit limit must be at least 1".to_string()));
        }
        let searcher = self.reader.searcher();
        // Several documents can share a subject; over-fetch so the limit
        // applies to distinct subjects.
        let fetch = limit.saturating_mul(self.fields.text_fields.len()).max(limit);
        let top_docs = searcher.search(&query, &TopDocs::with_limit(fetch))?;

        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for (score, address) in top_docs {
            let document: TantivyDocument = searcher.doc(address)?;
            let Some(uri) = document.get_first(self.fields.uri).and_then(|v| v.as_str()) else {
                continue;
            };
            if !seen.insert(uri.to_string()) {
                continue;
            }
            hits.push(TextHit { subject: NamedNode::new_unchecked(uri), score });
            if hits.len() == limit {
                break;
            }
        }

        log::debug!(
            "Text search {:?} matched {} subject(s) out of {} documents",
            request.text,
            hits.len(),
            self.document_count
        );
        Ok(hits)
    }
}

impl IndexFields {
    fn text_field(&self, name: &str) -> Option<Field> {
        self.text_fields.iter().find(|(n, _)| *n == name).map(|(_, field)| *field)
    }
}

fn build_schema(entity: &EntityDefinition) -> (Schema, IndexFields) {
    let mut schema_builder = Schema::builder();

    let uri = schema_builder.add_text_field(FIELD_URI, STRING | STORED);

    let text_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(NGRAM_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqs),
    );
    let text_fields = entity
        .field_names()
        .map(|name| (name, schema_builder.add_text_field(name, text_options.clone())))
        .collect();

    (schema_builder.build(), IndexFields { uri, text_fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::entity::SKOS_PREF_LABEL;
    use oxigraph::model::vocab::rdfs;
    use oxigraph::model::{BlankNode, GraphName, Literal};

    fn node(iri: &str) -> NamedNode {
        NamedNode::new(iri).unwrap()
    }

    fn literal_quad(subject: &str, predicate: NamedNode, value: &str) -> Quad {
        Quad::new(node(subject), predicate, Literal::new_simple_literal(value), GraphName::DefaultGraph)
    }

    fn sample_quads() -> Vec<Quad> {
        let name = node("http://xmlns.com/foaf/0.1/name");
        vec![
            literal_quad("http://example.org/paris", rdfs::LABEL.into_owned(), "Paris"),
            literal_quad("http://example.org/parma", rdfs::LABEL.into_owned(), "Parma"),
            literal_quad("http://example.org/lyon", rdfs::LABEL.into_owned(), "Lyon"),
            literal_quad("http://example.org/alice", name, "Alice Parker"),
            Quad::new(
                node("http://example.org/lyon"),
                node("http://example.org/near"),
                node("http://example.org/paris"),
                GraphName::DefaultGraph,
            ),
        ]
    }

    fn subjects(hits: &[TextHit]) -> Vec<&str> {
        let mut subjects: Vec<&str> = hits.iter().map(|h| h.subject.as_str()).collect();
        subjects.sort_unstable();
        subjects
    }

    #[test]
    fn test_only_configured_predicates_are_indexed() {
        let quads = sample_quads();
        let index = TextIndex::build(&TextIndexConfig::default(), &quads).unwrap();
        assert_eq!(index.document_count(), 3);

        let config = TextIndexConfig::with_property("http://xmlns.com/foaf/0.1/name");
        let index = TextIndex::build(&config, &quads).unwrap();
        assert_eq!(index.document_count(), 4);
    }

    #[test]
    fn test_substring_search() {
        let quads = sample_quads();
        let index = TextIndex::build(&TextIndexConfig::default(), &quads).unwrap();

        let hits = index.search(&TextRequest::new("Par")).unwrap();
        assert_eq!(subjects(&hits), vec!["http://example.org/paris", "http://example.org/parma"]);

        let hits = index.search(&TextRequest::new("aris")).unwrap();
        assert_eq!(subjects(&hits), vec!["http://example.org/paris"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let quads = sample_quads();
        let index = TextIndex::build(&TextIndexConfig::default(), &quads).unwrap();
        let hits = index.search(&TextRequest::new("LYO")).unwrap();
        assert_eq!(subjects(&hits), vec!["http://example.org/lyon"]);
    }

    #[test]
    fn test_no_match_and_short_text() {
        let quads = sample_quads();
        let index = TextIndex::build(&TextIndexConfig::default(), &quads).unwrap();
        assert!(index.search(&TextRequest::new("Berlin")).unwrap().is_empty());
        assert!(index.search(&TextRequest::new("Pa")).unwrap().is_empty());
    }

    #[test]
    fn test_predicate_restriction() {
        let quads = sample_quads();
        let config = TextIndexConfig::with_property("http://xmlns.com/foaf/0.1/name");
        let index = TextIndex::build(&config, &quads).unwrap();

        let all = index.search(&TextRequest::new("Par")).unwrap();
        assert_eq!(all.len(), 3);

        let names_only = index
            .search(&TextRequest::new("Par").on_predicate(node("http://xmlns.com/foaf/0.1/name")))
            .unwrap();
        assert_eq!(subjects(&names_only), vec!["http://example.org/alice"]);

        let unindexed = index.search(&TextRequest::new("Par").on_predicate(node("http://example.org/near")));
        assert!(matches!(unindexed, Err(ExecutorError::TextQuery(_))));
    }

    #[test]
    fn test_limit_counts_distinct_subjects() {
        let quads = sample_quads();
        let index = TextIndex::build(&TextIndexConfig::default(), &quads).unwrap();
        let hits = index.search(&TextRequest::new("Par").with_limit(1)).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let quads = sample_quads();
        let index = TextIndex::build(&TextIndexConfig::default(), &quads).unwrap();
        let result = index.search(&TextRequest::new("Par").with_limit(0));
        assert!(matches!(result, Err(ExecutorError::TextQuery(_))));
    }

    #[test]
    fn test_configured_max_hits_caps_unbounded_requests() {
        let quads = sample_quads();
        let index = TextIndex::build(&TextIndexConfig::default().max_hits(1), &quads).unwrap();
        assert_eq!(index.search(&TextRequest::new("Par")).unwrap().len(), 1);
        assert_eq!(index.search(&TextRequest::new("Par").with_limit(5)).unwrap().len(), 2);
    }

    #[test]
    fn test_entity_follows_configured_property() {
        let quads = sample_quads();
        let config = TextIndexConfig::with_property("http://example.org/name");
        let index = TextIndex::build(&config, &quads).unwrap();
        assert!(index.entity().is_indexed(node("http://example.org/name").as_ref()));
        assert!(index.entity().is_indexed(rdfs::LABEL));
        assert!(!index.entity().is_indexed(node("http://example.org/near").as_ref()));
    }

    #[test]
    fn test_subject_reported_once() {
        let mut quads = sample_quads();
        quads.push(literal_quad(
            "http://example.org/paris",
            SKOS_PREF_LABEL.into_owned(),
            "Paris, France",
        ));
        let index = TextIndex::build(&TextIndexConfig::default(), &quads).unwrap();
        let hits = index.search(&TextRequest::new("Paris")).unwrap();
        assert_eq!(subjects(&hits), vec!["http://example.org/paris"]);
    }

    #[test]
    fn test_blank_node_subjects_are_skipped() {
        let quads = vec![Quad::new(
            BlankNode::default(),
            rdfs::LABEL,
            Literal::new_simple_literal("Anonymous"),
            GraphName::DefaultGraph,
        )];
        let index = TextIndex::build(&TextIndexConfig::default(), &quads).unwrap();
        assert_eq!(index.document_count(), 0);
        assert!(index.search(&TextRequest::new("Anon")).unwrap().is_empty());
    }
}
