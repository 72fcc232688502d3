//! Configuration structures for the text index and the executor descriptor

use crate::error::{ExecutorError, Result};
use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};

/// Default shingle window, in characters.
pub const DEFAULT_MIN_GRAM: usize = 3;
pub const DEFAULT_MAX_GRAM: usize = 3;

/// Default cap on subjects returned by one text clause.
pub const DEFAULT_MAX_HITS: usize = 10_000;

/// Arena handed to the single index writer thread.
pub const DEFAULT_WRITER_MEMORY_BYTES: usize = 20_000_000;

/// Smallest per-thread writer arena tantivy accepts.
pub const MIN_WRITER_MEMORY_BYTES: usize = 15_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextIndexConfig {
    /// Literal-valued property indexed into the primary `text` field
    pub property_uri: Option<String>,
    /// Shortest shingle produced by the analyzer
    pub min_gram: usize,
    /// Longest shingle produced by the analyzer
    pub max_gram: usize,
    /// Hit limit applied when a text clause does not carry its own
    pub max_hits: usize,
    /// Memory budget of the index writer
    pub writer_memory_bytes: usize,
}

impl Default for TextIndexConfig {
    fn default() -> Self {
        Self {
            property_uri: None,
            min_gram: DEFAULT_MIN_GRAM,
            max_gram: DEFAULT_MAX_GRAM,
            max_hits: DEFAULT_MAX_HITS,
            writer_memory_bytes: DEFAULT_WRITER_MEMORY_BYTES,
        }
    }
}

impl TextIndexConfig {
    pub fn with_property(property_uri: impl Into<String>) -> Self {
        Self { property_uri: Some(property_uri.into()), ..Self::default() }
    }

    pub fn ngram_window(mut self, min_gram: usize, max_gram: usize) -> Self {
        self.min_gram = min_gram;
        self.max_gram = max_gram;
        self
    }

    pub fn max_hits(mut self, max_hits: usize) -> Self {
        self.max_hits = max_hits;
        self
    }

    /// Checks the shingle window, hit limit, writer memory and property IRI.
    pub fn validate(&self) -> Result<()> {
        if self.min_gram == 0 {
            return Err(ExecutorError::Config("min_gram must be at least 1".to_string()));
        }
        if self.min_gram > self.max_gram {
            return Err(ExecutorError::Config(format!(
                "min_gram ({}) must not exceed max_gram ({})",
                self.min_gram, self.max_gram
            )));
        }
        if self.max_hits == 0 {
            return Err(ExecutorError::Config("max_hits must be at least 1".to_string()));
        }
        if self.writer_memory_bytes < MIN_WRITER_MEMORY_BYTES {
            return Err(ExecutorError::Config(format!(
                "writer_memory_bytes ({}) must be at least {}",
                self.writer_memory_bytes, MIN_WRITER_MEMORY_BYTES
            )));
        }
        self.property()?;
        Ok(())
    }

    /// The property selector parsed as an IRI.
    pub fn property(&self) -> Result<Option<NamedNode>> {
        self.property_uri
            .as_deref()
            .map(|iri| {
                NamedNode::new(iri).map_err(|e| {
                    ExecutorError::Config(format!("invalid property IRI <{}>: {}", iri, e))
                })
            })
            .transpose()
    }
}

/// Persistable record describing how an executor was configured.
///
/// Serialized as `{"type":"dump"}` or `{"type":"dump","propertyUri":"..."}`.
/// It describes configuration only, never index or graph contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExecutorDescriptor {
    Dump {
        #[serde(rename = "propertyUri", default, skip_serializing_if = "Option::is_none")]
        property_uri: Option<String>,
    },
}

impl ExecutorDescriptor {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn property_uri(&self) -> Option<&str> {
        match self {
            ExecutorDescriptor::Dump { property_uri } => property_uri.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_trigram() {
        let config = TextIndexConfig::default();
        assert_eq!(config.min_gram, 3);
        assert_eq!(config.max_gram, 3);
        assert!(config.property_uri.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_ngram_window() {
        assert!(TextIndexConfig::default().ngram_window(0, 3).validate().is_err());
        assert!(TextIndexConfig::default().ngram_window(4, 2).validate().is_err());
        assert!(TextIndexConfig::default().ngram_window(2, 4).validate().is_ok());
    }

    #[test]
    fn test_writer_memory_floor() {
        let config = TextIndexConfig { writer_memory_bytes: 1_000_000, ..TextIndexConfig::default() };
        assert!(matches!(config.validate(), Err(ExecutorError::Config(_))));

        let config =
            TextIndexConfig { writer_memory_bytes: MIN_WRITER_MEMORY_BYTES, ..TextIndexConfig::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_hits_rejected() {
        assert!(TextIndexConfig::default().max_hits(0).validate().is_err());
        assert_eq!(TextIndexConfig::default().max_hits(25).max_hits, 25);
    }

    #[test]
    fn test_invalid_property_iri() {
        let config = TextIndexConfig::with_property("not an iri");
        assert!(matches!(config.validate(), Err(ExecutorError::Config(_))));
    }

    #[test]
    fn test_config_json_uses_camel_case() {
        let config = TextIndexConfig::with_property("http://example.org/name");
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["propertyUri"], "http://example.org/name");
        assert_eq!(json["minGram"], 3);

        let parsed: TextIndexConfig = serde_json::from_str(r#"{"maxHits": 5}"#).unwrap();
        assert_eq!(parsed.max_hits, 5);
        assert_eq!(parsed.min_gram, DEFAULT_MIN_GRAM);
    }

    #[test]
    fn test_descriptor_without_property() {
        let descriptor = ExecutorDescriptor::Dump { property_uri: None };
        assert_eq!(descriptor.to_json().unwrap(), r#"{"type":"dump"}"#);
    }

    #[test]
    fn test_descriptor_with_property() {
        let descriptor = ExecutorDescriptor::Dump {
            property_uri: Some("http://www.w3.org/2000/01/rdf-schema#label".to_string()),
        };
        let json = descriptor.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"type":"dump","propertyUri":"http://www.w3.org/2000/01/rdf-schema#label"}"#
        );
        assert_eq!(ExecutorDescriptor::from_json(&json).unwrap(), descriptor);
    }

    #[test]
    fn test_descriptor_rejects_unknown_type() {
        assert!(ExecutorDescriptor::from_json(r#"{"type":"sparql-endpoint"}"#).is_err());
    }
}
