//! Mapping between text index fields and the RDF predicates feeding them.

use oxigraph::model::vocab::rdfs;
use oxigraph::model::{NamedNode, NamedNodeRef};

/// Key field holding the subject IRI of every document.
pub const FIELD_URI: &str = "uri";
/// Primary field, fed by the configured property.
pub const FIELD_TEXT: &str = "text";
pub const FIELD_LABEL: &str = "label";
pub const FIELD_PREF_LABEL: &str = "prefLabel";

pub const SKOS_PREF_LABEL: NamedNodeRef<'static> =
    NamedNodeRef::new_unchecked("http://www.w3.org/2004/02/skos/core#prefLabel");

/// Which predicates are indexed, and under which field name.
///
/// The primary field is optional; `rdfs:label` and `skos:prefLabel` are
/// always indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    fields: Vec<(&'static str, NamedNode)>,
}

impl EntityDefinition {
    pub fn new(primary: Option<NamedNode>) -> Self {
        let mut fields = Vec::with_capacity(3);
        if let Some(predicate) = primary {
            fields.push((FIELD_TEXT, predicate));
        }
        fields.push((FIELD_LABEL, rdfs::LABEL.into_owned()));
        fields.push((FIELD_PREF_LABEL, SKOS_PREF_LABEL.into_owned()));
        Self { fields }
    }

    /// Every (field, predicate) pair, primary field first.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, NamedNodeRef<'_>)> {
        self.fields.iter().map(|(name, predicate)| (*name, predicate.as_ref()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Fields fed by `predicate`. More than one when the primary property is
    /// itself one of the auxiliary label relations.
    pub fn fields_for_predicate<'a>(
        &'a self,
        predicate: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = &'static str> + 'a {
        self.fields
            .iter()
            .filter(move |(_, p)| p.as_ref() == predicate)
            .map(|(name, _)| *name)
    }

    pub fn is_indexed(&self, predicate: NamedNodeRef<'_>) -> bool {
        self.fields_for_predicate(predicate).next().is_some()
    }
}
