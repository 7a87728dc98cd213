//! Search predicate assembly against a mapped field set.

use crate::error::QueryError;
use sift_mapper::EntityMetadata;
use std::collections::BTreeMap;
use tracing::debug;

/// Boolean operator applied uniformly between all predicate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryOperator {
    And,
    #[default]
    Or,
}

impl QueryOperator {
    fn separator(self) -> &'static str {
        match self {
            QueryOperator::And => " AND ",
            QueryOperator::Or => " OR ",
        }
    }
}

/// A search query whose predicates are restricted to an entity type's mapped
/// fields.
///
/// Callers add terms by *source* member name; the query translates them to
/// index-side field names. In strict mode (the default) an unmapped field is
/// an error listing every valid name; otherwise the predicate is silently
/// dropped.
#[derive(Debug)]
pub struct SearchQuery {
    entity_type: String,
    /// Index-side field name → source member name.
    mapped_fields: BTreeMap<String, String>,
    use_only_mapped_fields: bool,
    /// (index-side name, value) pairs in insertion order.
    search_terms: Vec<(String, String)>,
    operator: QueryOperator,
    use_wildcards: bool,
    custom_query: Option<String>,
    /// Index-side names selected for projection.
    fields: Vec<String>,
}

impl SearchQuery {
    pub fn new(entity_type: impl Into<String>, mapped_fields: BTreeMap<String, String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            mapped_fields,
            use_only_mapped_fields: true,
            search_terms: Vec::new(),
            operator: QueryOperator::default(),
            use_wildcards: true,
            custom_query: None,
            fields: Vec::new(),
        }
    }

    /// Builds a query over the field mapping of loaded entity metadata.
    pub fn for_entity(metadata: &EntityMetadata) -> Self {
        Self::new(metadata.class_name(), metadata.field_mapping().clone())
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn mapped_fields(&self) -> &BTreeMap<String, String> {
        &self.mapped_fields
    }

    /// Toggles strict mode; on by default.
    pub fn use_only_mapped_fields(&mut self, strict: bool) -> &mut Self {
        self.use_only_mapped_fields = strict;
        self
    }

    pub fn set_operator(&mut self, operator: QueryOperator) -> &mut Self {
        self.operator = operator;
        self
    }

    pub fn set_use_wildcards(&mut self, wildcards: bool) -> &mut Self {
        self.use_wildcards = wildcards;
        self
    }

    /// Overrides predicate assembly entirely.
    pub fn set_custom_query(&mut self, query: impl Into<String>) -> &mut Self {
        self.custom_query = Some(query.into());
        self
    }

    /// Adds a predicate for a source member name, translated to its
    /// index-side field name.
    ///
    /// Re-adding a field updates its value in place, keeping the original
    /// position. Unmapped fields error in strict mode and are dropped with a
    /// debug log otherwise.
    pub fn add_search_term(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<&mut Self, QueryError> {
        let index_name = self
            .mapped_fields
            .iter()
            .find(|(_, source)| source.as_str() == field)
            .map(|(index_name, _)| index_name.clone());

        match index_name {
            Some(index_name) => {
                self.upsert_term(index_name, value.into());
                Ok(self)
            }
            None if self.use_only_mapped_fields => Err(QueryError::FieldNotMapped {
                field: field.to_string(),
                entity_type: self.entity_type.clone(),
                available: self
                    .mapped_fields
                    .values()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
            None => {
                debug!(field = %field, entity_type = %self.entity_type, "dropping unmapped search field");
                Ok(self)
            }
        }
    }

    /// Searches every mapped field for the same value, joined with OR.
    pub fn query_all_fields(&mut self, value: impl Into<String>) -> &mut Self {
        self.operator = QueryOperator::Or;

        let value = value.into();
        let index_names: Vec<String> = self.mapped_fields.keys().cloned().collect();
        for index_name in index_names {
            self.upsert_term(index_name, value.clone());
        }
        self
    }

    /// Selects a source field for projection; unmapped names are ignored.
    pub fn add_field(&mut self, field: &str) -> &mut Self {
        let index_name = self
            .mapped_fields
            .iter()
            .find(|(_, source)| source.as_str() == field)
            .map(|(index_name, _)| index_name.clone());

        if let Some(index_name) = index_name {
            if !self.fields.contains(&index_name) {
                self.fields.push(index_name);
            }
        }
        self
    }

    pub fn search_terms(&self) -> &[(String, String)] {
        &self.search_terms
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Assembles the final query expression.
    ///
    /// A custom query wins outright. Otherwise every accumulated (field,
    /// value) pair becomes a wildcard-wrapped or exact clause, joined with
    /// the single configured operator, in insertion order.
    pub fn build(&self) -> String {
        if let Some(custom) = &self.custom_query {
            return custom.clone();
        }

        let clauses: Vec<String> = self
            .search_terms
            .iter()
            .map(|(field, value)| {
                if self.use_wildcards {
                    format!("{field}:*{value}*")
                } else {
                    format!("{field}:{value}")
                }
            })
            .collect();

        clauses.join(self.operator.separator())
    }

    fn upsert_term(&mut self, index_name: String, value: String) {
        match self
            .search_terms
            .iter_mut()
            .find(|(field, _)| *field == index_name)
        {
            Some(term) => term.1 = value,
            None => self.search_terms.push((index_name, value)),
        }
    }
}
