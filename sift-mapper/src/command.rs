//! Pluggable document-construction strategies: entity metadata → document.

use crate::error::{MapperError, MapperResult};
use crate::metadata::EntityMetadata;
use chrono::{DateTime, TimeZone, Utc};
use sift_model::{Document, FieldDescriptor, FieldKind, ID_FIELD};
use serde_json::Value;

/// Builds the externally-facing document from populated metadata.
///
/// Swapping the command changes which fields are emitted and how special
/// types are encoded without touching metadata discovery.
pub trait DocumentCommand: Send + Sync {
    fn create_document(&self, metadata: &EntityMetadata) -> MapperResult<Document>;
}

/// Default strategy: emits the identifier, the type label, and every
/// populated field under its computed index name, with per-field and
/// document-level boosts applied.
#[derive(Debug, Default)]
pub struct MapAllFieldsCommand;

impl DocumentCommand for MapAllFieldsCommand {
    fn create_document(&self, metadata: &EntityMetadata) -> MapperResult<Document> {
        let mut document = Document::new(metadata.document_name());
        document.add_field(ID_FIELD, Value::String(metadata.entity_id()));

        if metadata.boost() > 0.0 {
            document.set_boost(metadata.boost());
        }

        for field in metadata.fields().values() {
            let Some(value) = &field.value else {
                continue;
            };
            if value.is_null() {
                continue;
            }

            let index_name = field.index_name()?;
            let coerced = coerce_value(field, value)?;

            match field.boost_value()? {
                Some(boost) => document.add_field_with_boost(index_name, coerced, boost),
                None => document.add_field(index_name, coerced),
            }
        }

        Ok(document)
    }
}

/// Coerces a raw payload value into the index representation for the field's
/// declared kind. Multi-valued fields coerce element-wise; a bare scalar
/// becomes a one-element list.
fn coerce_value(field: &FieldDescriptor, value: &Value) -> MapperResult<Value> {
    if field.multi_valued {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            scalar => vec![scalar],
        };

        let coerced = items
            .into_iter()
            .map(|item| coerce_scalar(field, item))
            .collect::<MapperResult<Vec<_>>>()?;
        return Ok(Value::Array(coerced));
    }

    coerce_scalar(field, value)
}

fn coerce_scalar(field: &FieldDescriptor, value: &Value) -> MapperResult<Value> {
    let invalid = |message: &str| MapperError::InvalidFieldValue {
        field: field.name.clone(),
        message: format!("{message}, got {value}"),
    };

    match field.kind {
        FieldKind::String | FieldKind::Text => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(invalid("expected a string")),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(invalid("expected a boolean")),
        },
        FieldKind::Integer | FieldKind::Long => match value.as_i64() {
            Some(_) => Ok(value.clone()),
            None => Err(invalid("expected an integer")),
        },
        FieldKind::Float | FieldKind::Double => match value.as_f64() {
            Some(_) => Ok(value.clone()),
            None => Err(invalid("expected a number")),
        },
        FieldKind::Date => coerce_date(value).ok_or_else(|| invalid("expected a date")),
        FieldKind::Location => coerce_location(value).ok_or_else(|| invalid("expected a location")),
    }
}

/// Dates normalize to the index's canonical UTC form, `%Y-%m-%dT%H:%M:%SZ`.
/// Accepts RFC 3339 strings and integer epoch seconds.
fn coerce_date(value: &Value) -> Option<Value> {
    let datetime: DateTime<Utc> = match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s).ok()?.with_timezone(&Utc),
        Value::Number(n) => Utc.timestamp_opt(n.as_i64()?, 0).single()?,
        _ => return None,
    };

    Some(Value::String(
        datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    ))
}

/// Locations encode as `"lat,lon"`. Accepts `{"lat": .., "lon": ..}`
/// objects, `[lat, lon]` pairs, and already-encoded strings.
fn coerce_location(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) if s.contains(',') => Some(value.clone()),
        Value::Object(map) => {
            let lat = map.get("lat")?.as_f64()?;
            let lon = map.get("lon").or_else(|| map.get("lng"))?.as_f64()?;
            Some(Value::String(format!("{lat},{lon}")))
        }
        Value::Array(items) if items.len() == 2 => {
            let lat = items[0].as_f64()?;
            let lon = items[1].as_f64()?;
            Some(Value::String(format!("{lat},{lon}")))
        }
        _ => None,
    }
}
