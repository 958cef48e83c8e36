//! Static resource descriptors.
//!
//! # Responsibility
//! - Describe a resource's field set and constraints, duplicate key,
//!   filter attribute and mutable-on-update field list.
//! - Project typed records to and from their flat JSON field map.
//!
//! # Invariants
//! - Every name listed in `duplicate_key`, `filter.field` and
//!   `mutable_fields` is declared in `fields`.
//! - `fields` never contains the identity (`id`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Store-assigned surrogate identity.
pub type RecordId = i64;

/// JSON key and column name of the identity.
pub const ID_FIELD: &str = "id";

/// A full-match regular expression attached to a text field.
#[derive(Debug)]
pub struct FieldPattern {
    /// Message reported when a value does not conform.
    pub message: &'static str,
    pub regex: Lazy<Regex>,
}

impl FieldPattern {
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Constraint declared on a single field.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    /// Non-blank text whose character count lies in `min..=max`.
    Text {
        min: usize,
        max: usize,
        pattern: Option<&'static FieldPattern>,
    },
    /// Integer in `min..=max`.
    Integer { min: i64, max: i64 },
}

#[derive(Debug)]
pub struct FieldSpec {
    /// JSON key on the wire.
    pub name: &'static str,
    /// Column in the resource table.
    pub column: &'static str,
    pub rule: FieldRule,
}

/// The single attribute exposed through `/{segment}/{value}`.
#[derive(Debug)]
pub struct FilterSpec {
    pub field: &'static str,
    pub segment: &'static str,
}

#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Singular resource name used in logs and messages.
    pub name: &'static str,
    /// Collection route, e.g. `/api/samples`.
    pub route_prefix: &'static str,
    /// Optional literal segment placed before `{id}` in item routes.
    pub id_segment: Option<&'static str>,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    /// Fields whose case-insensitive tuple must be unique.
    pub duplicate_key: &'static [&'static str],
    pub filter: FilterSpec,
    /// Fields copied from the request onto the stored record on update.
    pub mutable_fields: &'static [&'static str],
}

impl ResourceDescriptor {
    /// Looks up a declared field by its JSON name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    /// Route of a single record, e.g. `/api/samples/id/{id}`.
    pub fn item_route(&self) -> String {
        match self.id_segment {
            Some(segment) => format!("{}/{segment}/{{id}}", self.route_prefix),
            None => format!("{}/{{id}}", self.route_prefix),
        }
    }

    /// Route of the filter query, e.g. `/api/samples/laboratory/{value}`.
    pub fn filter_route(&self) -> String {
        format!("{}/{}/{{value}}", self.route_prefix, self.filter.segment)
    }

    /// Builds the case-folded duplicate-key tuple of a field map.
    ///
    /// Missing keys fold to an empty component so that two records lacking
    /// the same key still compare equal.
    pub fn duplicate_key_of(&self, fields: &Map<String, Value>) -> Vec<String> {
        self.duplicate_key
            .iter()
            .map(|name| match fields.get(*name) {
                Some(Value::String(text)) => text.to_lowercase(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            })
            .collect()
    }
}

/// A record type bound to its static descriptor.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + 'static {
    fn descriptor() -> &'static ResourceDescriptor;
    fn id(&self) -> Option<RecordId>;
    fn set_id(&mut self, id: Option<RecordId>);
}

/// Projects a record onto its flat JSON field map (identity included).
pub fn record_to_fields<R: Resource>(record: &R) -> serde_json::Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "{} record did not serialize to an object",
            R::descriptor().name
        ))),
    }
}

/// Rebuilds a typed record from a flat JSON field map.
pub fn record_from_fields<R: Resource>(fields: Map<String, Value>) -> serde_json::Result<R> {
    serde_json::from_value(Value::Object(fields))
}

#[cfg(test)]
mod tests {
    use crate::model::{Laboratorio, Laboratory, Resource, Sample};
    use serde_json::json;

    #[test]
    fn item_routes_follow_descriptor_segments() {
        assert_eq!(
            Laboratorio::descriptor().item_route(),
            "/api/laboratorios/{id}"
        );
        assert_eq!(
            Laboratory::descriptor().item_route(),
            "/api/laboratories/id/{id}"
        );
        assert_eq!(
            Sample::descriptor().filter_route(),
            "/api/samples/laboratory/{value}"
        );
    }

    #[test]
    fn descriptor_names_only_declared_fields() {
        for descriptor in [
            Laboratorio::descriptor(),
            Laboratory::descriptor(),
            Sample::descriptor(),
        ] {
            for name in descriptor
                .duplicate_key
                .iter()
                .chain(descriptor.mutable_fields)
                .chain(std::iter::once(&descriptor.filter.field))
            {
                assert!(
                    descriptor.field(name).is_some(),
                    "{} declares unknown field {name}",
                    descriptor.name
                );
            }
        }
    }

    #[test]
    fn duplicate_key_folds_case() {
        let fields = json!({"name": "HeMaTo", "state": "ACTIVO"});
        let key = Laboratory::descriptor()
            .duplicate_key_of(fields.as_object().expect("object literal"));
        assert_eq!(key, vec!["hemato".to_string()]);
    }
}
