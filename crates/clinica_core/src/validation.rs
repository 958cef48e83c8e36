//! Field-level validation driven by resource descriptors.
//!
//! # Responsibility
//! - Check a raw JSON object against every `FieldSpec` of a descriptor.
//! - Report all failing fields at once, one message per field.
//!
//! # Invariants
//! - Text rules reject null, empty and whitespace-only values.
//! - Length bounds count characters, not bytes, and are inclusive.
//! - Text containing NUL is rejected; SQLite's `length()` stops at it.
//! - Validation never partially accepts a record.

use crate::model::descriptor::{
    record_to_fields, FieldRule, FieldSpec, Resource, ResourceDescriptor,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-scoped validation failures keyed by JSON field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure; the first message recorded for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        let mut separator = ": ";
        for (field, message) in &self.fields {
            write!(f, "{separator}{field} {message}")?;
            separator = "; ";
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Validates a raw JSON object against the descriptor's declared fields.
///
/// Keys not declared by the descriptor (including `id`) are ignored.
pub fn validate_fields(
    descriptor: &ResourceDescriptor,
    fields: &Map<String, Value>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for spec in descriptor.fields {
        if let Some(message) = check_field(spec, fields.get(spec.name)) {
            errors.add(spec.name, message);
        }
    }
    errors.into_result()
}

/// Validates a typed record through its JSON projection.
pub fn validate_record<R: Resource>(record: &R) -> Result<(), ValidationErrors> {
    let descriptor = R::descriptor();
    match record_to_fields(record) {
        Ok(fields) => validate_fields(descriptor, &fields),
        Err(err) => {
            let mut errors = ValidationErrors::new();
            errors.add(descriptor.name, format!("cannot be represented as fields: {err}"));
            Err(errors)
        }
    }
}

fn check_field(spec: &FieldSpec, value: Option<&Value>) -> Option<String> {
    match spec.rule {
        FieldRule::Text { min, max, pattern } => {
            let text = match value {
                None | Some(Value::Null) => return Some("must not be blank".to_string()),
                Some(Value::String(text)) => text,
                Some(_) => return Some("must be a string".to_string()),
            };
            if text.trim().is_empty() {
                return Some("must not be blank".to_string());
            }
            if text.contains('\0') {
                return Some("must not contain NUL characters".to_string());
            }
            let length = text.chars().count();
            if length < min || length > max {
                return Some(if min <= 1 {
                    format!("length must be at most {max} characters")
                } else {
                    format!("length must be between {min} and {max} characters")
                });
            }
            match pattern {
                Some(pattern) if !pattern.is_match(text) => Some(pattern.message.to_string()),
                _ => None,
            }
        }
        FieldRule::Integer { min, max } => {
            let number = match value {
                None | Some(Value::Null) => return Some("must not be null".to_string()),
                Some(Value::Number(number)) => number,
                Some(_) => return Some("must be an integer".to_string()),
            };
            match number.as_i64() {
                Some(number) if (min..=max).contains(&number) => None,
                Some(_) => Some(format!("must be between {min} and {max}")),
                None => Some("must be an integer".to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_fields, validate_record};
    use crate::model::{
        FieldRule, Laboratorio, Laboratory, OperationalState, Resource, ResourceDescriptor, Sample,
    };
    use serde_json::{json, Map, Value};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn laboratorio_body() -> Value {
        json!({
            "nombre": "Laboratorio Central",
            "descripcion": "Analisis de sangre",
            "tipo": "Hematologia",
            "capacidad": 120,
            "estado": "ACTIVO",
            "tipoAnalisis": "Hemograma"
        })
    }

    #[test]
    fn valid_laboratorio_passes() {
        validate_fields(Laboratorio::descriptor(), &object(laboratorio_body()))
            .expect("body should be valid");
    }

    #[test]
    fn capacidad_bounds_are_inclusive() {
        for (capacidad, ok) in [(0, false), (1, true), (500, true), (501, false)] {
            let mut body = laboratorio_body();
            body["capacidad"] = json!(capacidad);
            let result = validate_fields(Laboratorio::descriptor(), &object(body));
            assert_eq!(result.is_ok(), ok, "capacidad={capacidad}");
        }
    }

    #[test]
    fn only_failing_fields_are_reported() {
        let mut body = laboratorio_body();
        body["capacidad"] = json!(0);
        let errors = validate_fields(Laboratorio::descriptor(), &object(body))
            .expect_err("capacidad=0 must fail");
        assert_eq!(errors.fields().len(), 1);
        assert_eq!(errors.get("capacidad"), Some("must be between 1 and 500"));
    }

    #[test]
    fn text_length_bounds_count_characters() {
        let descriptor = Laboratory::descriptor();
        let body = |name: &str| {
            object(json!({"name": name, "description": "Sangre", "state": "ACTIVO"}))
        };

        assert!(validate_fields(descriptor, &body("abcde")).is_ok());
        assert!(validate_fields(descriptor, &body("abcd")).is_err());
        assert!(validate_fields(descriptor, &body(&"x".repeat(100))).is_ok());
        assert!(validate_fields(descriptor, &body(&"x".repeat(101))).is_err());
        // Five characters, ten bytes.
        assert!(validate_fields(descriptor, &body("ñññññ")).is_ok());
    }

    fn valid_body(descriptor: &ResourceDescriptor) -> Map<String, Value> {
        let body = match descriptor.name {
            "laboratorio" => laboratorio_body(),
            "laboratory" => json!({"name": "Hemato", "description": "Sangre", "state": "ACTIVO"}),
            "sample" => json!({
                "code": "S0001",
                "description": "Tubo rojo",
                "technician": "Ana",
                "laboratory": "Central"
            }),
            other => panic!("no sample body for {other}"),
        };
        object(body)
    }

    #[test]
    fn every_text_field_accepts_bounds_and_rejects_beyond() {
        for descriptor in [
            Laboratorio::descriptor(),
            Laboratory::descriptor(),
            Sample::descriptor(),
        ] {
            validate_fields(descriptor, &valid_body(descriptor))
                .unwrap_or_else(|err| panic!("{} base body: {err}", descriptor.name));

            for spec in descriptor.fields {
                let FieldRule::Text {
                    min,
                    max,
                    pattern: None,
                } = spec.rule
                else {
                    continue;
                };

                let mut cases = vec![(min, true), (max, true), (max + 1, false)];
                if min > 1 {
                    cases.push((min - 1, false));
                }
                for (length, ok) in cases {
                    let mut body = valid_body(descriptor);
                    body.insert(spec.name.to_string(), json!("x".repeat(length)));
                    let result = validate_fields(descriptor, &body);
                    assert_eq!(
                        result.is_ok(),
                        ok,
                        "{}.{} with {length} characters",
                        descriptor.name,
                        spec.name
                    );
                    if let Err(errors) = result {
                        assert_eq!(errors.fields().len(), 1);
                        assert!(errors.get(spec.name).is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn nul_characters_are_rejected() {
        let errors = validate_fields(
            Laboratory::descriptor(),
            &object(json!({"name": "Hem\u{0}ato", "description": "Sangre", "state": "ACTIVO"})),
        )
        .expect_err("NUL in name must fail");
        assert_eq!(errors.get("name"), Some("must not contain NUL characters"));
        assert_eq!(errors.fields().len(), 1);
    }

    #[test]
    fn blank_null_and_missing_are_rejected() {
        let descriptor = Sample::descriptor();
        let errors = validate_fields(
            descriptor,
            &object(json!({"code": "   ", "description": null, "laboratory": "L"})),
        )
        .expect_err("blank fields must fail");

        assert_eq!(errors.get("code"), Some("must not be blank"));
        assert_eq!(errors.get("description"), Some("must not be blank"));
        assert_eq!(errors.get("technician"), Some("must not be blank"));
        assert!(errors.get("laboratory").is_none());
    }

    #[test]
    fn state_outside_enumeration_is_rejected() {
        let errors = validate_fields(
            Laboratory::descriptor(),
            &object(json!({"name": "Hemato", "description": "Sangre", "state": "PAUSADO"})),
        )
        .expect_err("unknown state must fail");
        assert_eq!(errors.get("state"), Some("must be ACTIVO or INACTIVO"));
    }

    #[test]
    fn wrong_json_types_are_field_errors() {
        let mut body = laboratorio_body();
        body["capacidad"] = json!("ten");
        body["nombre"] = json!(12345);
        let errors = validate_fields(Laboratorio::descriptor(), &object(body))
            .expect_err("type mismatches must fail");
        assert_eq!(errors.get("capacidad"), Some("must be an integer"));
        assert_eq!(errors.get("nombre"), Some("must be a string"));
    }

    #[test]
    fn typed_record_is_validated_through_projection() {
        let record = Laboratory {
            id: None,
            name: "abc".to_string(),
            description: "Sangre".to_string(),
            state: OperationalState::Activo,
        };
        let errors = validate_record(&record).expect_err("short name must fail");
        assert!(errors.get("name").is_some());
        assert!(errors.to_string().starts_with("validation failed: name"));
    }
}
