//! `Laboratorio` record: a laboratory unit with capacity and analysis kind.

use crate::model::descriptor::{
    FieldRule, FieldSpec, FilterSpec, RecordId, Resource, ResourceDescriptor,
};
use crate::model::state::{OperationalState, STATE_PATTERN};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        name: "nombre",
        column: "nombre",
        rule: FieldRule::Text {
            min: 5,
            max: 100,
            pattern: None,
        },
    },
    FieldSpec {
        name: "descripcion",
        column: "descripcion",
        rule: FieldRule::Text {
            min: 3,
            max: 100,
            pattern: None,
        },
    },
    FieldSpec {
        name: "tipo",
        column: "tipo",
        rule: FieldRule::Text {
            min: 5,
            max: 50,
            pattern: None,
        },
    },
    FieldSpec {
        name: "capacidad",
        column: "capacidad",
        rule: FieldRule::Integer { min: 1, max: 500 },
    },
    FieldSpec {
        name: "estado",
        column: "estado",
        rule: FieldRule::Text {
            min: 1,
            max: 20,
            pattern: Some(&STATE_PATTERN),
        },
    },
    FieldSpec {
        name: "tipoAnalisis",
        column: "tipo_analisis",
        rule: FieldRule::Text {
            min: 3,
            max: 100,
            pattern: None,
        },
    },
];

pub static LABORATORIO: ResourceDescriptor = ResourceDescriptor {
    name: "laboratorio",
    route_prefix: "/api/laboratorios",
    id_segment: None,
    table: "LABORATORIO",
    fields: &FIELDS,
    duplicate_key: &["nombre"],
    filter: FilterSpec {
        field: "tipo",
        segment: "tipo",
    },
    mutable_fields: &[
        "nombre",
        "descripcion",
        "tipo",
        "capacidad",
        "estado",
        "tipoAnalisis",
    ],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Laboratorio {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub nombre: String,
    pub descripcion: String,
    /// Discipline, e.g. "Hematologia" or "Microbiologia".
    pub tipo: String,
    pub capacidad: i32,
    pub estado: OperationalState,
    pub tipo_analisis: String,
}

impl Resource for Laboratorio {
    fn descriptor() -> &'static ResourceDescriptor {
        &LABORATORIO
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }
}
