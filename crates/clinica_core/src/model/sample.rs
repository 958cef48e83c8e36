//! `Sample` record.
//!
//! `technician` and `laboratory` are flat text snapshots taken when the
//! sample was registered; they do not reference other resources.

use crate::model::descriptor::{
    FieldRule, FieldSpec, FilterSpec, RecordId, Resource, ResourceDescriptor,
};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        name: "code",
        column: "code",
        rule: FieldRule::Text {
            min: 5,
            max: 50,
            pattern: None,
        },
    },
    FieldSpec {
        name: "description",
        column: "description",
        rule: FieldRule::Text {
            min: 5,
            max: 100,
            pattern: None,
        },
    },
    FieldSpec {
        name: "technician",
        column: "technician",
        rule: FieldRule::Text {
            min: 1,
            max: 100,
            pattern: None,
        },
    },
    FieldSpec {
        name: "laboratory",
        column: "laboratory",
        rule: FieldRule::Text {
            min: 1,
            max: 100,
            pattern: None,
        },
    },
];

pub static SAMPLE: ResourceDescriptor = ResourceDescriptor {
    name: "sample",
    route_prefix: "/api/samples",
    id_segment: Some("id"),
    table: "SAMPLE",
    fields: &FIELDS,
    duplicate_key: &["code"],
    filter: FilterSpec {
        field: "laboratory",
        segment: "laboratory",
    },
    // Full replacement: a snapshot edited through PUT must not be dropped.
    mutable_fields: &["code", "description", "technician", "laboratory"],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub code: String,
    pub description: String,
    pub technician: String,
    pub laboratory: String,
}

impl Resource for Sample {
    fn descriptor() -> &'static ResourceDescriptor {
        &SAMPLE
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }
}
