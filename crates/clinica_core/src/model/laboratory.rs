//! `Laboratory` record.

use crate::model::descriptor::{
    FieldRule, FieldSpec, FilterSpec, RecordId, Resource, ResourceDescriptor,
};
use crate::model::state::{OperationalState, STATE_PATTERN};
use serde::{Deserialize, Serialize};

static FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        name: "name",
        column: "name",
        rule: FieldRule::Text {
            min: 5,
            max: 100,
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
        name: "state",
        column: "state",
        rule: FieldRule::Text {
            min: 1,
            max: 20,
            pattern: Some(&STATE_PATTERN),
        },
    },
];

pub static LABORATORY: ResourceDescriptor = ResourceDescriptor {
    name: "laboratory",
    route_prefix: "/api/laboratories",
    id_segment: Some("id"),
    table: "LABORATORY",
    fields: &FIELDS,
    duplicate_key: &["name"],
    filter: FilterSpec {
        field: "state",
        segment: "state",
    },
    mutable_fields: &["name", "description", "state"],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Laboratory {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub state: OperationalState,
}

impl Resource for Laboratory {
    fn descriptor() -> &'static ResourceDescriptor {
        &LABORATORY
    }

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }
}
