//! Operational state shared by `Laboratorio.estado` and `Laboratory.state`.

use crate::model::descriptor::FieldPattern;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Allowed wire values, matched against the whole string.
pub static STATE_PATTERN: FieldPattern = FieldPattern {
    message: "must be ACTIVO or INACTIVO",
    regex: Lazy::new(|| Regex::new(r"^(?:ACTIVO|INACTIVO)$").expect("valid state regex")),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalState {
    Activo,
    Inactivo,
}

impl OperationalState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "ACTIVO",
            Self::Inactivo => "INACTIVO",
        }
    }
}

impl Display for OperationalState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
