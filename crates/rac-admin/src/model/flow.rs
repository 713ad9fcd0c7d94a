use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

/// Type-safe identifier for Flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlowId(pub u32);

impl From<u32> for FlowId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FlowId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// What a flow is used for. Providers only accept `Authorization` flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDesignation {
    Authentication,
    Authorization,
    Enrollment,
    Invalidation,
    Recovery,
    StageConfiguration,
    Unenrollment,
}

impl FlowDesignation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowDesignation::Authentication => "authentication",
            FlowDesignation::Authorization => "authorization",
            FlowDesignation::Enrollment => "enrollment",
            FlowDesignation::Invalidation => "invalidation",
            FlowDesignation::Recovery => "recovery",
            FlowDesignation::StageConfiguration => "stage_configuration",
            FlowDesignation::Unenrollment => "unenrollment",
        }
    }
}

/// Reference data for the provider form's authorization flow choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub pk: FlowId,
    pub slug: String,
    pub name: String,
    pub designation: FlowDesignation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPayload {
    pub slug: String,
    pub name: String,
    pub designation: FlowDesignation,
}

impl FlowPayload {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, designation: FlowDesignation) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            designation,
        }
    }
}
