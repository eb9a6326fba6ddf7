use crate::domain::{Hooks, RunParameters};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Configuration document as parsed, before any expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub containers: BTreeMap<String, RawContainer>,
    /// Group name to member names (containers or other groups)
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
    /// Container or group name to lifecycle commands
    #[serde(default)]
    pub hooks: BTreeMap<String, Hooks>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawContainer {
    #[serde(default)]
    pub image: String,
    /// Build context holding the Dockerfile
    #[serde(default)]
    pub dockerfile: Option<String>,
    #[serde(default)]
    pub run: RunParameters,
}

impl RawContainer {
    pub fn with_image(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }
}
