use anyhow::Result;
use std::fmt::Debug;

/// Queries the container runtime answers for the resolution engine
pub trait ContainerRuntime: Send + Sync + Debug {
    /// Whether a container with this (actual) name currently exists
    fn exists(&self, name: &str) -> Result<bool>;
}
