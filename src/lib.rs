pub mod cli;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;

// Shared with integration tests
pub mod test_support;

pub use domain::{
    Config, Container, ContainerRuntime, DependencyGraph, Environment, HookEvent, Hooks,
    ImageReference,
};
pub use error::ConfigError;
pub use infra::{DockerAdapter, LoadOptions, load_config};
pub use services::{Plan, Planner, Step};
