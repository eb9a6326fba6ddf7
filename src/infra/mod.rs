pub mod config;
pub mod docker_adapter;

pub use config::{LoadOptions, load_config};
pub use docker_adapter::DockerAdapter;
