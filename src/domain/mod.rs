pub mod config;
mod container;
pub mod document;
pub mod expand;
pub mod graph;
pub mod hooks;
pub mod image;
pub mod reference;
pub mod traits;

pub use config::{Config, TAG_VARIABLE};
pub use container::{CommandLine, Container, RunParameters};
pub use document::{Document, RawContainer};
pub use expand::{Environment, Expand};
pub use graph::{Dependencies, DependencyGraph};
pub use hooks::{HookEvent, Hooks};
pub use image::ImageReference;
pub use reference::{DEFAULT_GROUP, ReferenceResolver};
pub use traits::ContainerRuntime;
