//! Fatal configuration errors raised while resolving a document.
//!
//! Every variant aborts resolution; there is no partial model.

use crate::domain::HookEvent;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be deserialized (bad syntax or wrong field types).
    #[error("parse de {path:?} falhou: {message}")]
    Parse { path: PathBuf, message: String },

    /// A target matches neither a container nor a group.
    #[error("referência desconhecida '{name}': não é container nem grupo")]
    UnknownReference { name: String },

    /// A group lists a member that is neither a container nor a group.
    #[error("grupo '{group}' referencia '{member}', que não é container nem grupo")]
    UnknownMember { group: String, member: String },

    /// Two or more groups define different commands for the same hook.
    #[error(
        "hook '{event}' ambíguo para o container '{container}': definido pelos grupos {}",
        sources.join(", ")
    )]
    AmbiguousHook {
        container: String,
        event: HookEvent,
        sources: Vec<String>,
    },

    /// A container (or group) depends on itself, directly or transitively.
    #[error("dependência cíclica detectada: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// Two raw entries expand to the same name.
    #[error("{kind} '{name}' definido mais de uma vez após expansão de variáveis")]
    DuplicateName { kind: &'static str, name: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = ConfigError::Cycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "dependência cíclica detectada: a -> b -> a");
    }

    #[test]
    fn ambiguity_message_names_container_event_and_sources() {
        let err = ConfigError::AmbiguousHook {
            container: "web".into(),
            event: HookEvent::PreStart,
            sources: vec!["backend".into(), "frontend".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'pre-start'"));
        assert!(msg.contains("'web'"));
        assert!(msg.contains("backend, frontend"));
    }
}
