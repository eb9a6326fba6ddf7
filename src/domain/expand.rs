//! `$VAR` / `${VAR}` substitution over raw documents.
//!
//! Unset variables expand to an empty string. Expansion never fails; a bad
//! substitution only surfaces later as a reference or duplicate-name error.

use crate::domain::document::RawContainer;
use crate::domain::{CommandLine, Hooks, RunParameters};
use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Variable source used for expansion: an overlay of explicit values,
/// optionally backed by the process environment.
#[derive(Debug, Clone)]
pub struct Environment {
    overrides: BTreeMap<String, String>,
    inherit: bool,
}

impl Environment {
    /// Overlay on top of the process environment
    pub fn process() -> Self {
        Self {
            overrides: BTreeMap::new(),
            inherit: true,
        }
    }

    /// Overlay only; the process environment is never consulted
    pub fn isolated() -> Self {
        Self {
            overrides: BTreeMap::new(),
            inherit: false,
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(name) {
            return Some(value.clone());
        }
        if self.inherit {
            return std::env::var(name).ok();
        }
        None
    }

    /// Values recorded explicitly during this run
    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    pub fn expand(&self, input: &str) -> String {
        if !input.contains('$') {
            return input.to_string();
        }
        shellexpand::env_with_context_no_errors(input, |name| {
            Some(self.get(name).unwrap_or_default())
        })
        .into_owned()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::process()
    }
}

/// In-place expansion of every string reachable from a value.
pub trait Expand {
    fn expand(&mut self, env: &Environment);
}

impl Expand for String {
    fn expand(&mut self, env: &Environment) {
        *self = env.expand(self);
    }
}

impl<T: Expand> Expand for Option<T> {
    fn expand(&mut self, env: &Environment) {
        if let Some(value) = self {
            value.expand(env);
        }
    }
}

impl<T: Expand> Expand for Vec<T> {
    fn expand(&mut self, env: &Environment) {
        for item in self.iter_mut() {
            item.expand(env);
        }
    }
}

impl Expand for Hooks {
    fn expand(&mut self, env: &Environment) {
        self.pre_start.expand(env);
        self.post_start.expand(env);
        self.pre_stop.expand(env);
        self.post_stop.expand(env);
    }
}

impl Expand for RunParameters {
    fn expand(&mut self, env: &Environment) {
        self.link.expand(env);
        self.volumes_from.expand(env);
        self.publish.expand(env);
        self.volume.expand(env);
        self.env.expand(env);
        self.net.expand(env);
        self.workdir.expand(env);
        self.user.expand(env);
        self.entrypoint.expand(env);
        self.cmd.expand(env);
    }
}

impl Expand for CommandLine {
    fn expand(&mut self, env: &Environment) {
        match self {
            Self::Shell(line) => line.expand(env),
            Self::Exec(args) => args.expand(env),
        }
    }
}

impl Expand for RawContainer {
    fn expand(&mut self, env: &Environment) {
        self.image.expand(env);
        self.dockerfile.expand(env);
        self.run.expand(env);
    }
}

/// Expands keys and values of a map.
///
/// `kind` names the entries in the error raised when two keys collapse into
/// the same name.
pub fn expand_keys<T: Expand>(
    map: BTreeMap<String, T>,
    env: &Environment,
    kind: &'static str,
) -> Result<BTreeMap<String, T>> {
    let mut expanded = BTreeMap::new();

    for (key, mut value) in map {
        let name = env.expand(&key);
        value.expand(env);

        match expanded.entry(name) {
            Entry::Occupied(entry) => {
                return Err(ConfigError::DuplicateName {
                    kind,
                    name: entry.key().clone(),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
        }
    }

    Ok(expanded)
}
