//! Start ordering derived from link, volumes-from and net relationships.
//!
//! A `DependencyGraph` is a plain value: resolving names marks nodes of that
//! value only, so graphs handed out by the configuration never share state.

use crate::error::{ConfigError, Result};
use std::collections::BTreeMap;

/// Names a container depends on, grouped by relationship
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub link: Vec<String>,
    pub volumes_from: Vec<String>,
    pub net: Option<String>,
}

impl Dependencies {
    /// Every dependency once, links first
    pub fn all(&self) -> Vec<&str> {
        let mut all: Vec<&str> = Vec::new();
        let candidates = self
            .link
            .iter()
            .chain(self.volumes_from.iter())
            .chain(self.net.iter());

        for name in candidates {
            if !all.contains(&name.as_str()) {
                all.push(name);
            }
        }
        all
    }
}

#[derive(Debug, Clone)]
struct Node {
    dependencies: Dependencies,
    resolved: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, Node>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, dependencies: Dependencies) {
        self.nodes.insert(
            name.into(),
            Node {
                dependencies,
                resolved: false,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.nodes.get(name).is_some_and(|node| node.resolved)
    }

    /// Resolves `name` and whatever it needs, dependencies first.
    ///
    /// Names resolved by an earlier call on this graph are not repeated.
    /// Dependencies that are not nodes of the graph are external and skipped.
    pub fn resolve(&mut self, name: &str) -> Result<Vec<String>> {
        if !self.contains(name) {
            return Err(ConfigError::UnknownReference {
                name: name.to_string(),
            });
        }

        let mut order = Vec::new();
        let mut path = Vec::new();
        self.visit(name, &mut path, &mut order)?;
        Ok(order)
    }

    fn visit(&mut self, name: &str, path: &mut Vec<String>, order: &mut Vec<String>) -> Result<()> {
        if let Some(pos) = path.iter().position(|visiting| visiting == name) {
            let mut cycle = path[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(ConfigError::Cycle { path: cycle });
        }

        let dependencies: Vec<String> = match self.nodes.get(name) {
            Some(node) if !node.resolved => node
                .dependencies
                .all()
                .into_iter()
                .map(str::to_string)
                .collect(),
            _ => return Ok(()),
        };

        path.push(name.to_string());
        for dependency in &dependencies {
            self.visit(dependency, path, order)?;
        }
        path.pop();

        if let Some(node) = self.nodes.get_mut(name) {
            node.resolved = true;
        }
        order.push(name.to_string());
        Ok(())
    }

    /// Start order for `targets` (every node when empty)
    pub fn order(mut self, targets: &[String]) -> Result<Vec<String>> {
        let targets: Vec<String> = if targets.is_empty() {
            self.nodes.keys().cloned().collect()
        } else {
            targets.to_vec()
        };

        let mut order = Vec::with_capacity(self.nodes.len());
        for target in &targets {
            order.extend(self.resolve(target)?);
        }
        Ok(order)
    }
}
