use crate::domain::document::Document;
use crate::domain::expand::{Environment, expand_keys};
use crate::domain::hooks::{HookSources, resolve_hooks};
use crate::domain::image::ImageReference;
use crate::domain::reference::{DEFAULT_GROUP, ReferenceResolver};
use crate::domain::{Container, DependencyGraph, Hooks};
use crate::error::{ConfigError, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

/// Variable recording the image tag forced on this run
pub const TAG_VARIABLE: &str = "HOIST_TAG";

/// Resolved configuration: containers, groups and their hooks.
///
/// Built from a raw [`Document`]; [`Config::initialize`] expands variables and
/// populates the model once. Afterwards everything is read-only except for
/// [`Config::override_image_tag`].
#[derive(Debug, Clone)]
pub struct Config {
    document: Document,
    env: Environment,
    prefix: String,
    initialized: bool,
    containers: BTreeMap<String, Container>,
    groups: BTreeMap<String, Vec<String>>,
}

impl Config {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            env: Environment::process(),
            prefix: String::new(),
            initialized: false,
            containers: BTreeMap::new(),
            groups: BTreeMap::new(),
        }
    }

    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Prefix added to every name handed to the container runtime
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Expands the raw document and builds containers, groups and hooks.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            warn!(" Configuração já inicializada, ignorando");
            return Ok(());
        }

        let document = std::mem::take(&mut self.document);
        let raw_containers = expand_keys(document.containers, &self.env, "container")?;
        let groups = expand_keys(document.groups, &self.env, "grupo")?;
        let raw_hooks = expand_keys(document.hooks, &self.env, "hook")?;

        self.containers = raw_containers
            .into_iter()
            .map(|(name, raw)| {
                let container = Container::new(name.clone(), raw, &self.prefix);
                (name, container)
            })
            .collect();
        self.groups = groups;

        let resolved = self.resolve_all_hooks(&raw_hooks)?;
        for (name, hooks) in resolved {
            if let Some(container) = self.containers.get_mut(&name) {
                container.set_hooks(hooks);
            }
        }

        self.initialized = true;
        debug!(
            "Configuração carregada: {} container(s), {} grupo(s)",
            self.containers.len(),
            self.groups.len()
        );
        Ok(())
    }

    fn resolve_all_hooks(
        &self,
        raw_hooks: &BTreeMap<String, Hooks>,
    ) -> Result<BTreeMap<String, Hooks>> {
        let resolver = self.references();

        let mut memberships: HashMap<&str, HashSet<String>> = HashMap::new();
        for key in raw_hooks.keys() {
            if self.groups.contains_key(key) {
                let members = resolver.group_members(key)?;
                memberships.insert(key.as_str(), members.into_iter().collect());
            } else if !self.containers.contains_key(key) && key != DEFAULT_GROUP {
                warn!(" Hooks de '{key}' ignorados: não é container nem grupo");
            }
        }

        let default_hooks = raw_hooks.get(DEFAULT_GROUP);
        let default_group = memberships.get(DEFAULT_GROUP);
        let has_default_group = self.groups.contains_key(DEFAULT_GROUP);

        let mut resolved = BTreeMap::new();
        for name in self.containers.keys() {
            let groups: Vec<(&str, &Hooks)> = raw_hooks
                .iter()
                .filter(|(key, _)| key.as_str() != DEFAULT_GROUP)
                .filter(|(key, _)| {
                    memberships
                        .get(key.as_str())
                        .is_some_and(|members| members.contains(name))
                })
                .map(|(key, hooks)| (key.as_str(), hooks))
                .collect();

            let default_applies = match default_group {
                Some(members) => members.contains(name),
                None => !has_default_group,
            };

            let sources = HookSources {
                own: raw_hooks.get(name),
                groups,
                default: default_hooks.filter(|_| default_applies),
            };
            resolved.insert(name.clone(), resolve_hooks(name, &sources)?);
        }

        Ok(resolved)
    }

    /// Forces `tag` on every image that is not pinned by digest.
    ///
    /// The tag is recorded as `HOIST_TAG` for later expansions in this run.
    pub fn override_image_tag(&mut self, tag: &str) {
        for container in self.containers.values_mut() {
            let image = ImageReference::from(container.image());
            if image.digest().is_some() {
                debug!(
                    "Imagem de {} fixada por digest, tag mantida",
                    container.name()
                );
                continue;
            }
            let retagged = image.with_tag(tag).to_string();
            debug!("{}: {} -> {}", container.name(), container.image(), retagged);
            container.set_image(retagged);
        }

        self.env.set(TAG_VARIABLE, tag);
        info!(" Tag de imagem sobrescrita para '{tag}'");
    }

    pub fn references(&self) -> ReferenceResolver<'_> {
        ReferenceResolver::new(&self.containers, &self.groups)
    }

    /// Container names for a target: `""`, a group or a container
    pub fn containers_for_reference(&self, target: &str) -> Result<Vec<String>> {
        self.references().resolve(target)
    }

    /// Graph over `subset` (every container when empty) plus everything the
    /// subset transitively depends on.
    ///
    /// Each call builds a new graph; resolving names on it never touches the
    /// configuration or graphs returned by other calls.
    pub fn dependency_graph(&self, subset: &[String]) -> Result<DependencyGraph> {
        let mut graph = DependencyGraph::new();
        let mut pending: Vec<String> = if subset.is_empty() {
            self.containers.keys().cloned().collect()
        } else {
            subset.to_vec()
        };

        while let Some(name) = pending.pop() {
            if graph.contains(&name) {
                continue;
            }

            let dependencies = self.container(&name)?.dependencies();
            for dependency in dependencies.all() {
                if !self.containers.contains_key(dependency) {
                    debug!("{name} depende de '{dependency}', externo à configuração");
                } else if !graph.contains(dependency) {
                    pending.push(dependency.to_string());
                }
            }
            graph.insert(name, dependencies);
        }

        Ok(graph)
    }

    /// Start order: dependencies before the containers needing them
    pub fn dependency_order(&self, subset: &[String]) -> Result<Vec<String>> {
        self.dependency_graph(subset)?.order(subset)
    }

    /// Teardown order for `subset`: dependents before their dependencies.
    ///
    /// Unlike the start order, dependencies outside a non-empty subset are
    /// left out; only the requested containers are torn down.
    pub fn reverse_order(&self, subset: &[String]) -> Result<Vec<String>> {
        let mut order = self.dependency_order(subset)?;
        if !subset.is_empty() {
            order.retain(|name| subset.contains(name));
        }
        order.reverse();
        Ok(order)
    }

    pub fn container(&self, name: &str) -> Result<&Container> {
        self.containers
            .get(name)
            .ok_or_else(|| ConfigError::UnknownReference {
                name: name.to_string(),
            })
    }

    pub fn hooks_for(&self, name: &str) -> Result<&Hooks> {
        self.container(name).map(Container::hooks)
    }

    pub fn image_for(&self, name: &str) -> Result<&str> {
        self.container(name).map(Container::image)
    }

    /// `<runtime> build` arguments for containers built from a dockerfile
    pub fn build_args(&self, name: &str) -> Result<Option<Vec<String>>> {
        self.container(name).map(Container::build_args)
    }

    /// `<runtime> run` arguments with managed dependencies renamed
    pub fn run_args(&self, name: &str) -> Result<Vec<String>> {
        let container = self.container(name)?;
        Ok(container.run_args(|dependency| {
            self.containers
                .get(dependency)
                .map(|c| c.actual_name().to_string())
        }))
    }

    pub fn container_names(&self) -> Vec<String> {
        self.containers.keys().cloned().collect()
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }
}
