use crate::domain::{Config, ContainerRuntime, HookEvent};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// One action of a plan, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Shell command bound to a lifecycle event
    Hook {
        container: String,
        event: HookEvent,
        command: String,
    },
    /// Build the image of a container from its build context
    Build { container: String, args: Vec<String> },
    /// Create and start a container that does not exist yet
    Run { container: String, args: Vec<String> },
    Start { container: String },
    Stop { container: String },
    /// Nothing to do for this container
    Skip { container: String, reason: String },
}

impl Step {
    pub fn container(&self) -> &str {
        match self {
            Self::Hook { container, .. }
            | Self::Build { container, .. }
            | Self::Run { container, .. }
            | Self::Start { container }
            | Self::Stop { container }
            | Self::Skip { container, .. } => container,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hook {
                container,
                event,
                command,
            } => write!(f, "[{container}] hook {event}: {}", command.trim()),
            Self::Build { container, args } | Self::Run { container, args } => {
                write!(f, "[{container}] {}", args.join(" "))
            }
            Self::Start { container } => write!(f, "[{container}] start"),
            Self::Stop { container } => write!(f, "[{container}] stop"),
            Self::Skip { container, reason } => write!(f, "[{container}] ignorado: {reason}"),
        }
    }
}

/// Ordered steps plus the variables hooks must see
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub steps: Vec<Step>,
    pub env: BTreeMap<String, String>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Containers touched by the plan, in order of first appearance
    pub fn containers(&self) -> Vec<&str> {
        let mut containers: Vec<&str> = Vec::new();
        for step in &self.steps {
            if !containers.contains(&step.container()) {
                containers.push(step.container());
            }
        }
        containers
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.env {
            writeln!(f, "env {name}={value}")?;
        }
        for (idx, step) in self.steps.iter().enumerate() {
            writeln!(f, "{:>3}. {step}", idx + 1)?;
        }
        Ok(())
    }
}

/// Turns resolved configuration into start and teardown plans, asking the
/// runtime which containers already exist.
#[derive(Debug)]
pub struct Planner {
    runtime: Arc<dyn ContainerRuntime>,
}

impl Planner {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    fn exists(&self, config: &Config, name: &str) -> Result<bool> {
        let actual = config.container(name)?.actual_name();
        self.runtime
            .exists(actual)
            .with_context(|| format!("consultando runtime sobre {actual}"))
    }

    fn hook(config: &Config, name: &str, event: HookEvent, steps: &mut Vec<Step>) -> Result<()> {
        if let Some(command) = config.hooks_for(name)?.get(event) {
            steps.push(Step::Hook {
                container: name.to_string(),
                event,
                command: command.to_string(),
            });
        }
        Ok(())
    }

    /// Start plan for `target`, dependencies first
    pub fn up(&self, config: &Config, target: &str) -> Result<Plan> {
        let targets = config.containers_for_reference(target)?;
        let order = config.dependency_order(&targets)?;
        info!(" Planejando início de {} container(s)...", order.len());

        let mut steps = Vec::new();
        for name in &order {
            Self::hook(config, name, HookEvent::PreStart, &mut steps)?;
            if self.exists(config, name)? {
                debug!("{name} já existe, apenas iniciando");
                steps.push(Step::Start {
                    container: name.clone(),
                });
            } else {
                if let Some(args) = config.build_args(name)? {
                    steps.push(Step::Build {
                        container: name.clone(),
                        args,
                    });
                }
                steps.push(Step::Run {
                    container: name.clone(),
                    args: config.run_args(name)?,
                });
            }
            Self::hook(config, name, HookEvent::PostStart, &mut steps)?;
        }

        Ok(Plan {
            steps,
            env: config.environment().overrides().clone(),
        })
    }

    /// Teardown plan for `target`, dependents first
    pub fn down(&self, config: &Config, target: &str) -> Result<Plan> {
        let targets = config.containers_for_reference(target)?;
        let order = config.reverse_order(&targets)?;
        info!(" Planejando parada de {} container(s)...", order.len());

        let mut steps = Vec::new();
        for name in &order {
            if !self.exists(config, name)? {
                steps.push(Step::Skip {
                    container: name.clone(),
                    reason: "container não existe".to_string(),
                });
                continue;
            }
            Self::hook(config, name, HookEvent::PreStop, &mut steps)?;
            steps.push(Step::Stop {
                container: name.clone(),
            });
            Self::hook(config, name, HookEvent::PostStop, &mut steps)?;
        }

        Ok(Plan {
            steps,
            env: config.environment().overrides().clone(),
        })
    }
}
