use crate::domain::ContainerRuntime;
use anyhow::{Result, bail};
use std::collections::HashSet;
use std::sync::RwLock;

/// In-memory runtime: a fixed set of existing containers plus a log of the
/// queries it answered.
#[derive(Debug)]
pub struct MockRuntime {
    existing: RwLock<HashSet<String>>,
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            existing: RwLock::new(HashSet::new()),
            commands: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
        }
    }

    /// Runtime where every name in `names` exists
    pub fn with_containers(names: &[&str]) -> Self {
        let runtime = Self::new();
        for name in names {
            runtime.add_container(name);
        }
        runtime
    }

    pub fn add_container(&self, name: &str) {
        self.existing.write().unwrap().insert(name.to_string());
    }

    pub fn remove_container(&self, name: &str) {
        self.existing.write().unwrap().remove(name);
    }

    /// Makes every query for `name` fail
    pub fn set_fail_on(&self, name: &str) {
        *self.fail_on.write().unwrap() = Some(name.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, name: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == name {
                bail!("Mock failure on: {}", name);
            }
        }
        Ok(())
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for MockRuntime {
    fn exists(&self, name: &str) -> Result<bool> {
        self.record_command(&format!("exists:{}", name));
        self.check_fail(name)?;
        Ok(self.existing.read().unwrap().contains(name))
    }
}

/// Runtime answering the same value for every container
#[derive(Debug, Clone, Copy)]
pub struct FixedRuntime(pub bool);

impl ContainerRuntime for FixedRuntime {
    fn exists(&self, _name: &str) -> Result<bool> {
        Ok(self.0)
    }
}
