use crate::domain::ContainerRuntime;
use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

pub const DEFAULT_RUNTIME_BINARY: &str = "docker";

/// Container runtime backed by a docker-compatible CLI (`docker`, `podman`)
#[derive(Debug, Clone)]
pub struct DockerAdapter {
    binary: String,
}

impl DockerAdapter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn status<I, S>(&self, args: I, context: &str) -> Result<ExitStatus>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Command::new(&self.binary)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("{context} (executando '{}')", self.binary))
    }
}

impl Default for DockerAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_RUNTIME_BINARY)
    }
}

impl ContainerRuntime for DockerAdapter {
    fn exists(&self, name: &str) -> Result<bool> {
        let status = self.status(
            ["container", "inspect", name],
            &format!("checando existência do container {name}"),
        )?;
        debug!("{} container inspect {name}: {:?}", self.binary, status);
        Ok(status.success())
    }
}
