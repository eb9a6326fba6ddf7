use crate::domain::{Config, ContainerRuntime};
use crate::services::{Plan, Planner};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

fn print(plan: &Plan, out: &mut impl Write) -> Result<()> {
    if plan.is_empty() {
        info!("Nada a fazer");
        return Ok(());
    }
    write!(out, "{plan}")?;
    Ok(())
}

pub fn up(
    config: &Config,
    runtime: Arc<dyn ContainerRuntime>,
    target: &str,
    out: &mut impl Write,
) -> Result<()> {
    let plan = Planner::new(runtime).up(config, target)?;
    print(&plan, out)
}

pub fn down(
    config: &Config,
    runtime: Arc<dyn ContainerRuntime>,
    target: &str,
    out: &mut impl Write,
) -> Result<()> {
    let plan = Planner::new(runtime).down(config, target)?;
    print(&plan, out)
}
