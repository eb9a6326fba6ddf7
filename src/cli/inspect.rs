use crate::domain::{Config, HookEvent};
use anyhow::Result;
use std::io::Write;

/// One resolved container per line
pub fn containers(config: &Config, target: &str, out: &mut impl Write) -> Result<()> {
    for name in config.containers_for_reference(target)? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub fn order(config: &Config, target: &str, reverse: bool, out: &mut impl Write) -> Result<()> {
    let targets = config.containers_for_reference(target)?;
    let order = if reverse {
        config.reverse_order(&targets)?
    } else {
        config.dependency_order(&targets)?
    };

    for name in order {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// `event: command` for every event with an effective hook
pub fn hooks(config: &Config, container: &str, out: &mut impl Write) -> Result<()> {
    let hooks = config.hooks_for(container)?;
    for event in HookEvent::ALL {
        if let Some(command) = hooks.get(event) {
            writeln!(out, "{event}: {}", command.trim_end())?;
        }
    }
    Ok(())
}

pub fn image(config: &Config, container: &str, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", config.image_for(container)?)?;
    Ok(())
}
