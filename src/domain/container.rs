use crate::domain::document::RawContainer;
use crate::domain::graph::Dependencies;
use crate::domain::Hooks;
use serde::Deserialize;

/// Command given to the container, either as a shell line or argv
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandLine {
    Shell(String),
    Exec(Vec<String>),
}

impl CommandLine {
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Self::Shell(line) => line.split_whitespace().map(str::to_string).collect(),
            Self::Exec(args) => args.clone(),
        }
    }
}

/// Parameters passed to the container runtime when running a container
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunParameters {
    /// `target[:alias]`
    #[serde(default)]
    pub link: Vec<String>,
    /// `container[:ro|rw]`
    #[serde(default)]
    pub volumes_from: Vec<String>,
    #[serde(default)]
    pub publish: Vec<String>,
    #[serde(default)]
    pub volume: Vec<String>,
    #[serde(default)]
    pub env: Vec<String>,
    /// Network mode; `container:<name>` shares another container's stack
    #[serde(default)]
    pub net: Option<String>,
    #[serde(default)]
    pub workdir: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub cmd: Option<CommandLine>,
    #[serde(default)]
    pub detach: bool,
    #[serde(default)]
    pub interactive: bool,
    #[serde(default)]
    pub tty: bool,
    #[serde(default)]
    pub rm: bool,
}

impl RunParameters {
    /// Containers this one needs before it can run
    pub fn dependencies(&self) -> Dependencies {
        Dependencies {
            link: self.link.iter().map(|l| target_of(l).to_string()).collect(),
            volumes_from: self
                .volumes_from
                .iter()
                .map(|v| target_of(v).to_string())
                .collect(),
            net: self
                .net
                .as_deref()
                .and_then(|net| net.strip_prefix("container:"))
                .map(str::to_string),
        }
    }
}

fn target_of(reference: &str) -> &str {
    reference
        .split_once(':')
        .map_or(reference, |(target, _)| target)
}

fn with_target(reference: &str, target: &str) -> String {
    match reference.split_once(':') {
        Some((_, rest)) => format!("{target}:{rest}"),
        None => target.to_string(),
    }
}

/// A container of the resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    name: String,
    actual_name: String,
    image: String,
    dockerfile: Option<String>,
    run: RunParameters,
    hooks: Hooks,
}

impl Container {
    /// Builds a container from its (already expanded) raw entry.
    ///
    /// `prefix` is prepended to the name the runtime knows the container by.
    pub fn new(name: impl Into<String>, raw: RawContainer, prefix: &str) -> Self {
        let name = name.into();
        let actual_name = format!("{prefix}{name}");
        // Built containers without an explicit image are tagged after themselves
        let image = if raw.image.is_empty() && raw.dockerfile.is_some() {
            actual_name.clone()
        } else {
            raw.image
        };
        Self {
            actual_name,
            name,
            image,
            dockerfile: raw.dockerfile,
            run: raw.run,
            hooks: Hooks::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used when talking to the container runtime
    pub fn actual_name(&self) -> &str {
        &self.actual_name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn dockerfile(&self) -> Option<&str> {
        self.dockerfile.as_deref()
    }

    pub fn run(&self) -> &RunParameters {
        &self.run
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn dependencies(&self) -> Dependencies {
        self.run.dependencies()
    }

    pub(crate) fn set_hooks(&mut self, hooks: Hooks) {
        self.hooks = hooks;
    }

    pub(crate) fn set_image(&mut self, image: String) {
        self.image = image;
    }

    /// Arguments for `<runtime> build`, when the container has a build context
    pub fn build_args(&self) -> Option<Vec<String>> {
        let context = self.dockerfile.as_deref().filter(|d| !d.is_empty())?;
        Some(vec![
            "build".into(),
            "-t".into(),
            self.image.clone(),
            context.to_string(),
        ])
    }

    /// Arguments for `<runtime> run`.
    ///
    /// `actual_name_of` maps a dependency to the name the runtime knows it by;
    /// dependencies outside the configuration are passed through unchanged.
    pub fn run_args<F>(&self, actual_name_of: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rename = |reference: &str| match actual_name_of(target_of(reference)) {
            Some(actual) => with_target(reference, &actual),
            None => reference.to_string(),
        };

        let mut args: Vec<String> = vec!["run".into(), "--name".into(), self.actual_name.clone()];

        if self.run.detach {
            args.push("--detach".into());
        }
        if self.run.interactive {
            args.push("--interactive".into());
        }
        if self.run.tty {
            args.push("--tty".into());
        }
        if self.run.rm {
            args.push("--rm".into());
        }

        for link in &self.run.link {
            args.push("--link".into());
            args.push(rename(link));
        }
        for source in &self.run.volumes_from {
            args.push("--volumes-from".into());
            args.push(rename(source));
        }
        for port in &self.run.publish {
            args.push("--publish".into());
            args.push(port.clone());
        }
        for volume in &self.run.volume {
            args.push("--volume".into());
            args.push(volume.clone());
        }
        for env in &self.run.env {
            args.push("--env".into());
            args.push(env.clone());
        }

        if let Some(net) = &self.run.net {
            args.push("--net".into());
            args.push(match net.strip_prefix("container:") {
                Some(target) => format!(
                    "container:{}",
                    actual_name_of(target).unwrap_or_else(|| target.to_string())
                ),
                None => net.clone(),
            });
        }
        if let Some(workdir) = &self.run.workdir {
            args.push("--workdir".into());
            args.push(workdir.clone());
        }
        if let Some(user) = &self.run.user {
            args.push("--user".into());
            args.push(user.clone());
        }
        if let Some(entrypoint) = &self.run.entrypoint {
            args.push("--entrypoint".into());
            args.push(entrypoint.clone());
        }

        args.push(self.image.clone());

        if let Some(cmd) = &self.run.cmd {
            args.extend(cmd.to_args());
        }

        args
    }
}
