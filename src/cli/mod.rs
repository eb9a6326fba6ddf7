pub mod inspect;
pub mod plan;

use crate::domain::Config;
use crate::infra::docker_adapter::DEFAULT_RUNTIME_BINARY;
use crate::infra::{DockerAdapter, LoadOptions, load_config};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "hoist",
    version,
    about = "Resolve grupos, hooks e ordem de dependência de containers"
)]
pub struct Cli {
    /// Arquivo de configuração (default: hoist.{json,yaml,yml,toml} no diretório atual ou acima)
    #[arg(short, long, env = "HOIST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Força esta tag em todas as imagens que não usam digest
    #[arg(short, long, env = "HOIST_TAG", global = true)]
    pub tag: Option<String>,

    /// Prefixo dos nomes usados no runtime
    #[arg(short, long, env = "HOIST_PREFIX", default_value = "", global = true)]
    pub prefix: String,

    /// Binário do runtime de containers (docker, podman)
    #[arg(long, env = "HOIST_RUNTIME", default_value = DEFAULT_RUNTIME_BINARY, global = true)]
    pub runtime: String,

    /// Mostra logs de depuração
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lista os containers de uma referência (vazio = grupo default ou todos)
    Containers {
        #[arg(default_value = "")]
        target: String,
    },
    /// Mostra a ordem de dependência (dependências primeiro)
    Order {
        #[arg(default_value = "")]
        target: String,
        /// Ordem de desmontagem (dependentes primeiro)
        #[arg(long)]
        reverse: bool,
    },
    /// Mostra os hooks efetivos de um container
    Hooks { container: String },
    /// Mostra a imagem efetiva de um container
    Image { container: String },
    /// Planeja a subida de uma referência
    Up {
        #[arg(default_value = "")]
        target: String,
    },
    /// Planeja a parada de uma referência
    Down {
        #[arg(default_value = "")]
        target: String,
    },
}

impl Cli {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config: self.config.clone(),
            prefix: self.prefix.clone(),
            tag: self.tag.clone(),
        }
    }
}

/// Executes one command against an already loaded configuration.
pub fn execute(
    command: &Commands,
    config: &Config,
    runtime: &str,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Containers { target } => inspect::containers(config, target, out),
        Commands::Order { target, reverse } => inspect::order(config, target, *reverse, out),
        Commands::Hooks { container } => inspect::hooks(config, container, out),
        Commands::Image { container } => inspect::image(config, container, out),
        Commands::Up { target } => {
            plan::up(config, Arc::new(DockerAdapter::new(runtime)), target, out)
        }
        Commands::Down { target } => {
            plan::down(config, Arc::new(DockerAdapter::new(runtime)), target, out)
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Não foi possível obter o diretório atual")?;
    let config = load_config(&cli.load_options(), &cwd)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &config, &cli.runtime, &mut out)?;
    out.flush()?;
    Ok(())
}
