use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::cli::{compile, delete, get, index, set};
use crate::common::debug;
use crate::config::{env, Initializer, RedisConfig};
use crate::Result;

/// Typed access to a redis keyspace
#[derive(Parser, Debug)]
#[command(version, propagate_version = true, subcommand_required = true)]
pub struct TypedkvsCommand {
    /// Client options
    #[command(flatten)]
    pub client: ClientOptions,
    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Client options
#[derive(Args, Debug, Clone, Default)]
pub struct ClientOptions {
    /// Redis connection url, overrides the configuration file
    #[arg(long, env = env::URL, global = true)]
    pub url: Option<String>,
    /// Configuration file path
    #[arg(long, short = 'C', env = env::CONFIG_PATH, global = true)]
    pub config: Option<PathBuf>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get value
    Get(get::GetCommand),
    /// Set value
    Set(set::SetCommand),
    /// Delete value
    Delete(delete::DeleteCommand),
    /// Inspect and synchronize configured indexes
    Index(index::IndexCommand),
    /// Print the query a filter compiles to
    Compile(compile::CompileCommand),
}

/// Parse command line args
pub fn parse() -> TypedkvsCommand {
    TypedkvsCommand::parse()
}

/// Load the configuration file if any and apply command line overrides.
pub async fn initializer(options: ClientOptions) -> Result<Initializer> {
    let ClientOptions { mut url, config } = options;

    let mut initializer = match config {
        Some(path) => Initializer::load_config_file(path).await?,
        None => Initializer::default(),
    };

    let mut overrides = RedisConfig::default();
    overrides.set_url(&mut url);
    initializer.config.redis.override_merge(&mut overrides);

    debug!("{:?}", initializer);

    Ok(initializer)
}
