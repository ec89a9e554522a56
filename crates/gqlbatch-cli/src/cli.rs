use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gqlbatch")]
#[command(about = "gqlbatch CLI: introspect a GraphQL server and run batched operations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GraphQL endpoint URL (overrides config and GQLBATCH_ENDPOINT env var)
    #[arg(short, long, global = true, env = "GQLBATCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "GQLBATCH_PROFILE", default_value = "default")]
    pub profile: String,

    /// Extra request header as name=value (repeatable)
    #[arg(short = 'H', long = "header", global = true)]
    pub headers: Vec<String>,

    /// Request deadline in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Read the schema from an introspection JSON file instead of the server
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,

    /// Log filter (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "GQLBATCH_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the introspection result
    Introspect(IntrospectArgs),
    /// Print the default selection set of a type
    Selection(SelectionArgs),
    /// List the types of the schema
    Types,
    /// List the root fields callable as queries or mutations
    Operations(OperationsArgs),
    /// Call one root field
    Exec(ExecArgs),
    /// Run every call listed in a JSON file as one operation
    Batch(BatchArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct IntrospectArgs {
    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct SelectionArgs {
    /// Type name (all object-like types if omitted)
    pub type_name: Option<String>,
}

#[derive(clap::Args)]
pub struct OperationsArgs {
    /// List mutation fields instead of query fields
    #[arg(long)]
    pub mutation: bool,
}

#[derive(clap::Args)]
pub struct ExecArgs {
    /// Root field to call (e.g. user)
    pub field: String,
    /// Arguments as name=value; values are parsed as JSON, else taken as strings
    #[arg(short, long = "arg")]
    pub args: Vec<String>,
    /// Alias for the call (defaults to the field name)
    #[arg(long)]
    pub alias: Option<String>,
    /// Selection body (defaults to the synthesized selection set)
    #[arg(long)]
    pub selection: Option<String>,
    /// Call a mutation field
    #[arg(long)]
    pub mutation: bool,
    /// Print the compiled document without sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct BatchArgs {
    /// Path to a JSON object of alias -> { field, args, selection }
    pub file: PathBuf,
    /// Run the calls as a mutation
    #[arg(long)]
    pub mutation: bool,
    /// Print the compiled document without sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (endpoint, timeout_ms, header.<name>)
    pub key: String,
    /// Value
    pub value: String,
}
