mod cli;
mod commands;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use gqlbatch_client::{Headers, HttpTransport, QueryExecutor};
use gqlbatch_schema::SchemaRegistry;

use cli::{Cli, Commands};
use commands::exec::operation_kind;
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);
    let profile = &cli.profile;

    match &cli.command {
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Endpoint".cyan(),
                    cfg.endpoint.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Timeout".cyan(),
                    cfg.timeout_ms
                        .map_or_else(|| "3000ms (default)".to_string(), |ms| format!("{ms}ms"))
                );
                for (name, value) in &cfg.headers {
                    println!("{}: {}: {}", "Header".cyan(), name, value);
                }
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                cfg.set(&set_args.key, &set_args.value)?;
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Introspect(args) => {
            let executor = make_executor(&cli)?;
            commands::schema::introspect(&executor, args.output.as_deref()).await?;
        }
        Commands::Selection(args) => {
            let registry = load_registry(&cli).await?;
            commands::schema::selection(&registry, args.type_name.as_deref())?;
        }
        Commands::Types => {
            let registry = load_registry(&cli).await?;
            commands::schema::types(&registry);
        }
        Commands::Operations(args) => {
            let registry = load_registry(&cli).await?;
            commands::schema::operations(&registry, operation_kind(args.mutation))?;
        }
        Commands::Exec(args) => {
            let registry = load_registry(&cli).await?;
            let kind = operation_kind(args.mutation);
            let batch = commands::exec::plan_call(&registry, args)?;
            if args.dry_run {
                commands::exec::print_document(kind, &batch)?;
            } else {
                let executor = make_executor(&cli)?;
                commands::exec::execute(&executor, kind, &batch).await?;
            }
        }
        Commands::Batch(args) => {
            let entries = commands::exec::read_batch_file(&args.file)?;
            let registry = load_registry(&cli).await?;
            let kind = operation_kind(args.mutation);
            let batch = commands::exec::plan_batch(&registry, kind, entries)?;
            if args.dry_run {
                commands::exec::print_document(kind, &batch)?;
            } else {
                let executor = make_executor(&cli)?;
                commands::exec::execute(&executor, kind, &batch).await?;
            }
        }
    }

    Ok(())
}

fn make_executor(cli: &Cli) -> Result<QueryExecutor<HttpTransport>> {
    let profile = config::load_profile(&cli.profile)?;
    let client_config = config::resolve_client_config(
        cli.endpoint.as_deref(),
        cli.timeout_ms,
        &cli.headers,
        &profile,
    )?;
    tracing::debug!(endpoint = %client_config.endpoint, "Using endpoint");
    Ok(QueryExecutor::from_config(&client_config))
}

/// `--schema FILE` when given, otherwise introspects the endpoint.
async fn load_registry(cli: &Cli) -> Result<SchemaRegistry> {
    if let Some(path) = &cli.schema {
        return commands::schema::load_file(path);
    }
    let executor = make_executor(cli)?;
    Ok(executor.fetch_schema(&Headers::new()).await?)
}
