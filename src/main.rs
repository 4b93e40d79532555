//! payment-tools CLI: inspect the tool catalog under a configuration.
//!
//! Never talks to the payments API:
//! - tools: filtered tool descriptors as JSON
//! - prompt: prompt section for the filtered tools
//! - validate: run the pre-dispatch checks for one call
//! - config-schema: JSON Schema of the config file

use clap::{Parser, Subcommand};
use payment_tools::dispatch::prepare_call;
use payment_tools::{Config, ToolRegistry};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "payment-tools", version, about)]
struct Cli {
    /// Path to a JSON config file.
    #[arg(long, short, env = "PAYMENT_TOOLS_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print descriptors of the tools allowed by the config.
    Tools,
    /// Print the prompt section for the allowed tools.
    Prompt,
    /// Validate parameters for a method and print the call that would be sent.
    Validate {
        /// Method identifier, e.g. create_customer.
        method: String,
        /// Parameters as a JSON object.
        #[arg(default_value = "{}")]
        params: String,
    },
    /// Print the JSON Schema of the config file.
    ConfigSchema,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => {
            let mut config = Config::default();
            config.apply_env_overrides(|key| std::env::var(key).ok())?;
            config
        }
    };

    payment_tools::observability::init_tracing_with(&config.observability);

    let registry = ToolRegistry::builtin()?;
    let ctx = config.context();
    tracing::debug!(tools = registry.len(), "catalog loaded");

    match cli.command {
        Command::Tools => {
            let descriptors = registry.descriptors(ctx.permissions.as_ref());
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
        }
        Command::Prompt => {
            println!("{}", registry.generate_prompt(ctx.permissions.as_ref()));
        }
        Command::Validate { method, params } => {
            let raw: serde_json::Value = serde_json::from_str(&params)?;
            let call = prepare_call(
                &registry,
                config.dispatch.customer_binding,
                &method,
                &raw,
                &ctx,
            )?;
            let summary = serde_json::json!({
                "method": call.method,
                "params": call.params,
                "options": call.options,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::ConfigSchema => {
            println!("{}", serde_json::to_string_pretty(&Config::json_schema())?);
        }
    }

    Ok(())
}
