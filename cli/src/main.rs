use std::io::{self, Read};
use std::path::PathBuf;

use boop::options::{combine, resolve};
use boop::types::{BoopOptions, Metadata, PanelVariant};
use boop::{BoopProvider, ConfigError, DiagnosticsService, ProviderError, SubmitError, SubmitPayload};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("failed to read {what}: {source}")]
    Io { what: String, source: io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("metadata must be a JSON object")]
    MetadataNotObject,
}

#[derive(Parser, Debug)]
#[command(name = "boop", about = "Send feedback through a Boop endpoint")]
struct Cli {
    /// JSON options document (camelCase, same shape as the widget options).
    #[arg(long, env = "BOOP_OPTIONS_FILE")]
    options: Option<PathBuf>,

    #[arg(long)]
    project_id: Option<String>,

    #[arg(long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one feedback message.
    Send(SendArgs),
    /// Print the resolved endpoint and mode without sending anything.
    Resolve,
}

#[derive(Args, Debug)]
struct SendArgs {
    /// Message text, or - to read it from stdin.
    message: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Page URL to attach; defaults to none outside a browser.
    #[arg(long)]
    url: Option<String>,

    /// Extra metadata as a JSON object.
    #[arg(long)]
    metadata: Option<String>,

    /// Attach recent log events and the last panic to the submission.
    #[arg(long, default_value_t = false)]
    include_stack_trace: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let diagnostics = DiagnosticsService::global();
    tracing_subscriber::registry()
        .with(stderr_layer(io::stderr))
        .with(diagnostics.layer())
        .init();

    let options = load_options(&cli)?;
    match cli.command {
        Command::Resolve => run_resolve(&options),
        Command::Send(args) => run_send(options, args).await,
    }
}

/// Human-readable log output, INFO and above. The diagnostics layer is not
/// filtered by this.
fn stderr_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer::<S>().with_writer(writer).with_filter(LevelFilter::INFO)
}

/// File layer, then env, then flags; later layers win.
fn load_options(cli: &Cli) -> Result<BoopOptions, CliError> {
    let file = match &cli.options {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|source| CliError::Io { what: path.display().to_string(), source })?;
            Some(BoopOptions::from_json_str(&raw)?)
        }
        None => None,
    };
    let env = BoopOptions::from_env()?;
    let flags = BoopOptions { project_id: cli.project_id.clone(), endpoint: cli.endpoint.clone(), ..BoopOptions::default() };

    let layered = combine(file.as_ref(), Some(&env));
    Ok(combine(Some(&layered), Some(&flags)))
}

fn run_resolve(options: &BoopOptions) -> Result<(), CliError> {
    let resolved = resolve(Some(options))?;
    let mode = match resolved.mode {
        PanelVariant::Sidebar => "sidebar",
        PanelVariant::Widget => "widget",
    };
    print_json(&serde_json::json!({
        "endpoint": resolved.endpoint,
        "projectId": resolved.project_id,
        "mode": mode,
        "includeStackTrace": resolved.include_stack_trace,
    }))
}

async fn run_send(options: BoopOptions, args: SendArgs) -> Result<(), CliError> {
    let message = if args.message == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Io { what: "stdin".into(), source })?;
        buf
    } else {
        args.message
    };
    let metadata = args.metadata.as_deref().map(parse_metadata).transpose()?;

    let provider = BoopProvider::from_env(Some(options))?;
    let overrides = BoopOptions { include_stack_trace: args.include_stack_trace.then_some(true), ..BoopOptions::default() };
    let payload = SubmitPayload { name: args.name, email: args.email, message, url: args.url, metadata };

    let response = provider.submit_feedback(payload, Some(&overrides)).await?;
    tracing::info!(status = response.status, "feedback accepted");
    if !response.body.is_empty() {
        println!("{}", response.body);
    }
    Ok(())
}

fn parse_metadata(raw: &str) -> Result<Metadata, CliError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::MetadataNotObject),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
