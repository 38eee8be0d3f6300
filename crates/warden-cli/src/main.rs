//! Warden CLI: evaluate subjects against guardrail policies.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use warden_core::{Policy, PolicyReport};

#[derive(Parser)]
#[command(name = "warden", about = "Guardrail policy evaluation", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a subject against a policy
    Check {
        /// Policy file (.yaml, .yml or .json)
        #[arg(short, long)]
        policy: PathBuf,

        /// Subject JSON file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        subject: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Compile a policy and print its rule order
    Validate {
        /// Policy file (.yaml, .yml or .json)
        #[arg(short, long)]
        policy: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "warden_core=debug,warden=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check {
            policy,
            subject,
            format,
        } => run_check(&policy, &subject, format),
        Commands::Validate { policy } => run_validate(&policy),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run_check(policy_path: &Path, subject: &str, format: Format) -> anyhow::Result<ExitCode> {
    let compiled = load_policy(policy_path)?.compile().with_context(|| {
        format!("failed to compile policy '{}'", policy_path.display())
    })?;
    let subject = read_subject(subject)?;

    tracing::info!(policy = %compiled.name(), "Evaluating subject");
    let report = compiled.report(&subject);

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print!("{}", render_text(&report)),
    }

    Ok(if report.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn run_validate(policy_path: &Path) -> anyhow::Result<ExitCode> {
    let policy = load_policy(policy_path)?;
    let compiled = policy
        .compile()
        .with_context(|| format!("failed to compile policy '{}'", policy_path.display()))?;

    println!("Policy '{}' is valid.", compiled.name());
    println!("Evaluation order:");
    for (position, name) in compiled.rule_names().iter().enumerate() {
        println!("  {}. {}", position + 1, name);
    }

    Ok(ExitCode::SUCCESS)
}

fn load_policy(path: &Path) -> anyhow::Result<Policy> {
    Policy::from_path(path).with_context(|| format!("failed to load policy '{}'", path.display()))
}

fn read_subject(source: &str) -> anyhow::Result<Value> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read subject from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read subject '{}'", source))?
    };

    serde_json::from_str(&raw).context("subject is not valid JSON")
}

fn render_text(report: &PolicyReport) -> String {
    let mut out = String::new();
    let Some(outcome) = report.outcome.as_ref().filter(|_| !report.passed) else {
        out.push_str(&format!("PASS  {}\n", report.policy));
        return out;
    };

    let status = outcome["status"].as_str().unwrap_or("unknown");
    out.push_str(&format!("{}  {}\n", status.to_uppercase(), report.policy));

    if let Some(fields) = outcome.as_object() {
        for (key, value) in fields {
            if key == "status" || key == "sources" {
                continue;
            }
            let value = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
            out.push_str(&format!("  {}: {}\n", key, value));
        }
    }

    if let Some(sources) = outcome["sources"].as_array().filter(|s| !s.is_empty()) {
        out.push_str("  sources:\n");
        for source in sources {
            out.push_str(&format!(
                "    - {} ({}): {}\n",
                source["name"].as_str().unwrap_or_default(),
                source["reference"].as_str().unwrap_or_default(),
                source["content"].as_str().unwrap_or_default(),
            ));
        }
    }

    out
}
