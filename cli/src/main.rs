//! stackmatch CLI: driving adapter for the stackmatch engine.
//!
//! Subcommands:
//! - `match <pattern> <address>...`: check addresses against a pattern
//! - `show <pattern>`: print the rendered grammar
//! - `protocols`: list the protocol registry
//! - `grammars`: list named grammars
//!
//! `<pattern>` is a grammar name (`reliable`) or a JSON/YAML config file.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stackmatch::{grammar, Pattern, PatternConfig, ProtocolRegistry};
use stackmatch_test::TestAddress;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check addresses against a pattern
    Match {
        /// Grammar name or config file
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Addresses such as /ip4/1.2.3.4/tcp/80
        #[arg(value_name = "ADDRESS", required = true)]
        addresses: Vec<String>,

        /// Print the evaluation trace for each address
        #[arg(short, long)]
        trace: bool,
    },
    /// Print the rendered grammar of a pattern
    Show {
        /// Grammar name or config file
        #[arg(value_name = "PATTERN")]
        pattern: String,
    },
    /// List registered protocols
    Protocols,
    /// List named grammars
    Grammars,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Match {
            pattern,
            addresses,
            trace,
        } => cmd_match(&pattern, &addresses, trace),
        Command::Show { pattern } => cmd_show(&pattern).map(|()| true),
        Command::Protocols => {
            cmd_protocols();
            Ok(true)
        }
        Command::Grammars => {
            cmd_grammars();
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

/// Returns `Ok(false)` if any address fails to match.
fn cmd_match(pattern: &str, addresses: &[String], trace: bool) -> Result<bool> {
    let pattern = resolve_pattern(pattern)?;
    let mut all_matched = true;

    for raw in addresses {
        let address: TestAddress = raw
            .parse()
            .with_context(|| format!("invalid address \"{raw}\""))?;

        let matched = if trace {
            let trace = pattern.match_with_trace(&address);
            println!("{raw}: {}", verdict(trace.matched));
            println!("{trace:#?}");
            trace.matched
        } else {
            let matched = pattern.matches(&address);
            println!("{raw}: {}", verdict(matched));
            matched
        };
        all_matched &= matched;
    }

    tracing::debug!(addresses = addresses.len(), all_matched, "match finished");
    Ok(all_matched)
}

fn cmd_show(pattern: &str) -> Result<()> {
    println!("{}", render(pattern)?);
    Ok(())
}

fn render(pattern: &str) -> Result<String> {
    Ok(resolve_pattern(pattern)?.to_string())
}

fn cmd_protocols() {
    for info in ProtocolRegistry::well_known().iter() {
        let value = if info.takes_value { "value" } else { "-" };
        println!("{:>5}  {:<8} {value}", info.code.get(), info.name);
    }
}

fn cmd_grammars() {
    for line in grammar_listing() {
        println!("{line}");
    }
}

fn grammar_listing() -> Vec<String> {
    grammar::NAMES
        .iter()
        .filter_map(|name| grammar::by_name(name).map(|pattern| format!("{name:<9} {pattern}")))
        .collect()
}

fn verdict(matched: bool) -> &'static str {
    if matched {
        "match"
    } else {
        "no match"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pattern loading
// ═══════════════════════════════════════════════════════════════════════════════

fn resolve_pattern(arg: &str) -> Result<Pattern> {
    if let Some(pattern) = grammar::by_name(arg) {
        return Ok(pattern.clone());
    }
    let path = Path::new(arg);
    if !path.exists() {
        bail!(
            "\"{arg}\" is neither a grammar ({}) nor a config file",
            grammar::NAMES.join(", ")
        );
    }
    let config = load_config(path)?;
    config
        .load(ProtocolRegistry::well_known())
        .with_context(|| format!("config \"{arg}\" invalid"))
}

fn load_config(path: &Path) -> Result<PatternConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read \"{}\"", path.display()))?;
    parse_config(&content, is_json(path))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn parse_config(content: &str, json: bool) -> Result<PatternConfig> {
    if json {
        serde_json::from_str(content).context("JSON parse error")
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(content).context("YAML parse error")
    }
}
