mod config;
mod discovery;
mod explain;
mod output;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{CheckOverrides, ConfigMerger};
use declorder_core::adapters::{FsSourcePort, FsWritePort};
use declorder_core::{Settings, build_report, run_files};
use declorder_types::report::ToolInfo;
use discovery::{ExcludeSet, discover_go_files};
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Exit code when ordering diagnostics remain.
const EXIT_DIAGNOSTICS: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "declorder",
    version,
    about = "Checks and fixes the order of struct, constructor and method declarations in Go files."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report (and optionally fix) declaration order problems.
    Check(CheckArgs),
    /// Explain what an ordering rule requires.
    Explain(ExplainArgs),
    /// List all ordering rules.
    ListRules(ListRulesArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Files or directories to check (default: current directory).
    #[arg(default_value = ".")]
    paths: Vec<Utf8PathBuf>,

    /// Rewrite files into canonical order.
    #[arg(long, default_value_t = false, conflicts_with = "diff")]
    fix: bool,

    /// Print a unified diff of the planned rewrite instead of writing it.
    #[arg(long, default_value_t = false)]
    diff: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also require alphabetical order of constructors and methods.
    #[arg(long, default_value_t = false)]
    alphabetical: bool,

    /// Disable the constructor placement checks.
    #[arg(long, default_value_t = false)]
    no_constructor_check: bool,

    /// Disable the exported-before-unexported check.
    #[arg(long, default_value_t = false)]
    no_method_visibility_check: bool,

    /// Glob of paths to skip (repeatable, extends [files].exclude).
    #[arg(long)]
    exclude: Vec<String>,

    /// Config file (default: ./declorder.toml when present).
    #[arg(long, env = "DECLORDER_CONFIG")]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule id (e.g. "constructor-after-type").
    rule: String,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Explain(args) => cmd_explain(args).map(|()| ExitCode::SUCCESS),
        Command::ListRules(args) => cmd_list_rules(args).map(|()| ExitCode::SUCCESS),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::load_or_default(Utf8Path::new("."), args.config.as_deref())
        .context("load declorder.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_check_args(
        CheckOverrides {
            alphabetical: args.alphabetical,
            no_constructor_check: args.no_constructor_check,
            no_method_visibility_check: args.no_method_visibility_check,
        },
        &args.exclude,
    );
    debug!(checks = ?merged.checks, exclude = ?merged.exclude, "merged config");

    let excludes = ExcludeSet::new(&merged.exclude)?;
    let files = discover_go_files(&args.paths, &excludes)?;

    let settings = Settings {
        checks: merged.checks,
        fix: args.fix,
        diff: args.diff,
    };
    let outcome = run_files(&files, &settings, &FsSourcePort, &FsWritePort);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => output::write_text(&mut out, &outcome)?,
        OutputFormat::Json => output::write_json(&mut out, &build_report(&outcome, tool_info()))?,
    }
    out.flush().context("flush stdout")?;

    if outcome.summary.errors > 0 {
        return Ok(ExitCode::from(1));
    }
    if outcome.remaining() > 0 {
        info!(remaining = outcome.remaining(), "ordering diagnostics remain");
        return Ok(ExitCode::from(EXIT_DIAGNOSTICS));
    }
    Ok(ExitCode::SUCCESS)
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "declorder".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{list_rule_ids, lookup_rule};

    let Some(rule) = lookup_rule(&args.rule) else {
        let available = list_rule_ids().join(", ");
        anyhow::bail!(
            "Unknown rule: '{}'\n\nAvailable rules: {}",
            args.rule,
            available
        );
    };

    println!("================================================================================");
    println!("RULE: {}", rule.title);
    println!("================================================================================");
    println!();
    println!("Id:       {}", rule.rule);
    println!("Toggle:   {}", rule.toggle);
    println!(
        "Default:  {}",
        if rule.enabled_by_default { "on" } else { "off" }
    );
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.description);
    println!();

    println!("EXAMPLE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.example);
    println!();

    println!("FIXED");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.fixed);
    println!();

    Ok(())
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<()> {
    use explain::RULE_REGISTRY;

    match args.format {
        OutputFormat::Text => {
            println!("Available rules:\n");
            println!("  {:<28} {:<8} TITLE", "ID", "DEFAULT");
            println!("  {:<28} {:<8} -----", "--", "-------");
            for rule in RULE_REGISTRY {
                println!(
                    "  {:<28} {:<8} {}",
                    rule.rule.as_str(),
                    if rule.enabled_by_default { "on" } else { "off" },
                    rule.title
                );
            }
            println!();
            println!("Use 'declorder explain <rule>' for details.");
        }
        OutputFormat::Json => {
            let rules: Vec<_> = RULE_REGISTRY
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "id": r.rule.as_str(),
                        "title": r.title,
                        "enabled_by_default": r.enabled_by_default,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
    }
    Ok(())
}
