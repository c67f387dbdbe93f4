use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use wirelesscalc::config::{CalcConfig, ErlangMethod};
use wirelesscalc::explain::{analyze, explainer_from_config};
use wirelesscalc::output::{CalculationOutput, OutputFormat, create_formatter};
use wirelesscalc::{Fields, Scenario};

#[derive(Parser, Debug)]
#[command(name = "wirelesscalc")]
#[command(about = "Closed-form wireless system calculations", long_about = None)]
struct Args {
    /// Calculator to run
    #[arg(value_enum)]
    scenario: Scenario,

    /// JSON request file ("-" reads stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Request field, e.g. "bandwidth=4000" (repeatable, overrides --input)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Explain the results
    #[arg(short = 'e', long)]
    explain: bool,

    /// Explanation timeout in milliseconds (overrides the configuration)
    #[arg(long)]
    explain_timeout_ms: Option<u64>,

    /// Erlang-B evaluation method (overrides the configuration)
    #[arg(long, value_enum)]
    erlang_method: Option<ErlangMethod>,

    /// Print the default of every request field and exit
    #[arg(long)]
    show_defaults: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_assignment(s: &str) -> Result<(String, Value)> {
    let (key, value) = s
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Empty field name in '{}'", s);
    }
    Ok((key.to_string(), Value::String(value.trim().to_string())))
}

fn read_fields(path: &Path) -> Result<Fields> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?
    };
    parse_fields(&content)
}

fn parse_fields(content: &str) -> Result<Fields> {
    match serde_json::from_str(content).context("Failed to parse request JSON")? {
        Value::Object(fields) => Ok(fields),
        other => anyhow::bail!("Request must be a JSON object, got {}", other),
    }
}

fn load_config(args: &Args) -> Result<CalcConfig> {
    let mut config = match args.config {
        Some(ref path) => CalcConfig::load(path)?,
        None => CalcConfig::default(),
    };
    if let Some(ms) = args.explain_timeout_ms {
        config.explain.timeout_ms = ms;
    }
    if let Some(method) = args.erlang_method {
        config.cellular.erlang_method = method;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = load_config(&args)?;
    log::debug!("Configuration: {:?}", config);

    if args.show_defaults {
        let defaults = args.scenario.defaults(&config);
        println!(
            "{}",
            serde_json::to_string_pretty(&defaults).context("Failed to serialize defaults")?
        );
        return Ok(());
    }

    let mut fields = match args.input {
        Some(ref path) => read_fields(path)?,
        None => Fields::new(),
    };
    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        fields.insert(key, value);
    }
    log::info!(
        "Running {} with {} field(s)",
        args.scenario.title(),
        fields.len()
    );

    let output = if args.explain {
        let explainer = explainer_from_config(&config)?;
        CalculationOutput::from_analysis(
            args.scenario,
            analyze(args.scenario, &fields, &config, explainer),
        )
    } else {
        CalculationOutput::new(args.scenario, args.scenario.compute(&fields, &config))
    };

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let Some(header) = formatter.header() {
        println!("{}", header);
    }
    println!("{}", formatter.format(&output));

    if output.response.error().is_some() {
        std::process::exit(1);
    }
    Ok(())
}
