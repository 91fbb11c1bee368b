mod table;

use anyhow::{Context, Result};
use clap::Parser;
use optline_core::{Getopt, help};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

use crate::table::load_table;

#[derive(Parser)]
#[command(name = "optline")]
#[command(version, about = "Parse arguments against a getopt-style option table", long_about = None)]
struct Cli {
    /// Option table (JSON array of records or tuples; `-` reads stdin).
    /// Repeat to append more tables; they are registered after `--bind-help`.
    #[arg(short, long, value_name = "FILE", required = true)]
    options: Vec<PathBuf>,

    /// Bind `-h, --help` and keep the default error policy (print, exit 1)
    #[arg(long)]
    bind_help: bool,

    /// Print the rendered help instead of parsing
    #[arg(long)]
    usage: bool,

    /// Sort help rows by long name
    #[arg(long)]
    sort: bool,

    /// Program name shown in the default help template
    #[arg(long, value_name = "NAME")]
    program: Option<String>,

    /// Help template; `[[OPTIONS]]` is replaced by the option table
    #[arg(long, value_name = "TEXT", conflicts_with = "program")]
    template: Option<String>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Arguments to parse (pass them after `--`)
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let (first, rest) = cli
        .options
        .split_first()
        .context("no option table given")?;
    let mut getopt = Getopt::new(load_table(first)?)
        .with_context(|| format!("invalid option table: {}", first.display()))?;

    if cli.bind_help {
        getopt.bind_help(None).context("failed to bind help")?;
    } else {
        // Report through anyhow instead of exiting from inside the parser.
        getopt.error(|err| tracing::debug!(error = %err, "parse failed"));
    }

    for path in rest {
        getopt
            .append(load_table(path)?)
            .with_context(|| format!("invalid option table: {}", path.display()))?;
    }

    if let Some(template) = &cli.template {
        getopt.set_help(template.as_str());
    } else if let Some(program) = &cli.program {
        getopt.set_help(help::default_template(Some(program.as_str())));
    }
    if cli.sort {
        getopt.sort();
    }

    if cli.usage {
        println!("{}", getopt.help_text());
        return Ok(());
    }

    let result = getopt
        .parse(&cli.args)
        .context("failed to parse arguments")?;

    let out = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{out}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
