//! MassMailer CLI - attribute scaffolding and templated sends.
//!
//! # Commands
//!
//! - `massmailer generate attribute <name>` - Generate a campaign attribute
//! - `massmailer send` - Render a template and send it to a recipient list
//! - `massmailer completions` - Generate shell completions

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::Colorize;
use serde_json::Value;
use std::io;
use std::path::PathBuf;

mod commands;
mod error;
mod generators;
mod templates;

use commands::generate::AttributeOptions;
use commands::send::{self, SendOptions};
use error::CliResult;
use templates::ValueKind;

/// MassMailer CLI - bulk email tooling
#[derive(Parser)]
#[command(name = "massmailer")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "CLI tool for MassMailer - attribute scaffolding and templated sends")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = format!(
    "{}\n  {} massmailer g attribute IncludeInstagram --default true\n  {} massmailer send -t welcome --to ada@example.com -s Hello --dry-run",
    "Examples:".bright_cyan().bold(),
    "$".dimmed(),
    "$".dimmed(),
))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code (attribute)
    #[command(alias = "g")]
    Generate {
        #[command(subcommand)]
        generator: GeneratorType,
    },

    /// Render a template and send it to a recipient list
    Send(SendArgs),

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum GeneratorType {
    /// Generate a campaign attribute
    #[command(alias = "a")]
    Attribute(AttributeArgs),
}

#[derive(Args)]
struct AttributeArgs {
    /// Attribute name (e.g., "IncludeInstagram" or "include_instagram")
    name: String,

    /// Module path the attribute lives in
    #[arg(short, long, default_value = "attributes")]
    namespace: String,

    /// Declared default value
    #[arg(short, long)]
    default: Option<String>,

    /// Type of the default value (inferred when omitted)
    #[arg(short = 't', long = "type", value_enum, requires = "default")]
    kind: Option<ValueKind>,

    /// Output directory (defaults to src/<namespace> in the project)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    force: bool,
}

#[derive(Args)]
struct SendArgs {
    /// Template identifier (dotted path below the template directory)
    #[arg(short, long)]
    template: String,

    /// Recipient address (repeatable)
    #[arg(long, required = true)]
    to: Vec<String>,

    /// Subject line
    #[arg(short, long)]
    subject: String,

    /// Sender address (defaults to MAIL_FROM_ADDRESS)
    #[arg(long)]
    from: Option<String>,

    /// Sender display name (defaults to MAIL_FROM_NAME)
    #[arg(long)]
    from_name: Option<String>,

    /// Template variable as key=value (repeatable, JSON values keep their type)
    #[arg(long = "var", value_parser = send::parse_var)]
    vars: Vec<(String, Value)>,

    /// Template directory (defaults to MAIL_TEMPLATES)
    #[arg(long, env = "MAIL_TEMPLATES")]
    templates: Option<PathBuf>,

    /// TOML configuration file (defaults to MAIL_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log the message instead of sending it
    #[arg(long)]
    dry_run: bool,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.verbose, cli.quiet);

    let result: CliResult<()> = match cli.command {
        Commands::Generate { generator } => match generator {
            GeneratorType::Attribute(args) => {
                let options = AttributeOptions {
                    name: args.name,
                    namespace: args.namespace,
                    default: args.default,
                    kind: args.kind,
                    path: args.path,
                    force: args.force,
                };
                commands::generate::attribute(&options).await.map(|_| ())
            }
        },

        Commands::Send(args) => {
            send::run(SendOptions {
                template: args.template,
                to: args.to,
                subject: args.subject,
                from: args.from,
                from_name: args.from_name,
                vars: args.vars,
                templates: args.templates,
                config: args.config,
                dry_run: args.dry_run,
            })
            .await
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "massmailer", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("\n  {} {}\n", "Error:".red().bold(), e);
        std::process::exit(1);
    };
}
