//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands;
use jutge_api_client::output::OutputMode;

/// jutge - Command line access to the Jutge.org API
#[derive(Parser, Debug)]
#[command(
    name = "jutge",
    version,
    about = "Command line access to the Jutge.org API",
    long_about = "Invoke Jutge.org API functions from the command line.\n\n\
                  The endpoint defaults to https://api.jutge.org/api and can be\n\
                  changed with JUTGE_API_URL or ~/.config/jutge/config.toml."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true, conflicts_with = "yaml")]
    pub json: bool,

    /// Output in YAML format
    #[arg(long, global = true)]
    pub yaml: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the server time
    Time,

    /// Show a fortune cookie
    Fortune,

    /// Show homepage statistics
    Stats,

    /// Download the Jutge logo
    Logo {
        /// Where to write the image (defaults to the server-provided name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Call any API function
    Call {
        /// Function name, e.g. `tables.get_languages`
        func: String,

        /// Input as JSON (defaults to null)
        #[arg(short, long)]
        input: Option<String>,

        /// Files to send as input files, in order
        #[arg(short = 'f', long = "file")]
        files: Vec<PathBuf>,

        /// Log in with this email before calling
        #[arg(long, requires = "password")]
        email: Option<String>,

        /// Password for --email
        #[arg(long, requires = "email")]
        password: Option<String>,

        /// Directory where attachments are written
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Convert between JSON and YAML
    Convert {
        /// Conversion direction
        direction: Direction,

        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Show version
    Version,
}

/// Direction of a text conversion
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// JSON in, YAML out
    JsonToYaml,
    /// YAML in, JSON out
    YamlToJson,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else if cli.yaml {
        OutputMode::Yaml
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Time) => commands::time(output_mode),
        Some(Command::Fortune) => commands::fortune(output_mode),
        Some(Command::Stats) => commands::stats(output_mode),
        Some(Command::Logo { output }) => commands::logo(output, output_mode),
        Some(Command::Call {
            func,
            input,
            files,
            email,
            password,
            dir,
        }) => {
            let login = email.zip(password);
            commands::call(&func, input.as_deref(), &files, login, &dir, output_mode)
        },
        Some(Command::Convert { direction, file }) => commands::convert(direction, file.as_deref()),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("jutge v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            println!("jutge v{}", env!("CARGO_PKG_VERSION"));
            println!("\nRun 'jutge --help' for usage");
            Ok(())
        },
    }
}
