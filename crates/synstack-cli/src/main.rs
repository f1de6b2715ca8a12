mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_INJECT_ERROR, EXIT_MANIFEST_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;
use synstack_core::Engine;
use synstack_schema::ParseOptions;

#[derive(Debug, Parser)]
#[command(
    name = "synstack",
    version,
    about = "Declarative installer for EPICS/areaDetector software stacks"
)]
struct Cli {
    /// Path to the configure directory holding the install manifest.
    #[arg(short, long, default_value = "configure", global = true)]
    configure: PathBuf,

    /// Manifest file name inside the configure directory.
    #[arg(long, global = true)]
    manifest: Option<String>,

    /// Override the INSTALL= location from the manifest.
    #[arg(long, global = true)]
    install_location: Option<PathBuf>,

    /// Downgrade install-root and path-resolution failures to warnings.
    #[arg(long, default_value_t = false, global = true)]
    allow_illegal: bool,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse the configure directory and report problems.
    Validate,
    /// Print the resolved install configuration.
    Inspect,
    /// Inject one fragment (or every fragment) into its target file.
    Inject {
        /// Fragment name; all fragments when omitted.
        name: Option<String>,
    },
    /// Rewrite macro settings in a target directory.
    UpdateMacros {
        /// Directory whose files take the macro pass; defaults to the
        /// areaDetector configure directory.
        #[arg(long)]
        target_dir: Option<PathBuf>,
    },
    /// Run the full configuration pass: inject every fragment, then update macros.
    Apply {
        /// Report what would change without touching the install tree.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// List the built-in injector targets.
    Presets,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SYNSTACK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    let parse_options = ParseOptions {
        manifest_filename: cli.manifest.clone(),
        force_location: cli.install_location.clone(),
        allow_illegal: cli.allow_illegal,
    };
    let engine = Engine::new(&cli.configure);
    let json_output = cli.json;

    let result = match cli.command {
        Commands::Validate => commands::validate::run(&engine, &parse_options, json_output),
        Commands::Inspect => commands::inspect::run(&engine, &parse_options, json_output),
        Commands::Inject { name } => {
            commands::inject::run(&engine, &parse_options, name.as_deref(), json_output)
        }
        Commands::UpdateMacros { target_dir } => commands::update_macros::run(
            &engine,
            &parse_options,
            target_dir.as_deref(),
            json_output,
        ),
        Commands::Apply { dry_run } => {
            commands::apply::run(&engine, &parse_options, dry_run, json_output)
        }
        Commands::Presets => commands::presets::run(json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:") || msg.starts_with("resolve error:") {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("inject error:") {
                EXIT_INJECT_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
