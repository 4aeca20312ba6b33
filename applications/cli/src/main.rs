/// Encore - replays a command log against a media library
use anyhow::Context;
use clap::{Parser, Subcommand};
use encore_cli::{input, CommandOutput, EncoreConfig, Session};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore multi-user playback replay engine", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./encore.toml when present)
    #[arg(short, long, global = true, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a command log and write the output records
    Run {
        /// Library file with songs, podcasts and users
        #[arg(short, long)]
        library: PathBuf,
        /// Command log to replay
        #[arg(long)]
        commands: PathBuf,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse the inputs and report what they contain
    Check {
        #[arg(short, long)]
        library: PathBuf,
        #[arg(long)]
        commands: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EncoreConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validate()?;

    // Initialize tracing; RUST_LOG wins over the configured filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Run {
            library,
            commands,
            output,
        } => run(&config, &library, &commands, output.as_deref()),
        Commands::Check { library, commands } => check(&library, commands.as_deref()),
    }
}

fn run(
    config: &EncoreConfig,
    library: &Path,
    commands: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let library = input::read_library(library)
        .and_then(input::LibraryInput::into_library)
        .with_context(|| format!("Failed to read library {}", library.display()))?;
    let commands = input::read_commands(commands)
        .with_context(|| format!("Failed to read commands {}", commands.display()))?;

    tracing::info!(commands = commands.len(), "Starting replay");
    let mut session = Session::new(library, config);
    let outputs = session.replay(&commands);

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_outputs(BufWriter::new(file), &outputs, config.output.pretty)?;
            tracing::info!(records = outputs.len(), path = %path.display(), "Output written");
        }
        None => write_outputs(io::stdout().lock(), &outputs, config.output.pretty)?,
    }
    Ok(())
}

fn write_outputs<W: Write>(mut writer: W, outputs: &[CommandOutput], pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, outputs)?;
    } else {
        serde_json::to_writer(&mut writer, outputs)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn check(library: &Path, commands: Option<&Path>) -> anyhow::Result<()> {
    let library = input::read_library(library)
        .and_then(input::LibraryInput::into_library)
        .with_context(|| format!("Failed to read library {}", library.display()))?;
    println!(
        "Library: {} songs, {} podcasts, {} users",
        library.songs().count(),
        library.podcasts().count(),
        library.listeners().len()
    );

    if let Some(path) = commands {
        let commands = input::read_commands(path)
            .with_context(|| format!("Failed to read commands {}", path.display()))?;
        let unknown = commands.iter().filter(|c| c.kind().is_none()).count();
        println!("Commands: {} ({} unknown)", commands.len(), unknown);
    }
    Ok(())
}
