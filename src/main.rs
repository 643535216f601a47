use clap::{Parser, Subcommand};
use snapkeep::backup::archive::ArchiveFormat;
use snapkeep::backup::backup_config::BackupConfig;
use snapkeep::backup::format_bytes;
use snapkeep::backup::result_error::result::Result;
use std::path::PathBuf;
use std::process::exit;
use tracing::error;

/// Create, list and restore versioned backups
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Location of an optional YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a backup of a file or directory
    Create {
        /// Source path to back up
        source: PathBuf,
        /// Custom backup name (default: source base name)
        #[arg(long)]
        name: Option<String>,
        /// Container format for this run
        #[arg(long, value_enum)]
        compression: Option<ArchiveFormat>,
    },
    /// List available backups, newest first
    List {
        /// Filter by backup name
        #[arg(long)]
        name: Option<String>,
        /// Emit records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore a backup archive to a destination
    Restore {
        /// Backup archive path
        archive: PathBuf,
        /// Restore destination
        destination: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{e}");
        exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => BackupConfig::load(path)?,
        None => BackupConfig::default(),
    };

    match args.command {
        Command::Create {
            source,
            name,
            compression,
        } => {
            config.engine(compression).create(&source, name.as_deref())?;
        }
        Command::List { name, json } => {
            let records = config.engine(None).list(name.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!(
                        "{} - {} - {}",
                        record.path.file_name().unwrap_or_default().to_string_lossy(),
                        format_bytes(record.size_bytes),
                        record.timestamp,
                    );
                }
            }
        }
        Command::Restore {
            archive,
            destination,
        } => {
            if !config.engine(None).restore(&archive, &destination) {
                exit(1);
            }
        }
    }

    Ok(())
}
