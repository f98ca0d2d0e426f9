//! # Transcript QC terminal client
//!
//! Terminal counterpart of the correction workspace.
//!
//! ```text
//! transcript-qc --password room101 load "4003 C1 T1" --out 4003-c1-t1.txt
//! transcript-qc --password room101 load-corrected "4003 C1 T1"
//! transcript-qc --password room101 save "4003 C1 T1" --file 4003-c1-t1.txt
//! ```
//!
//! Transcripts go to stdout (or `--out`); the signed video URL and status
//! messages go to stderr.

mod client;
mod shell;
#[cfg(test)]
mod test_helpers;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use client::{Corrected, QcClient};
use shell::Shell;

#[derive(Parser)]
#[command(name = "transcript-qc", about = "Transcript QC terminal client", version)]
struct Cli {
    /// Gateway base URL
    #[arg(long, env = "QC_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Workspace password
    #[arg(long, env = "QC_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the original transcript and print the signed video URL
    Load {
        /// Video identifier, e.g. "4003 C1 T1"
        video_id: String,
        /// Write the transcript here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load the corrected transcript, if one was saved
    LoadCorrected {
        /// Video identifier, e.g. "4003 C1 T1"
        video_id: String,
        /// Write the transcript here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Save a corrected transcript, replacing the stored one
    Save {
        /// Video identifier, e.g. "4003 C1 T1"
        video_id: String,
        /// File holding the corrected transcript
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut shell = Shell::unlock(QcClient::new(&cli.server), &cli.password).await?;

    match cli.command {
        Command::Load { video_id, out } => {
            let loaded = shell.load(&video_id).await?;
            emit(&loaded.transcript_text, out.as_ref())?;
            eprintln!("video: {}", loaded.video_url);
        }
        Command::LoadCorrected { video_id, out } => match shell.load_corrected(&video_id).await? {
            Corrected::Found(text) => emit(&text, out.as_ref())?,
            Corrected::Missing => eprintln!("No corrected version found"),
        },
        Command::Save { video_id, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            shell.save(&video_id, &text).await?;
            eprintln!("Saved successfully!");
        }
    }

    Ok(())
}

fn emit(text: &str, out: Option<&PathBuf>) -> anyhow::Result<()> {
    match out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
