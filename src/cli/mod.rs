//! Command-line interface for segment-mapper.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **map**: build a commentary-to-root mapping payload from a mapping
//!   file and two lookup files
//! - **toc**: resolve a table-of-contents payload's segment placeholders to
//!   API identifiers
//! - **upload-segments**: post a prepared segment payload file
//!
//! ## Usage
//!
//! ```text
//! # Build a mapping payload (and stop before uploading)
//! segment-mapper map --mapping-file data/mapping.json \
//!     --root-lookup lookup/root.json --commentary-lookup lookup/commentary.json \
//!     --root-text-id <uuid> --commentary-text-id <uuid>
//!
//! # Same, then upload with credentials from the environment
//! segment-mapper map ... --upload
//!
//! # Resolve a TOC by fuzzy alignment
//! segment-mapper toc toc_payload.json --lookup lookup/root.json
//!
//! # JSON summaries for scripting
//! segment-mapper map ... --format json
//! ```

use std::io::{BufRead, Write};

use clap::{Parser, Subcommand};

use crate::client::ApiConfig;

pub mod map;
pub mod toc;
pub mod upload;

#[derive(Parser)]
#[command(name = "segment-mapper")]
#[command(author = "Pecha Tools")]
#[command(version)]
#[command(about = "Align segmented text and build commentary-to-root mappings")]
#[command(
    long_about = "segment-mapper aligns independently-produced segment sequences using fuzzy string matching.\n\nLookup sequences carry the identifiers the content API assigned on upload; working sequences are freshly parsed source text with transcription noise. The aligner tolerates diacritics, invisible Unicode characters and minor spelling drift while keeping both sequences in lockstep order, and fails loudly whenever an element cannot be placed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the commentary-to-root mapping payload
    Map(map::MapArgs),

    /// Resolve TOC segment placeholders to API identifiers
    Toc(toc::TocArgs),

    /// Upload a prepared segment payload file
    UploadSegments(upload::UploadSegmentsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Credentials from the environment, falling back to interactive prompts.
///
/// # Errors
///
/// Returns an error if stdin closes before both values are read.
pub fn credentials(config: &ApiConfig) -> anyhow::Result<(String, String)> {
    let email = match &config.email {
        Some(email) => email.clone(),
        None => prompt("Enter your email: ")?,
    };
    let password = match &config.password {
        Some(password) => password.clone(),
        None => prompt("Enter your password: ")?,
    };
    Ok((email, password))
}

fn prompt(message: &str) -> anyhow::Result<String> {
    eprint!("{message}");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    if line.is_empty() {
        anyhow::bail!("stdin closed while waiting for input");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
