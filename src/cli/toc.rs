use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::client::{ApiClient, ApiConfig};
use crate::matching::similarity::DEFAULT_SIMILARITY_THRESHOLD;
use crate::parsing;
use crate::resolver;

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct TocModeArgs {
    /// Lookup file for fuzzy alignment resolution
    #[arg(long)]
    pub lookup: Option<PathBuf>,

    /// Digest-keyed id table for exact content resolution
    #[arg(long)]
    pub digest_lookup: Option<PathBuf>,
}

#[derive(Args)]
pub struct TocArgs {
    /// TOC payload with segment contents as placeholders
    #[arg(required = true)]
    pub toc_file: PathBuf,

    #[command(flatten)]
    pub mode: TocModeArgs,

    /// Whole-segment similarity threshold, in (0, 1]
    #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    pub threshold: f64,

    /// Where to write the resolved TOC (default: <toc-file>_resolved.json)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Upload the resolved TOC after writing it
    #[arg(long)]
    pub upload: bool,
}

/// Execute the toc subcommand.
///
/// # Errors
///
/// Returns an error on any load, resolution, write, or upload failure; a
/// partially-resolved TOC is never written or uploaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: TocArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut toc = parsing::load_toc(&args.toc_file)?;
    let segment_count = toc.segment_count();

    if verbose {
        eprintln!("Loaded TOC with {segment_count} segments");
    }

    let mode = if let Some(lookup_path) = &args.mode.lookup {
        let lookup = parsing::load_lookup(lookup_path)?;
        resolver::resolve_by_alignment(&mut toc, &lookup, args.threshold)
            .context("TOC alignment failed; nothing was written")?;
        "alignment"
    } else {
        // clap guarantees exactly one mode flag is present
        let lookup_path = args.mode.digest_lookup.as_ref().expect("mode flag");
        let lookup = parsing::load_digest_lookup(lookup_path)?;
        resolver::resolve_by_digest(&mut toc, &lookup)
            .context("TOC digest resolution failed; nothing was written")?;
        "digest"
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.toc_file));
    let json = serde_json::to_string_pretty(&toc)?;
    std::fs::write(&output_path, json)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    let uploaded = if args.upload {
        let client = ApiClient::new(ApiConfig::from_env())?;
        let (email, password) = crate::cli::credentials(client.config())?;
        let token = client.login(&email, &password)?;
        client.upload_toc(&toc, &token)?;
        true
    } else {
        false
    };

    match format {
        OutputFormat::Text => {
            println!("Resolved {segment_count} TOC segments ({mode} mode)");
            println!("Resolved TOC written to {}", output_path.display());
            if uploaded {
                println!("TOC uploaded");
            }
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "segments": segment_count,
                "mode": mode,
                "output": output_path.display().to_string(),
                "uploaded": uploaded,
                "completed_at": chrono::Utc::now(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn default_output_path(toc_file: &Path) -> PathBuf {
    let stem = toc_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "toc".to_string());
    toc_file.with_file_name(format!("{stem}_resolved.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("out/heart_sutra_toc.json"));
        assert_eq!(path, Path::new("out/heart_sutra_toc_resolved.json"));
    }
}
