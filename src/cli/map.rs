use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::cli::OutputFormat;
use crate::client::{ApiClient, ApiConfig};
use crate::core::types::{CommentaryChannel, TextId};
use crate::mapping::builder::MappingBuilder;
use crate::mapping::payload::MappingPayload;
use crate::matching::aligner::AlignerConfig;
use crate::matching::similarity::{DEFAULT_CONTAINMENT_THRESHOLD, DEFAULT_SIMILARITY_THRESHOLD};
use crate::parsing;

#[derive(Args)]
pub struct MapArgs {
    /// Mapping file: working rows with root text and commentary fields
    #[arg(long)]
    pub mapping_file: PathBuf,

    /// Root lookup file downloaded from the API
    #[arg(long)]
    pub root_lookup: PathBuf,

    /// Commentary lookup file downloaded from the API
    #[arg(long)]
    pub commentary_lookup: PathBuf,

    /// Text id owning the root segments
    #[arg(long)]
    pub root_text_id: String,

    /// Text id owning the commentary segments
    #[arg(long)]
    pub commentary_text_id: String,

    /// Which commentary field of the mapping rows to align (commentary_N)
    #[arg(long, default_value = "1")]
    pub commentary_number: u32,

    /// Whole-segment similarity threshold, in (0, 1]
    #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    pub threshold: f64,

    /// Containment fallback threshold, in (0, 1]
    #[arg(long, default_value_t = DEFAULT_CONTAINMENT_THRESHOLD)]
    pub containment_threshold: f64,

    /// Where to write the payload (default: <mapping-file>_mapping_payload.json)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Upload the payload after writing it
    #[arg(long)]
    pub upload: bool,
}

/// Execute the map subcommand.
///
/// # Errors
///
/// Returns an error on any load, alignment, verification, write, or upload
/// failure; the payload is never uploaded after a partial run.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MapArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = AlignerConfig::new(args.threshold, args.containment_threshold)?;

    let rows = parsing::load_mapping_rows(&args.mapping_file)?;
    let root_lookup = parsing::load_lookup(&args.root_lookup)?;
    let commentary_lookup = parsing::load_lookup(&args.commentary_lookup)?;

    if verbose {
        eprintln!(
            "Loaded {} rows, {} root segments, {} commentary segments",
            rows.len(),
            root_lookup.len(),
            commentary_lookup.len(),
        );
    }

    let channel = CommentaryChannel::new(args.commentary_number);
    let relation = MappingBuilder::new(&root_lookup, &commentary_lookup, &rows, channel, config)
        .run()
        .context("alignment failed; nothing was uploaded")?;

    let payload = MappingPayload::from_relation(
        &relation,
        &TextId::new(args.commentary_text_id.clone()),
        &TextId::new(args.root_text_id.clone()),
    );

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.mapping_file));
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(&output_path, json)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    let uploaded = if args.upload {
        let client = ApiClient::new(ApiConfig::from_env())?;
        let (email, password) = crate::cli::credentials(client.config())?;
        let token = client.login(&email, &password)?;
        client.upload_mappings(&payload, &token)?;
        true
    } else {
        false
    };

    let parent_links: usize = relation.iter().map(|(_, parents)| parents.len()).sum();

    match format {
        OutputFormat::Text => {
            println!("Mapped {} commentary segments ({parent_links} parent links)", relation.len());
            println!("Payload written to {}", output_path.display());
            if uploaded {
                println!("Payload uploaded");
            }
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "commentary_segments": relation.len(),
                "parent_links": parent_links,
                "output": output_path.display().to_string(),
                "uploaded": uploaded,
                "completed_at": chrono::Utc::now(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn default_output_path(mapping_file: &Path) -> PathBuf {
    let stem = mapping_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mapping".to_string());
    mapping_file.with_file_name(format!("{stem}_mapping_payload.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("data/choejuk_mapping.json"));
        assert_eq!(
            path,
            Path::new("data/choejuk_mapping_mapping_payload.json")
        );
    }
}
