use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::client::{ApiClient, ApiConfig};
use crate::parsing;

#[derive(Args)]
pub struct UploadSegmentsArgs {
    /// Prepared segment payload file
    #[arg(required = true)]
    pub payload_file: PathBuf,
}

/// Execute the upload-segments subcommand.
///
/// # Errors
///
/// Returns an error if the payload cannot be read or the API rejects it.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: UploadSegmentsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let payload = parsing::load_json_value(&args.payload_file)?;

    if verbose {
        eprintln!("Loaded payload from {}", args.payload_file.display());
    }

    let client = ApiClient::new(ApiConfig::from_env())?;
    let (email, password) = crate::cli::credentials(client.config())?;
    let token = client.login(&email, &password)?;
    let response = client.upload_segments(&payload, &token)?;

    match format {
        OutputFormat::Text => {
            println!("Segments uploaded from {}", args.payload_file.display());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
