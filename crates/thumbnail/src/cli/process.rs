//! The `thumbnail process` command for one-off ingestion.

use clap::Args;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thumbnail_core::{Config, Derivation, ImageProcessor, Ingress};

use crate::ingress::{decode_base64_body, fetch_reference, http_client};

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Image file to process, or `-` for stdin
    #[arg(default_value = "-", conflicts_with = "url")]
    pub input: PathBuf,

    /// Fetch the image from a URL instead of reading INPUT
    #[arg(long)]
    pub url: Option<String>,

    /// INPUT holds a JSON string of base64 data, as sent to `POST /base64`
    #[arg(long, conflicts_with = "url")]
    pub base64: bool,

    /// Destination directory (defaults to the configured directory for the
    /// ingress path)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

impl ProcessArgs {
    /// Which ingress path this invocation stands in for.
    fn ingress(&self) -> Ingress {
        if self.url.is_some() {
            Ingress::Reference
        } else if self.base64 {
            Ingress::Base64
        } else {
            Ingress::Multipart
        }
    }
}

/// Execute the process command.
pub async fn execute(args: ProcessArgs, config: Config) -> anyhow::Result<()> {
    let ingress = args.ingress();
    let dir = args
        .dir
        .clone()
        .unwrap_or_else(|| config.storage_dir(ingress));
    let processor = Arc::new(ImageProcessor::new(&config));
    tracing::debug!(%ingress, dir = %dir.display(), "Processing single image");

    let derivation = match args.url {
        Some(url) => {
            let client = http_client(&config.limits)?;
            let data = fetch_reference(&client, &url, config.limits.max_upload_bytes()).await?;
            processor.process_detached(data, dir).await?
        }
        None => {
            let input = args.input;
            let base64 = args.base64;
            tokio::task::spawn_blocking(move || process_input(&processor, &input, base64, &dir))
                .await??
        }
    };

    println!("{}", serde_json::to_string_pretty(&derivation)?);
    Ok(())
}

/// Stream a local file or stdin through the pipeline.
fn process_input(
    processor: &ImageProcessor,
    input: &Path,
    base64: bool,
    dir: &Path,
) -> anyhow::Result<Derivation> {
    let reader: Box<dyn Read> = if input == Path::new("-") {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(File::open(input)?)
    };

    if base64 {
        let mut body = Vec::new();
        let mut reader = reader;
        reader.read_to_end(&mut body)?;
        let data = decode_base64_body(&body)?;
        Ok(processor.process_bytes(&data, dir)?)
    } else {
        Ok(processor.process(reader, dir)?)
    }
}
