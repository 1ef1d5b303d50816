use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use remote_upload::config::{self, validate_config, UploadConfig};
use remote_upload::{UploadClient, UploadTarget};

/// Upload files or remote URLs and print the stored file identifiers.
#[derive(Parser, Debug)]
#[command(name = "remote-upload", version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Public key, overrides the config file
    #[arg(long, env = "REMOTE_UPLOAD_PUBLIC_KEY")]
    public_key: Option<String>,

    /// Upload service base URL, overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long)]
    poll_interval_ms: Option<u64>,

    #[arg(long)]
    max_poll_attempts: Option<u32>,

    #[arg(long)]
    poll_timeout_secs: Option<u64>,

    /// Files or http(s) URLs; several inputs are uploaded as one batch
    #[arg(required = true)]
    inputs: Vec<String>,
}

impl Cli {
    fn load_config(&self) -> Result<UploadConfig> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => config::config_path()?,
        };
        let mut config = config::load_config_from(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        if let Some(key) = &self.public_key {
            config.public_key = key.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.upload_base_url = base_url.clone();
        }
        if let Some(interval) = self.poll_interval_ms {
            config.poll_interval_ms = interval;
        }
        if self.max_poll_attempts.is_some() {
            config.max_poll_attempts = self.max_poll_attempts;
        }
        if self.poll_timeout_secs.is_some() {
            config.poll_timeout_secs = self.poll_timeout_secs;
        }

        validate_config(&config).context("Invalid configuration")?;
        Ok(config)
    }

    fn target(&self) -> UploadTarget {
        match self.inputs.as_slice() {
            [single] => UploadTarget::from_arg(single),
            many => UploadTarget::Sequence(many.iter().map(|a| UploadTarget::from_arg(a)).collect()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // Initialize logging
    env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .parse_default_env()
        .init();

    log::debug!("Uploading to {}", config.upload_base_url);

    let client = UploadClient::new(config).context("Failed to create upload client")?;
    let uploaded = match client.upload(cli.target()).await {
        Ok(uploaded) => uploaded,
        Err(e) => {
            let hint = if e.is_retryable() {
                " (temporary, try again)"
            } else {
                ""
            };
            anyhow::bail!("Upload failed{}: {}", hint, e);
        }
    };

    for file in uploaded.into_vec() {
        println!("{}", file);
    }

    Ok(())
}
