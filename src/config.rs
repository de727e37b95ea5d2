// Run configuration. Parsed once in `main` and then only borrowed, so every
// component sees the same endpoint, credential, collection and root folder.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://demo.borealisdata.ca";
pub const DEFAULT_DATAVERSE: &str = "root";
pub const DEFAULT_DELAY_SECS: u64 = 2;

/// Bulk-upload dataset folders into a Dataverse collection
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Args {
    /// API token used for every request
    #[arg(short = 't', long, env = "DATAVERSE_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Base URL of the Dataverse installation
    #[arg(short = 'u', long, env = "DATAVERSE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Alias of the dataverse new datasets are created in
    #[arg(short = 'd', long, env = "DATAVERSE_ALIAS", default_value = DEFAULT_DATAVERSE)]
    pub dataverse: String,

    /// Folder holding one subfolder per dataset
    #[arg(short = 'f', long, env = "DATASETS_FOLDER")]
    pub datasets_folder: PathBuf,

    /// Seconds to wait between two dataset folders
    #[arg(long, env = "BULKLOAD_DELAY_SECS", default_value_t = DEFAULT_DELAY_SECS)]
    pub delay_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub base_url: String,
    pub dataverse: String,
    pub datasets_folder: PathBuf,
    pub delay: Duration,
}

impl Config {
    /// Validate parsed arguments. A missing token or a root folder that is
    /// not an existing directory aborts the whole run.
    pub fn from_args(args: Args) -> Result<Self> {
        let api_token = match args.api_token {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => bail!("No API token given: set DATAVERSE_API_TOKEN or pass --api-token"),
        };

        let datasets_folder = expand_home(&args.datasets_folder);
        let meta = std::fs::metadata(&datasets_folder).with_context(|| {
            format!("Datasets folder {} does not exist", datasets_folder.display())
        })?;
        if !meta.is_dir() {
            bail!("Datasets folder {} is not a directory", datasets_folder.display());
        }

        Ok(Config {
            api_token,
            base_url: args.base_url.trim_end_matches('/').to_string(),
            dataverse: args.dataverse,
            datasets_folder,
            delay: Duration::from_secs(args.delay_secs),
        })
    }
}

/// Replace a leading `~` with the user's home directory.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
