// Entrypoint for the bulk uploader.
// - Keeps `main` small: build the configuration and API client, then run
//   the batch. Only startup problems make it return an error.

use clap::Parser;
use dataverse_bulkload::{
    api::ApiClient,
    batch::Uploader,
    config::{Args, Config},
    ui,
};
use env_logger::Env;

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default());

    let config = Config::from_args(Args::parse())?;
    println!(
        "Uploading datasets from {} to {} (dataverse '{}')",
        config.datasets_folder.display(),
        config.base_url,
        config.dataverse
    );

    let api = ApiClient::new(&config)?;
    let report = Uploader::new(&config, api).run()?;
    ui::summary(&report);
    Ok(())
}
