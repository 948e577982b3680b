//! Delete command implementation

use anyhow::Result;
use clap::Args;

use super::utils;
use crate::config::Settings;
use crate::remote::DigestStore;

#[derive(Args)]
pub struct DeleteArgs {
    /// Filename of the stored digest to delete
    #[arg(value_name = "NAME")]
    pub name: String,
}

pub async fn run(args: DeleteArgs, settings: &Settings) -> Result<()> {
    let client = utils::client(settings);
    client.delete_digest(&args.name).await?;
    println!("Deleted {}", args.name);
    Ok(())
}
