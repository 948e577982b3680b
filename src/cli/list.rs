//! List command implementation

use anyhow::Result;
use clap::Args;
use console::style;

use super::utils;
use crate::config::Settings;
use crate::remote::DigestStore;

#[derive(Args)]
pub struct ListArgs {
    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, settings: &Settings) -> Result<()> {
    let client = utils::client(settings);
    let digests = client.list_digests().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&digests)?);
        return Ok(());
    }

    if digests.is_empty() {
        println!("No digests stored yet. Run `repolens generate <repo-url>` to create one.");
        return Ok(());
    }

    for entry in &digests {
        let created = entry
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  {}",
            style(&entry.filename).cyan(),
            entry.repo,
            style(created).dim()
        );
    }
    println!("\n{} digest(s)", digests.len());

    Ok(())
}
