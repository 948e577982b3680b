//! Generate command implementation

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::utils::{self, parse_csv};
use crate::config::Settings;
use crate::remote::{DigestStore, GenerateRequest};

#[derive(Args)]
pub struct GenerateArgs {
    /// Repository URL to package, e.g. https://github.com/owner/repo
    #[arg(value_name = "REPO_URL")]
    pub repo_url: String,

    /// Include only paths matching these globs (comma-separated)
    #[arg(short = 'i', long, value_name = "GLOBS")]
    pub include: Option<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude: Option<String>,
}

pub async fn run(args: GenerateArgs, settings: &Settings) -> Result<()> {
    let request = GenerateRequest {
        repo_url: args.repo_url.clone(),
        include_globs: parse_csv(&args.include).unwrap_or_else(|| settings.include_globs.clone()),
        exclude_globs: parse_csv(&args.exclude).unwrap_or_else(|| settings.exclude_globs.clone()),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!("Packaging {}", args.repo_url));

    let client = utils::client(settings);
    let result = client.generate_digest(&request).await;
    spinner.finish_and_clear();

    let entry = result?;
    println!(
        "Generated {} from {}",
        style(&entry.filename).cyan(),
        entry.repo
    );
    println!("Inspect it with `repolens inspect {}`", entry.filename);

    Ok(())
}
