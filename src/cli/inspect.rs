//! Inspect command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;

use super::utils::load_document;
use crate::config::Settings;
use crate::digest::render_tree;
use crate::session::{LoadOutcome, Session};

#[derive(Args)]
pub struct InspectArgs {
    /// Server digest filename
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Inspect a local digest file instead of a server one
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print the file listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    filename: &'a str,
    files_listed: usize,
    file_bodies: usize,
    file_paths: &'a [String],
}

pub async fn run(args: InspectArgs, settings: &Settings) -> Result<()> {
    let mut session = Session::new();
    let outcome =
        load_document(&mut session, settings, args.name.as_deref(), args.file.as_deref()).await?;

    let doc = session.document().expect("load succeeded");

    if outcome == LoadOutcome::Unrecognized {
        println!(
            "{} ({} bytes of unstructured text)",
            doc.source().filename(),
            doc.raw().len()
        );
        return Ok(());
    }

    let parsed = doc.parsed().expect("parsed outcome");

    if args.json {
        let report = InspectReport {
            filename: doc.source().filename(),
            files_listed: parsed.file_paths.len(),
            file_bodies: parsed.file_contents.len(),
            file_paths: &parsed.file_paths,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Digest: {}", style(doc.source().filename()).cyan());
    println!("Files listed: {}", parsed.file_paths.len());
    // The listing and the file bodies come from independent sections and can
    // legitimately disagree; show both numbers instead of reconciling.
    if parsed.file_contents.len() != parsed.file_paths.len() {
        println!("File bodies: {}", parsed.file_contents.len());
    }

    let tree = render_tree(&parsed.file_paths);
    if !tree.is_empty() {
        println!("\n{tree}");
    }

    Ok(())
}
