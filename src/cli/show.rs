//! Show command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::utils::load_document;
use crate::config::Settings;
use crate::session::Session;
use crate::utils::normalize_path;

#[derive(Args)]
pub struct ShowArgs {
    /// Server digest filename
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Read a local digest file instead of a server one
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Path of the file inside the digest to print
    #[arg(short, long, value_name = "PATH")]
    pub path: String,
}

pub async fn run(args: ShowArgs, settings: &Settings) -> Result<()> {
    let mut session = Session::new();
    load_document(&mut session, settings, args.name.as_deref(), args.file.as_deref()).await?;

    let wanted = normalize_path(&args.path);
    let doc = session.document_mut().expect("load succeeded");
    if !doc.select_for_viewing(&wanted) {
        anyhow::bail!("No file named {} in this digest", wanted);
    }

    // Content is verbatim from the digest; normalize only the very end so
    // the shell prompt lands on its own line.
    let content = doc.viewed_content().expect("viewing succeeded");
    if content.ends_with('\n') {
        print!("{content}");
    } else {
        println!("{content}");
    }

    Ok(())
}
