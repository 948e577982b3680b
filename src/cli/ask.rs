//! Ask command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, MultiSelect};
use similar::{ChangeTag, TextDiff};

use super::utils::{self, parse_csv};
use crate::config::Settings;
use crate::remote::{available_models, estimate_cost, ChatBackend, ChatReply};
use crate::session::{compose, first_code_block, ComposeError, Session};
use crate::utils::{format_with_commas, normalize_path};

#[derive(Args)]
pub struct AskArgs {
    /// Server digest filename to ask about
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Use a local digest file instead of a server one
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// The question to ask; a review instruction is generated when omitted
    #[arg(short, long, value_name = "TEXT")]
    pub message: Option<String>,

    /// Attach only these digest paths to the prompt (comma-separated)
    #[arg(long, value_name = "PATHS")]
    pub files: Option<String>,

    /// Pick the attached files interactively
    #[arg(long)]
    pub interactive: bool,

    /// Model identifier (defaults to the settings file's model)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Compare this digest path against the first code block of the reply
    #[arg(long, value_name = "PATH")]
    pub diff: Option<String>,

    /// List selectable models and exit
    #[arg(long)]
    pub models: bool,
}

pub async fn run(args: AskArgs, settings: &Settings) -> Result<()> {
    if args.models {
        print_models(settings);
        return Ok(());
    }

    let mut session = Session::new();
    let attached = args.name.is_some() || args.file.is_some();
    if attached {
        utils::load_document(&mut session, settings, args.name.as_deref(), args.file.as_deref())
            .await?;
    }

    if let Some(wanted) = parse_csv(&args.files) {
        restrict_selection(&mut session, &wanted)?;
    } else if args.interactive {
        pick_selection(&mut session)?;
    }

    let typed = args.message.as_deref().unwrap_or("");
    let payload = match compose(session.document(), typed) {
        Ok(payload) => payload,
        Err(err @ ComposeError::NothingToSend) => anyhow::bail!("{err}"),
    };

    let model = args.model.as_deref().unwrap_or(&settings.model);
    let client = utils::client(settings);
    let reply = client
        .converse(&[], &payload, model)
        .await
        .context("Chat request failed")?;

    println!("{}", reply.text.trim_end());
    print_usage(&reply);

    if let Some(path) = &args.diff {
        print_comparison(&mut session, path, &reply)?;
    }

    Ok(())
}

fn print_models(settings: &Settings) {
    for model in available_models() {
        let marker = if model.id == settings.model { "*" } else { " " };
        println!(
            "{marker} {}  {}  (${}/M in, ${}/M out)",
            style(model.id).cyan(),
            model.label,
            model.input_per_mtok,
            model.output_per_mtok
        );
    }
}

/// Replace the default all-files selection with exactly the requested paths.
fn restrict_selection(session: &mut Session, wanted: &[String]) -> Result<()> {
    let Some(doc) = session.document_mut() else {
        anyhow::bail!("--files requires a digest; pass a name or --file")
    };

    doc.deselect_all_prompt_files();
    for path in wanted {
        let path = normalize_path(path);
        if doc.file_paths().iter().any(|p| *p == path) {
            doc.toggle_prompt_selection(&path);
        } else {
            eprintln!("{}", style(format!("Skipping unknown file: {path}")).yellow());
        }
    }
    Ok(())
}

fn pick_selection(session: &mut Session) -> Result<()> {
    let Some(doc) = session.document_mut() else {
        anyhow::bail!("--interactive requires a digest; pass a name or --file")
    };
    if doc.file_paths().is_empty() {
        return Ok(());
    }

    let paths: Vec<String> = doc.file_paths().to_vec();
    let defaults: Vec<bool> = paths.iter().map(|p| doc.is_selected(p)).collect();

    let picked = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Files to attach to the prompt")
        .items(&paths)
        .defaults(&defaults)
        .interact()?;

    doc.deselect_all_prompt_files();
    for idx in picked {
        doc.toggle_prompt_selection(&paths[idx]);
    }
    Ok(())
}

fn print_usage(reply: &ChatReply) {
    let cost = reply
        .cost_usd
        .or_else(|| estimate_cost(&reply.model, &reply.usage))
        .map(|c| format!("${c:.4}"))
        .unwrap_or_else(|| "cost unknown".to_string());
    eprintln!(
        "{}",
        style(format!(
            "[{} | {} in / {} out tokens | {}]",
            reply.model,
            format_with_commas(reply.usage.input_tokens),
            format_with_commas(reply.usage.output_tokens),
            cost
        ))
        .dim()
    );
}

fn print_comparison(session: &mut Session, path: &str, reply: &ChatReply) -> Result<()> {
    let Some(suggested) = first_code_block(&reply.text) else {
        eprintln!("{}", style("The reply contained no code block to compare.").yellow());
        return Ok(());
    };

    let path = normalize_path(path);
    let view = session.start_comparison(&path, suggested)?;

    println!("\n{}", style(format!("--- {} (digest)", view.file_path)).bold());
    println!("{}", style(format!("+++ {} (suggested)", view.file_path)).bold());
    let diff = TextDiff::from_lines(&view.original, &view.suggested);
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => print!("{}", style(format!("-{change}")).red()),
            ChangeTag::Insert => print!("{}", style(format!("+{change}")).green()),
            ChangeTag::Equal => print!(" {change}"),
        }
    }

    Ok(())
}
