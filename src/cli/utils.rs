//! Shared CLI utilities.

use std::path::Path;

use anyhow::Result;
use console::style;

use crate::config::Settings;
use crate::remote::ApiClient;
use crate::session::{LoadOutcome, Session};

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}

pub fn client(settings: &Settings) -> ApiClient {
    ApiClient::new(settings.server_url.clone(), settings.api_token.clone())
}

/// Load a digest into `session` from either a server filename or a local
/// file. Exactly one of the two must be given.
pub async fn load_document(
    session: &mut Session,
    settings: &Settings,
    name: Option<&str>,
    file: Option<&Path>,
) -> Result<LoadOutcome> {
    let outcome = match (name, file) {
        (Some(_), Some(_)) => {
            anyhow::bail!("Cannot specify both a digest name and --file")
        }
        (None, None) => {
            anyhow::bail!("Either a digest name or --file must be specified")
        }
        (Some(name), None) => {
            let store = client(settings);
            session.load_from_server(&store, name).await?
        }
        (None, Some(path)) => session.load_from_local(path).await?,
    };

    if outcome == LoadOutcome::Unrecognized {
        eprintln!(
            "{}",
            style("Attached, but not recognized as a structured digest; file tree and selection are unavailable.")
                .yellow()
        );
    }

    Ok(outcome)
}
