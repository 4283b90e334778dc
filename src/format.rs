//! Terminal rendering for search results and resolved repositories.

use std::fmt::Write as _;

use meridian_search::{NormalizedResult, RepositoryIdentifier};
use meridian_search::repository::PathKind;

use crate::error::{MeridianError, Result};

/// Render results as a numbered markdown list.
pub fn results_markdown(query: &str, results: &[NormalizedResult]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\".\n");
    }

    let mut output = format!("## Search Results for \"{query}\"\n\n");
    for (i, result) in results.iter().enumerate() {
        let _ = write!(
            output,
            "{}. **{}**\n   URL: {}\n   Source: {} via {}\n",
            i + 1,
            result.title,
            result.url,
            result.source,
            result.engine,
        );
        if !result.description.is_empty() {
            let _ = writeln!(output, "   {}", result.description);
        }
        output.push('\n');
    }
    output
}

/// Render results as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`MeridianError::Config`] if serialization fails.
pub fn results_json(results: &[NormalizedResult]) -> Result<String> {
    serde_json::to_string_pretty(results).map_err(|e| MeridianError::Config(e.to_string()))
}

/// Render a resolved repository as aligned `key: value` lines.
pub fn identifier(id: &RepositoryIdentifier) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "owner: {}", id.owner);
    let _ = writeln!(output, "repo:  {}", id.repo);
    if let Some(git_ref) = &id.git_ref {
        let _ = writeln!(output, "ref:   {git_ref}");
    }
    if let Some(path) = &id.path {
        let kind = match id.path_kind {
            Some(PathKind::Blob) => " (file)",
            Some(PathKind::Tree) => " (directory)",
            None => "",
        };
        let _ = writeln!(output, "path:  {path}{kind}");
    }
    let _ = writeln!(output, "url:   {}", id.html_url());
    output
}
