//! Repository reference resolution.
//!
//! Turns the many ways people write a GitHub repository reference into one
//! canonical [`RepositoryIdentifier`]:
//!
//! ```text
//! https://github.com/owner/repo
//! https://www.github.com/owner/repo.git
//! https://github.com/owner/repo?tab=readme-ov-file
//! https://github.com/owner/repo/blob/main/docs/guide.md
//! git@github.com:owner/repo.git
//! ssh://git@github.com/owner/repo.git
//! github.com/owner/repo
//! ```
//!
//! Resolution is purely syntactic: no network access, no panics, and either
//! a complete identifier or a [`ResolutionFailure`].

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ResolutionFailure;

/// Hosts accepted by [`resolve`], compared after lowercasing and `www.` removal.
pub const GIT_HOSTS: &[&str] = &["github.com"];

/// What the path of an identifier points at, taken from the URL keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// `/blob/<ref>/<path>`: a single file.
    Blob,
    /// `/tree/<ref>/<path>`: a directory.
    Tree,
}

impl PathKind {
    fn from_keyword(segment: &str) -> Option<Self> {
        match segment {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            _ => None,
        }
    }
}

/// Canonical `{owner, repo, ref?, path?}` form of a repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIdentifier {
    /// Account or organisation; never empty.
    pub owner: String,
    /// Repository name without `.git`; never empty.
    pub repo: String,
    /// Branch or tag. `None` means the host's default branch.
    pub git_ref: Option<String>,
    /// Path inside the repository. `None` means the root README.
    pub path: Option<String>,
    /// Whether `path` names a file or a directory. Set whenever `git_ref` is.
    pub path_kind: Option<PathKind>,
}

impl RepositoryIdentifier {
    /// `owner/repo`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Browser URL of the repository root.
    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepositoryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)?;
        if let Some(ref git_ref) = self.git_ref {
            write!(f, "@{git_ref}")?;
        }
        if let Some(ref path) = self.path {
            write!(f, "/{path}")?;
        }
        Ok(())
    }
}

/// Resolve a repository reference.
///
/// # Errors
///
/// Returns a [`ResolutionFailure`] for empty input, an unknown or missing
/// host, fewer than two path segments, a `blob`/`tree` keyword without a
/// ref, or owner/repo names with characters a Git host never allows.
///
/// # Examples
///
/// ```
/// use meridian_search::repository::resolve;
///
/// let id = resolve("https://github.com/imsyy/SPlayer/blob/dev/README.md").unwrap();
/// assert_eq!(id.owner, "imsyy");
/// assert_eq!(id.repo, "SPlayer");
/// assert_eq!(id.git_ref.as_deref(), Some("dev"));
/// assert_eq!(id.path.as_deref(), Some("README.md"));
///
/// assert!(resolve("invalid-url").is_err());
/// ```
pub fn resolve(raw: &str) -> Result<RepositoryIdentifier, ResolutionFailure> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(ResolutionFailure::Empty);
    }

    // Query strings and fragments never carry path information.
    let input = input.split(['?', '#']).next().unwrap_or_default();

    // Checked before URL parsing, which would silently collapse `..`.
    if let Some(segment) = input.split(['/', '\\']).find(|s| is_dot_segment(s)) {
        return Err(ResolutionFailure::InvalidSegment(segment.to_owned()));
    }

    let (host, path) = split_host_and_path(input);
    if host.is_empty() || !GIT_HOSTS.contains(&host.as_str()) {
        return Err(ResolutionFailure::UnsupportedHost(host));
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let [owner, repo, rest @ ..] = segments.as_slice() else {
        return Err(ResolutionFailure::MissingSegments);
    };

    let owner: &str = owner;
    let repo: &str = repo;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    for segment in [owner, repo] {
        if !is_valid_segment(segment) {
            return Err(ResolutionFailure::InvalidSegment(segment.to_owned()));
        }
    }

    let (git_ref, path, path_kind) = match rest {
        [keyword, tail @ ..] => match PathKind::from_keyword(keyword) {
            Some(kind) => {
                let [git_ref, path @ ..] = tail else {
                    return Err(ResolutionFailure::MissingRef((*keyword).to_owned()));
                };
                if let Some(bad) = tail.iter().find(|s| has_encoded_separator(s)) {
                    return Err(ResolutionFailure::InvalidSegment((*bad).to_owned()));
                }
                let path = (!path.is_empty()).then(|| path.join("/"));
                (Some((*git_ref).to_owned()), path, Some(kind))
            }
            None => (None, None, None),
        },
        [] => (None, None, None),
    };

    Ok(RepositoryIdentifier {
        owner: owner.to_owned(),
        repo: repo.to_owned(),
        git_ref,
        path,
        path_kind,
    })
}

/// Split into a normalised host and the remaining path.
///
/// Inputs with a scheme, and bare `host/path` inputs, go through
/// [`Url`], which drops userinfo and port. Only the scp-like
/// `user@host:path` form is split by hand. The host is lowercased with
/// `www.` removed and never contains userinfo.
fn split_host_and_path(input: &str) -> (String, String) {
    let (host, path) = if input.contains("://") {
        from_url(input)
    } else {
        let authority = input.split('/').next().unwrap_or_default();
        match authority.split_once(':') {
            // `git@host:owner/repo`: the colon separates host from path.
            Some((user_host, _)) => {
                let host = user_host.rsplit_once('@').map_or(user_host, |(_, h)| h);
                let path = &input[user_host.len() + 1..];
                (host.to_owned(), path.to_owned())
            }
            None => from_url(&format!("https://{input}")),
        }
    };

    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").map(str::to_owned).unwrap_or(host);
    (host, path)
}

fn from_url(input: &str) -> (String, String) {
    match Url::parse(input) {
        Ok(url) => (url.host_str().unwrap_or_default().to_owned(), url.path().to_owned()),
        Err(_) => (String::new(), String::new()),
    }
}

/// `.` or `..`, including percent-encoded forms such as `%2e%2E`.
pub(crate) fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// A backslash, or a percent-encoded `/` or `\`, inside one segment.
fn has_encoded_separator(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    lower.contains('\\') || lower.contains("%2f") || lower.contains("%5c")
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !is_dot_segment(segment)
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
