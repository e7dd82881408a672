//! Remote reference classification
//!
//! A reference is a user-supplied string naming a remote configuration or
//! template. Four lexical forms are recognized:
//!
//! ```text
//! https://host/path/to/config.yaml                      direct HTTP(S)
//! github:owner/repo/path/to/config.yaml[@ref]           shorthand
//! git+https://host/owner/repo.git/path/config.yaml[@ref] explicit HTTPS git
//! git+git@host:owner/repo.git/path/config.yaml[@ref]     explicit SSH git
//! ```
//!
//! Anything else is not a remote reference and is treated by callers as a
//! local path.

/// Ref used when a git reference carries no `@ref` suffix.
pub const DEFAULT_REF: &str = "main";

/// Host the shorthand form expands to.
const SHORTHAND_HOST: &str = "github.com";

const SHORTHAND_PREFIX: &str = "github:";
const GIT_PREFIX: &str = "git+";

/// Reference forms shown to users when classification fails.
pub const SUPPORTED_FORMS: &[&str] = &[
    "https://host/path/to/config.yaml",
    "github:owner/repo/path/to/config.yaml[@ref]",
    "git+https://host/owner/repo.git/path/to/config.yaml[@ref]",
    "git+git@host:owner/repo.git/path/to/config.yaml[@ref]",
];

/// Errors produced while classifying a reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("Reference must not be empty")]
    Empty,

    #[error("Invalid reference '{raw}': expected github:owner/repo/path[@ref]")]
    InvalidShorthand { raw: String },

    #[error("Invalid reference '{raw}': expected a repository URL ending in '.git' followed by a file path")]
    MissingRepository { raw: String },

    #[error("Invalid reference '{raw}': no file path after the repository")]
    MissingFilePath { raw: String },

    #[error("Invalid reference '{raw}': empty ref after '@'")]
    EmptyRef { raw: String },

    #[error("'{raw}' is not a remote reference")]
    NotRemote { raw: String },
}

/// Lexical family of a remote reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `http://` or `https://`, fetched as-is
    Http,
    /// `github:owner/repo/path[@ref]`
    GitShorthand,
    /// `git+<url>` or `git+user@host:…`
    GitExplicit,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::GitShorthand => "git-shorthand",
            Self::GitExplicit => "git-explicit",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a git-hosted file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitLocation {
    candidates: Vec<String>,
    file_path: String,
    git_ref: String,
}

impl GitLocation {
    /// Repository URLs to try, in order. Never empty.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Path of the file inside the repository
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Branch or tag to read from
    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }
}

/// How a remote reference is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Http { url: String },
    Git(GitLocation),
}

/// A classified remote reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReference {
    raw: String,
    scheme: Scheme,
    location: Location,
}

impl RemoteReference {
    /// Classify `raw`, failing if it is not a remote reference.
    pub fn parse(raw: &str) -> Result<Self, ClassifyError> {
        classify(raw)?.ok_or_else(|| ClassifyError::NotRemote {
            raw: raw.trim().to_string(),
        })
    }

    /// The reference as written by the user (trimmed)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Repository URLs to try; empty for HTTP references.
    pub fn candidate_urls(&self) -> &[String] {
        match &self.location {
            Location::Http { .. } => &[],
            Location::Git(git) => git.candidates(),
        }
    }

    /// Path within the repository; empty for HTTP references.
    pub fn file_path(&self) -> &str {
        match &self.location {
            Location::Http { .. } => "",
            Location::Git(git) => git.file_path(),
        }
    }

    /// Branch or tag for git references.
    pub fn git_ref(&self) -> Option<&str> {
        match &self.location {
            Location::Http { .. } => None,
            Location::Git(git) => Some(git.git_ref()),
        }
    }

    /// Path-like name used for format detection: the URL for HTTP, the
    /// in-repository file path for git (so an `@ref` suffix does not hide
    /// the extension).
    pub fn source_hint(&self) -> &str {
        match &self.location {
            Location::Http { url } => url,
            Location::Git(git) => git.file_path(),
        }
    }
}

impl std::fmt::Display for RemoteReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Whether `raw` uses one of the remote reference prefixes.
pub fn is_remote(raw: &str) -> bool {
    let raw = raw.trim();
    raw.starts_with("http://")
        || raw.starts_with("https://")
        || raw.starts_with(SHORTHAND_PREFIX)
        || raw.starts_with(GIT_PREFIX)
}

/// Classify a raw reference string.
///
/// Returns `Ok(None)` when `raw` is not a remote reference (callers treat it
/// as a local path) and an error when it uses a remote prefix but is
/// malformed. No network access happens here; a ref that does not exist is
/// only discovered by the transport.
pub fn classify(raw: &str) -> Result<Option<RemoteReference>, ClassifyError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClassifyError::Empty);
    }

    let reference = if raw.starts_with("http://") || raw.starts_with("https://") {
        RemoteReference {
            raw: raw.to_string(),
            scheme: Scheme::Http,
            location: Location::Http {
                url: raw.to_string(),
            },
        }
    } else if let Some(body) = raw.strip_prefix(SHORTHAND_PREFIX) {
        RemoteReference {
            raw: raw.to_string(),
            scheme: Scheme::GitShorthand,
            location: Location::Git(parse_shorthand(raw, body)?),
        }
    } else if let Some(body) = raw.strip_prefix(GIT_PREFIX) {
        RemoteReference {
            raw: raw.to_string(),
            scheme: Scheme::GitExplicit,
            location: Location::Git(parse_explicit(raw, body)?),
        }
    } else {
        return Ok(None);
    };

    Ok(Some(reference))
}

/// Split an optional `@ref` suffix off `target`.
fn split_ref<'a>(raw: &str, target: &'a str) -> Result<(&'a str, String), ClassifyError> {
    match target.rsplit_once('@') {
        Some((_, "")) => Err(ClassifyError::EmptyRef {
            raw: raw.to_string(),
        }),
        Some((rest, git_ref)) => Ok((rest, git_ref.to_string())),
        None => Ok((target, DEFAULT_REF.to_string())),
    }
}

/// `owner/repo/path[@ref]` → SSH then HTTPS candidates.
fn parse_shorthand(raw: &str, body: &str) -> Result<GitLocation, ClassifyError> {
    let (path, git_ref) = split_ref(raw, body)?;

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 3 {
        return Err(ClassifyError::InvalidShorthand {
            raw: raw.to_string(),
        });
    }

    let owner = segments[0];
    let repo = segments[1].trim_end_matches(".git");
    let file_path = segments[2..].join("/");

    Ok(GitLocation {
        candidates: vec![
            format!("git@{SHORTHAND_HOST}:{owner}/{repo}.git"),
            format!("https://{SHORTHAND_HOST}/{owner}/{repo}.git"),
        ],
        file_path,
        git_ref,
    })
}

/// `git+…` forms: split the repository URL from the file path at the first
/// path segment ending in `.git`.
fn parse_explicit(raw: &str, body: &str) -> Result<GitLocation, ClassifyError> {
    let (repo_url, rest) = if let Some((scheme, after_scheme)) = body.split_once("://") {
        split_url_repo(scheme, after_scheme).ok_or_else(|| ClassifyError::MissingRepository {
            raw: raw.to_string(),
        })?
    } else {
        // scp-like SSH: user@host:owner/repo.git/path
        let Some(idx) = body.find(".git/") else {
            let repo_only = body
                .rsplit_once('@')
                .map(|(head, _)| head)
                .filter(|head| head.ends_with(".git"))
                .unwrap_or(body);
            return Err(if repo_only.ends_with(".git") {
                ClassifyError::MissingFilePath {
                    raw: raw.to_string(),
                }
            } else {
                ClassifyError::MissingRepository {
                    raw: raw.to_string(),
                }
            });
        };
        (body[..idx + 4].to_string(), &body[idx + 5..])
    };

    let (file_path, git_ref) = split_ref(raw, rest)?;
    let file_path = file_path.trim_matches('/');
    if file_path.is_empty() {
        return Err(ClassifyError::MissingFilePath {
            raw: raw.to_string(),
        });
    }

    Ok(GitLocation {
        candidates: vec![repo_url],
        file_path: file_path.to_string(),
        git_ref,
    })
}

/// Scan segments after the authority for the first one ending in `.git`.
fn split_url_repo<'a>(scheme: &str, after_scheme: &'a str) -> Option<(String, &'a str)> {
    let mut offset = 0;
    for (idx, segment) in after_scheme.split('/').enumerate() {
        let end = offset + segment.len();
        if idx > 0 && segment.ends_with(".git") {
            let repo_url = format!("{scheme}://{}", &after_scheme[..end]);
            let rest = after_scheme.get(end + 1..).unwrap_or("");
            return Some((repo_url, rest));
        }
        offset = end + 1;
    }
    None
}
