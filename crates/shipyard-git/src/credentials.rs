//! Ambient credential resolution
//!
//! Credentials are never configured by shipyard. Whatever the environment
//! already provides is offered to libgit2: the SSH agent for SSH remotes,
//! the configured git credential helper for HTTPS remotes, and libgit2's
//! default (Negotiate/NTLM) mechanism otherwise.

use git2::{Config, Cred, CredentialType, RemoteCallbacks};

/// libgit2 re-invokes the callback after each rejected credential.
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Username used for SSH when the URL carries none.
const DEFAULT_SSH_USER: &str = "git";

/// Remote callbacks that answer credential requests from the environment.
pub fn ambient_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(move |url, username_from_url, allowed| {
        attempts += 1;
        tracing::debug!(%url, attempt = attempts, ?allowed, "Credential request");

        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str(
                "ambient credentials were rejected; check your SSH agent or git credential helper",
            ));
        }

        ambient_credential(url, username_from_url, allowed)
    });

    callbacks
}

fn ambient_credential(
    url: &str,
    username_from_url: Option<&str>,
    allowed: CredentialType,
) -> Result<Cred, git2::Error> {
    if allowed.contains(CredentialType::USERNAME) {
        return Cred::username(username_from_url.unwrap_or(DEFAULT_SSH_USER));
    }

    if allowed.contains(CredentialType::SSH_KEY) {
        return Cred::ssh_key_from_agent(username_from_url.unwrap_or(DEFAULT_SSH_USER));
    }

    if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
        let helper_cred = Config::open_default()
            .and_then(|config| Cred::credential_helper(&config, url, username_from_url));
        match helper_cred {
            Ok(cred) => return Ok(cred),
            Err(e) => tracing::debug!(%url, error = %e, "No credential helper answer"),
        }
    }

    if allowed.contains(CredentialType::DEFAULT) {
        return Cred::default();
    }

    Err(git2::Error::from_str(&format!(
        "no ambient credentials available for {url}"
    )))
}
