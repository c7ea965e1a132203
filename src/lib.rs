//! # Simple Server
//!
//! `simpleserver` serves a small product catalog behind a login wall.
//!
//! ## Authentication and Sessions
//!
//! Users sign up with `POST /signin` and authenticate with `POST /login`, which
//! returns a signed JSON web token. Every catalog request must carry that token
//! base64-encoded in an `Authorization: Basic ...` header.
//!
//! A token is accepted only when it is both:
//!
//! - **Live:** present in the in-process session registry (minted by this process
//!   and not yet dropped), and
//! - **Valid:** its HS256 signature verifies and it has not expired.
//!
//! Any failed validation removes the token from the registry ("fail-closed and
//! forget"), so a token that failed once never validates again.
//!
//! > **Note:** Sessions live in memory only. Restarting the process logs every
//! > client out.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
