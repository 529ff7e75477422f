//! Parsing of pull request references given on the command line

use crate::error::{Error, Result};
use crate::types::{PullRequestRef, RepoRef};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SHORT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<owner>[A-Za-z0-9_.-]+)/(?P<repo>[A-Za-z0-9_.-]+)#(?P<number>\d+)$")
        .expect("valid regex")
});

/// Parse `owner/repo#N` or a PR web URL (`https://<host>/<owner>/<repo>/pull/<N>`).
///
/// `default_host` is used for the short form; `github.com` is normalised to
/// `None`.
pub fn parse_pr_reference(input: &str, default_host: Option<&str>) -> Result<PullRequestRef> {
    let input = input.trim();

    if let Some(caps) = SHORT_REF.captures(input) {
        let number = parse_number(&caps["number"], input)?;
        return Ok(PullRequestRef {
            repo: RepoRef {
                owner: caps["owner"].to_string(),
                repo: caps["repo"].to_string(),
                host: default_host.and_then(normalize_host),
            },
            number,
        });
    }

    let url = Url::parse(input).map_err(|_| invalid(input))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(input));
    }
    let host = url.host_str().ok_or_else(|| invalid(input))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    // owner / repo / "pull" / number [/ files | commits ...]
    match segments.as_slice() {
        [owner, repo, "pull", number, ..] => Ok(PullRequestRef {
            repo: RepoRef {
                owner: (*owner).to_string(),
                repo: repo.trim_end_matches(".git").to_string(),
                host: normalize_host(host),
            },
            number: parse_number(number, input)?,
        }),
        _ => Err(invalid(input)),
    }
}

fn normalize_host(host: &str) -> Option<String> {
    let host = host.to_ascii_lowercase();
    (host != "github.com" && host != "www.github.com").then_some(host)
}

fn parse_number(raw: &str, input: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid(input)),
    }
}

fn invalid(input: &str) -> Error {
    Error::InvalidReference(format!(
        "'{input}' (expected a PR URL or owner/repo#number)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_pr_url() {
        let pr = parse_pr_reference("https://github.com/acme/widgets/pull/42", None).unwrap();
        assert_eq!(pr.repo.owner, "acme");
        assert_eq!(pr.repo.repo, "widgets");
        assert_eq!(pr.repo.host, None);
        assert_eq!(pr.number, 42);
    }

    #[test]
    fn test_pr_url_with_tab_suffix() {
        let pr =
            parse_pr_reference("https://github.com/acme/widgets/pull/42/files", None).unwrap();
        assert_eq!(pr.number, 42);
    }

    #[test]
    fn test_enterprise_pr_url() {
        let pr = parse_pr_reference("https://GitHub.Example.com/team/svc/pull/7", None).unwrap();
        assert_eq!(pr.repo.host.as_deref(), Some("github.example.com"));
        assert_eq!(pr.repo.owner, "team");
        assert_eq!(pr.number, 7);
    }

    #[test]
    fn test_short_reference() {
        let pr = parse_pr_reference("acme/widgets#42", None).unwrap();
        assert_eq!(pr.repo.owner, "acme");
        assert_eq!(pr.repo.repo, "widgets");
        assert_eq!(pr.number, 42);
        assert_eq!(pr.repo.host, None);
    }

    #[test]
    fn test_short_reference_uses_default_host() {
        let pr = parse_pr_reference("acme/widgets#42", Some("github.example.com")).unwrap();
        assert_eq!(pr.repo.host.as_deref(), Some("github.example.com"));

        let pr = parse_pr_reference("acme/widgets#42", Some("github.com")).unwrap();
        assert_eq!(pr.repo.host, None);
    }

    #[test]
    fn test_rejects_non_pr_urls() {
        for input in [
            "https://github.com/acme/widgets",
            "https://github.com/acme/widgets/issues/4",
            "https://github.com/acme/widgets/pull/abc",
            "https://github.com/acme/widgets/pull/0",
            "ftp://github.com/acme/widgets/pull/4",
            "acme/widgets",
            "widgets#4",
            "",
        ] {
            assert!(
                matches!(
                    parse_pr_reference(input, None),
                    Err(Error::InvalidReference(_))
                ),
                "expected rejection for {input:?}"
            );
        }
    }
}
