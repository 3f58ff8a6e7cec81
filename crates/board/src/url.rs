//! Board URL resolution.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::{BoardDescriptor, BoardError, BoardNumber, OwnerKind};

static BOARD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(orgs|users)/([^/]+)/projects/([0-9]+)").expect("board URL pattern is valid")
});

/// Parses a board URL such as `https://github.com/orgs/acme/projects/7`.
///
/// The pattern may appear anywhere in the input, so trailing path segments
/// (`/views/1`) and query strings are ignored. Fails with
/// [`BoardError::InvalidUrl`] when the pattern is absent or the number does
/// not fit in a `u64`.
pub fn parse_board_url(url: &str) -> Result<BoardDescriptor, BoardError> {
    let invalid = || {
        warn!(url, "not a project board URL");
        BoardError::InvalidUrl {
            url: url.to_string(),
        }
    };

    let captures = BOARD_URL.captures(url).ok_or_else(invalid)?;

    let owner_kind = match &captures[1] {
        "orgs" => OwnerKind::Organization,
        _ => OwnerKind::User,
    };
    let number: u64 = captures[3].parse().map_err(|_| invalid())?;

    Ok(BoardDescriptor {
        owner: captures[2].to_string(),
        number: BoardNumber::new(number),
        owner_kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_url_resolves() {
        let board = parse_board_url("https://github.com/orgs/acme/projects/7").unwrap();
        assert_eq!(board.owner, "acme");
        assert_eq!(board.number, BoardNumber::new(7));
        assert!(board.owner_is_organization());
    }

    #[test]
    fn user_url_resolves() {
        let board = parse_board_url("https://github.com/users/octocat/projects/12").unwrap();
        assert_eq!(board.owner, "octocat");
        assert_eq!(board.number.as_u64(), 12);
        assert_eq!(board.owner_kind, OwnerKind::User);
    }

    #[test]
    fn trailing_view_segments_are_ignored() {
        let board =
            parse_board_url("https://github.com/orgs/acme/projects/7/views/2?layout=board").unwrap();
        assert_eq!(board.number.as_u64(), 7);
    }

    #[test]
    fn pattern_matches_without_scheme_or_host() {
        let board = parse_board_url("/users/me/projects/1").unwrap();
        assert_eq!(board.owner, "me");
    }

    #[test]
    fn rejects_urls_that_do_not_name_a_board() {
        for url in [
            "https://github.com/orgs/acme/projects/",
            "https://github.com/orgs/acme/projects/seven",
            "https://github.com/teams/acme/projects/7",
            "https://github.com/acme/repo/projects/7",
            "https://github.com/orgs//projects/7",
            "not a url",
            "",
        ] {
            assert!(
                matches!(parse_board_url(url), Err(BoardError::InvalidUrl { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_numbers_that_overflow() {
        let url = "https://github.com/orgs/acme/projects/99999999999999999999999";
        assert!(matches!(
            parse_board_url(url),
            Err(BoardError::InvalidUrl { .. })
        ));
    }
}
