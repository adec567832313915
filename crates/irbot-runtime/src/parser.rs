//! Free-text command parsing.
//!
//! A command is `<action phrase> <host>`. The phrase is matched as a
//! case-insensitive prefix of the trimmed text; the rest, trimmed, is the
//! host and is kept in its original case. Host syntax is not checked.
//!
//! When configured phrases overlap (one is a prefix of another), the longest
//! matching phrase wins.

use crate::error::ParseError;
use irbot_core::ActionCatalog;
use serde::Serialize;

/// A parsed unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Canonical (lowercase) action phrase.
    pub action: String,
    /// Target host, verbatim.
    pub host: String,
}

#[derive(Debug, Clone)]
struct Phrase {
    /// Action name as the catalog knows it.
    name: String,
    /// Per-character lowercase form used for matching.
    folded: String,
}

/// Parser over the commandable action phrases.
#[derive(Debug, Clone)]
pub struct CommandParser {
    /// Longest first, ties broken alphabetically.
    phrases: Vec<Phrase>,
}

impl CommandParser {
    /// Parser for every non-internal action in the catalog.
    pub fn new(catalog: &ActionCatalog) -> Self {
        Self::from_phrases(catalog.commandable().map(|a| a.name.clone()))
    }

    pub fn from_phrases(phrases: impl IntoIterator<Item = String>) -> Self {
        let mut phrases: Vec<Phrase> = phrases
            .into_iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .map(|name| Phrase {
                folded: fold(&name),
                name,
            })
            .collect();
        phrases.sort_by(|a, b| {
            b.folded
                .len()
                .cmp(&a.folded.len())
                .then_with(|| a.name.cmp(&b.name))
        });
        phrases.dedup_by(|a, b| a.name == b.name);
        Self { phrases }
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(|p| p.name.as_str())
    }

    /// Parse command text. `None` stands for a missing or non-string payload.
    pub fn parse(&self, text: Option<&str>) -> Result<Command, ParseError> {
        let trimmed = text.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        let (phrase, end) = self
            .phrases
            .iter()
            .find_map(|p| prefix_end(trimmed, &p.folded).map(|end| (p, end)))
            .ok_or(ParseError::UnknownAction)?;

        let host = trimmed[end..].trim();
        if host.is_empty() {
            return Err(ParseError::HostRequired);
        }

        Ok(Command {
            action: phrase.name.clone(),
            host: host.to_string(),
        })
    }
}

fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Byte offset in `text` just past a prefix whose folded form equals
/// `folded`, if there is one.
fn prefix_end(text: &str, folded: &str) -> Option<usize> {
    let mut lowered = String::with_capacity(folded.len());
    for (i, c) in text.char_indices() {
        lowered.extend(c.to_lowercase());
        if !folded.starts_with(lowered.as_str()) {
            return None;
        }
        if lowered.len() == folded.len() {
            return Some(i + c.len_utf8());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use irbot_core::GatewayConfig;

    fn parser() -> CommandParser {
        CommandParser::new(&GatewayConfig::default().catalog())
    }

    fn command(action: &str, host: &str) -> Command {
        Command {
            action: action.to_string(),
            host: host.to_string(),
        }
    }

    #[test]
    fn test_every_phrase_with_host() {
        let parser = parser();
        for phrase in ["collect logs", "quarantine host", "check status", "remediation report"] {
            for host in ["db01", "10.0.0.7", "WEB-01.corp.example", "any free form id"] {
                assert_eq!(
                    parser.parse(Some(&format!("{phrase} {host}"))),
                    Ok(command(phrase, host))
                );
                assert_eq!(
                    parser.parse(Some(&format!("{} {host}", phrase.to_uppercase()))),
                    Ok(command(phrase, host))
                );
            }
        }
    }

    #[test]
    fn test_host_keeps_original_case_and_is_trimmed() {
        assert_eq!(
            parser().parse(Some("  Quarantine Host   DB01-Prod  ")),
            Ok(command("quarantine host", "DB01-Prod"))
        );
    }

    #[test]
    fn test_empty_input() {
        let parser = parser();
        assert_eq!(parser.parse(None), Err(ParseError::Empty));
        assert_eq!(parser.parse(Some("")), Err(ParseError::Empty));
        assert_eq!(parser.parse(Some(" \t\n ")), Err(ParseError::Empty));
    }

    #[test]
    fn test_missing_host() {
        assert_eq!(parser().parse(Some("collect logs")), Err(ParseError::HostRequired));
        assert_eq!(parser().parse(Some("collect logs   ")), Err(ParseError::HostRequired));
    }

    #[test]
    fn test_unknown_action() {
        let parser = parser();
        assert_eq!(parser.parse(Some("dance")), Err(ParseError::UnknownAction));
        assert_eq!(parser.parse(Some("collect")), Err(ParseError::UnknownAction));
        // Internal actions are not reachable from command text.
        assert_eq!(parser.parse(Some("error db01")), Err(ParseError::UnknownAction));
        // Mention markup is stripped upstream, not here.
        assert_eq!(
            parser.parse(Some("<@U0A5U1UJZ9A> collect logs db01")),
            Err(ParseError::UnknownAction)
        );
    }

    #[test]
    fn test_no_word_boundary_required() {
        assert_eq!(
            parser().parse(Some("collect logsdb01")),
            Ok(command("collect logs", "db01"))
        );
    }

    #[test]
    fn test_longest_phrase_wins() {
        let parser = CommandParser::from_phrases([
            "check".to_string(),
            "check status".to_string(),
        ]);
        assert_eq!(parser.phrases().collect::<Vec<_>>(), ["check status", "check"]);
        assert_eq!(
            parser.parse(Some("check status web01")),
            Ok(command("check status", "web01"))
        );
        assert_eq!(parser.parse(Some("check web01")), Ok(command("check", "web01")));
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        assert_eq!(parser().parse(Some("ünïcödé host")), Err(ParseError::UnknownAction));
        assert_eq!(parser().parse(Some("check statü")), Err(ParseError::UnknownAction));
        assert_eq!(
            parser().parse(Some("check status 東京-01")),
            Ok(command("check status", "東京-01"))
        );
    }

    #[test]
    fn test_non_ascii_phrase_matches_any_case() {
        let parser = CommandParser::from_phrases(["État des lieux".to_string()]);
        for text in ["état des lieux srv-1", "ÉTAT DES LIEUX srv-1", "  État Des Lieux   srv-1 "] {
            assert_eq!(
                parser.parse(Some(text)),
                Ok(command("état des lieux", "srv-1"))
            );
        }
        assert_eq!(
            parser.parse(Some("etat des lieux srv-1")),
            Err(ParseError::UnknownAction)
        );
    }
}
