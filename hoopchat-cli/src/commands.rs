//! Slash-command parsing for the chat prompt
//!
//! Numbers typed by the user are 1-based; parsed commands carry 0-based
//! indices. Range checks against the store happen in the REPL.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: ask the backend
    Ask(String),
    New,
    List,
    Switch(usize),
    Pin(usize),
    Delete(usize),
    Rename { index: usize, title: String },
    /// Show or hide evidence of a message
    Evidence(usize),
    EvidencePin { message: usize, evidence: usize },
    EvidenceDelete { message: usize, evidence: usize },
    Theme,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  <text>              ask a question in the active chat
  /new                start a new chat
  /list               list chats (* = active, ^ = pinned)
  /switch N           make chat N active
  /pin N              pin or unpin chat N
  /delete N           delete chat N
  /rename N TITLE     rename chat N (empty TITLE keeps the old one)
  /evidence M         show or hide evidence of message M
  /epin M E           pin or unpin evidence E of message M
  /edel M E           delete evidence E of message M
  /theme              toggle dark/light theme
  /help               show this help
  /quit               exit";

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Ask(line.to_string())));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "new" => Command::New,
        "list" | "ls" => Command::List,
        "switch" => Command::Switch(one_index(name, args)?),
        "pin" => Command::Pin(one_index(name, args)?),
        "delete" | "del" => Command::Delete(one_index(name, args)?),
        "rename" => {
            let (index, title) = match args.split_once(char::is_whitespace) {
                Some((index, title)) => (index, title.trim()),
                None => (args, ""),
            };
            Command::Rename {
                index: parse_index(name, index)?,
                title: title.to_string(),
            }
        }
        "evidence" | "ev" => Command::Evidence(one_index(name, args)?),
        "epin" => {
            let (message, evidence) = two_indices(name, args)?;
            Command::EvidencePin { message, evidence }
        }
        "edel" => {
            let (message, evidence) = two_indices(name, args)?;
            Command::EvidenceDelete { message, evidence }
        }
        "theme" => Command::Theme,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command /{} (try /help)", other)),
    };
    Ok(Some(command))
}

fn parse_index(command: &str, raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("/{}: expected a number from 1, got {:?}", command, raw)),
    }
}

fn one_index(command: &str, args: &str) -> Result<usize, String> {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(raw), None) => parse_index(command, raw),
        _ => Err(format!("/{} takes exactly one number", command)),
    }
}

fn two_indices(command: &str, args: &str) -> Result<(usize, usize), String> {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Ok((parse_index(command, a)?, parse_index(command, b)?)),
        _ => Err(format!("/{} takes two numbers: message and evidence", command)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_question() {
        assert_eq!(
            parse("  who won last night? ").unwrap(),
            Some(Command::Ask("who won last night?".to_string()))
        );
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_indices_are_zero_based() {
        assert_eq!(parse("/switch 2").unwrap(), Some(Command::Switch(1)));
        assert_eq!(
            parse("/epin 2 3").unwrap(),
            Some(Command::EvidencePin {
                message: 1,
                evidence: 2
            })
        );
    }

    #[test]
    fn test_rename_keeps_spaces_in_title() {
        assert_eq!(
            parse("/rename 1   Western Conference Finals ").unwrap(),
            Some(Command::Rename {
                index: 0,
                title: "Western Conference Finals".to_string()
            })
        );
        assert_eq!(
            parse("/rename 3").unwrap(),
            Some(Command::Rename {
                index: 2,
                title: String::new()
            })
        );
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(parse("/pin 0").is_err());
        assert!(parse("/pin x").is_err());
        assert!(parse("/pin").is_err());
        assert!(parse("/pin 1 2").is_err());
        assert!(parse("/edel 1").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("/dunk").unwrap_err();
        assert!(err.contains("/dunk"));
    }
}
