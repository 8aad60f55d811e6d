//! Terminal rendering of sessions and messages

use console::{style, StyledObject};
use hoopchat_core::preferences::Theme;
use hoopchat_core::session::{Message, Session, SessionStore};

/// Colors for the current theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    theme: Theme,
}

impl Palette {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn user<D>(&self, text: D) -> StyledObject<D> {
        match self.theme {
            Theme::Dark => style(text).cyan().bright().bold(),
            Theme::Light => style(text).blue().bold(),
        }
    }

    fn bot<D>(&self, text: D) -> StyledObject<D> {
        match self.theme {
            Theme::Dark => style(text).green().bright(),
            Theme::Light => style(text).green(),
        }
    }

    fn muted<D>(&self, text: D) -> StyledObject<D> {
        match self.theme {
            Theme::Dark => style(text).white().dim(),
            Theme::Light => style(text).black().dim(),
        }
    }

    fn accent<D>(&self, text: D) -> StyledObject<D> {
        match self.theme {
            Theme::Dark => style(text).yellow().bright(),
            Theme::Light => style(text).magenta(),
        }
    }

    pub fn error<D>(&self, text: D) -> StyledObject<D> {
        style(text).red()
    }
}

/// One line per session: number, markers, title
pub fn session_list(store: &SessionStore, palette: Palette) -> String {
    let mut lines = Vec::with_capacity(store.len());
    for (i, session) in store.sessions().iter().enumerate() {
        let active = if i == store.active_index() { '*' } else { ' ' };
        let pinned = if session.pinned { '^' } else { ' ' };
        let mut line = format!("{}{} {:>2}. {}", active, pinned, i + 1, session.title);
        if session.is_pending() {
            line.push_str(&format!(" {}", palette.muted("(waiting)")));
        }
        if store.editing_index() == Some(i) {
            line.push_str(&format!(" {}", palette.muted("(editing)")));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// A message, with its evidence when expanded
pub fn message(index: usize, message: &Message, palette: Palette) -> String {
    let mut out = if message.is_user() {
        format!("{} {}", palette.user(format!("[{}] you:", index + 1)), message.text())
    } else {
        format!("{} {}", palette.bot(format!("[{}] bot:", index + 1)), message.text())
    };

    if message.evidence.is_empty() {
        return out;
    }
    if !message.expanded {
        out.push_str(&format!(
            "\n    {}",
            palette.muted(format!(
                "{} evidence item(s), /evidence {} to show",
                message.evidence.len(),
                index + 1
            ))
        ));
        return out;
    }
    for (i, item) in message.evidence.iter().enumerate() {
        let marker = if item.is_pinned() { "^" } else { "-" };
        out.push_str(&format!(
            "\n    {} {}. {} {}",
            palette.accent(marker),
            i + 1,
            item.display_name(),
            palette.muted(format!("[{} {}]", item.table(), item.id()))
        ));
    }
    out
}

/// Every message of a session, preceded by its title
pub fn transcript(session: &Session, palette: Palette) -> String {
    let mut out = format!("{}", palette.accent(format!("== {} ==", session.title)));
    for (i, m) in session.messages.iter().enumerate() {
        out.push('\n');
        out.push_str(&message(i, m, palette));
    }
    if session.is_pending() {
        out.push('\n');
        out.push_str(&format!("{}", palette.muted("... waiting for a reply")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoopchat_core::session::{GameEvidence, PlayerEvidence};
    use hoopchat_core::AnswerResult;

    fn plain() -> Palette {
        console::set_colors_enabled(false);
        Palette::new(Theme::Light)
    }

    fn answered_store() -> SessionStore {
        let mut store = SessionStore::new();
        let ticket = store.submit_user_message("who won").unwrap();
        let mut player = PlayerEvidence::new("2544_1");
        player.player_name = "LeBron James".to_string();
        store.complete_request(
            ticket,
            Ok(AnswerResult::new(
                "Lakers won",
                vec![GameEvidence::new(1).into(), player.into()],
            )),
        );
        store
    }

    #[test]
    fn test_session_list_marks_active_and_pinned() {
        let palette = plain();
        let mut store = SessionStore::new();
        store.create_session();
        store.toggle_pin(0);

        let list = session_list(&store, palette);
        let lines: Vec<&str> = list.lines().collect();
        assert_eq!(lines, vec![" ^  1. Chat 1", "*   2. Chat 2"]);
    }

    #[test]
    fn test_collapsed_evidence_shows_hint() {
        let palette = plain();
        let store = answered_store();
        let text = message(1, &store.active_session().messages[1], palette);
        assert!(text.contains("[2] bot: Lakers won"));
        assert!(text.contains("2 evidence item(s), /evidence 2 to show"));
        assert!(!text.contains("LeBron"));
    }

    #[test]
    fn test_expanded_evidence_lists_items() {
        let palette = plain();
        let mut store = answered_store();
        store.toggle_evidence_expanded(1);
        store.toggle_evidence_pin(1, 1);

        let text = transcript(store.active_session(), palette);
        assert!(text.starts_with("== who won =="));
        assert!(text.contains("^ 1. LeBron James [player_box_scores 2544_1]"));
        assert!(text.contains("- 2. Game 1 [game_details 1]"));
    }
}
