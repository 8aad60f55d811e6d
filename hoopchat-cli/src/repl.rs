//! Line-oriented chat loop

use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use hoopchat_core::preferences::{PreferenceStorage, ThemePreference};
use hoopchat_core::session::{ChatController, SessionStore, SubmitError, SubmitOutcome};

use crate::commands::{self, Command, HELP};
use crate::render::{self, Palette};

/// What the loop does after a command
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Show(String),
    Ask(String),
    Quit,
}

pub struct Repl<S: PreferenceStorage> {
    controller: ChatController,
    theme: ThemePreference<S>,
}

impl<S: PreferenceStorage> Repl<S> {
    pub fn new(controller: ChatController, theme: ThemePreference<S>) -> Self {
        Self { controller, theme }
    }

    fn palette(&self) -> Palette {
        Palette::new(self.theme.theme())
    }

    fn store(&self) -> Arc<Mutex<SessionStore>> {
        self.controller.store()
    }

    /// Read commands until `/quit` or end of input
    ///
    /// Replies still outstanding at end of input are awaited so piped
    /// questions get their answers; `/quit` abandons them.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        let mut in_flight = JoinSet::new();

        println!("{}", render::session_list(&self.store().lock(), self.palette()));
        println!("Type a question, or /help for commands.");

        loop {
            while let Some(joined) = in_flight.try_join_next() {
                if let Err(e) = joined {
                    warn!("Reply task failed: {}", e);
                }
            }

            let Some(line) = lines.next_line().await? else {
                debug!("End of input; waiting for {} pending replies", in_flight.len());
                while let Some(joined) = in_flight.join_next().await {
                    if let Err(e) = joined {
                        warn!("Reply task failed: {}", e);
                    }
                }
                break;
            };

            let command = match commands::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    println!("{}", self.palette().error(message));
                    continue;
                }
            };

            match self.execute(command) {
                Action::Show(text) => println!("{}", text),
                Action::Ask(question) => match self.controller.start(&question) {
                    Ok(request) => {
                        let controller = self.controller.clone();
                        let palette = self.palette();
                        in_flight.spawn(async move {
                            let outcome = controller.answer(request).await;
                            let store = controller.store();
                            let text = describe_outcome(&store.lock(), outcome, palette);
                            println!("{}", text);
                        });
                    }
                    Err(SubmitError::RequestInFlight) => println!(
                        "{}",
                        self.palette()
                            .error("Still waiting for the previous reply in this chat.")
                    ),
                    Err(SubmitError::EmptyMessage) => {}
                },
                Action::Quit => {
                    in_flight.abort_all();
                    break;
                }
            }
        }

        info!("Chat loop finished");
        Ok(())
    }

    /// Apply a command to the store or theme; range checks happen here so
    /// the store never sees an out-of-range index
    fn execute(&mut self, command: Command) -> Action {
        let store = self.store();
        let mut store = store.lock();
        let palette = self.palette();

        match command {
            Command::Ask(question) => return Action::Ask(question),
            Command::Quit => return Action::Quit,
            Command::Help => return Action::Show(HELP.to_string()),
            Command::List => {}
            Command::New => {
                store.create_session();
            }
            Command::Switch(index) => {
                if let Err(e) = check_session(&store, index) {
                    return Action::Show(e);
                }
                store.set_active(index);
                return Action::Show(render::transcript(store.active_session(), palette));
            }
            Command::Pin(index) => {
                if let Err(e) = check_session(&store, index) {
                    return Action::Show(e);
                }
                store.toggle_pin(index);
            }
            Command::Delete(index) => {
                if let Err(e) = check_session(&store, index) {
                    return Action::Show(e);
                }
                store.delete_session(index);
            }
            Command::Rename { index, title } => {
                if let Err(e) = check_session(&store, index) {
                    return Action::Show(e);
                }
                store.begin_edit_title(index);
                if title.is_empty() {
                    store.cancel_edit_title(index);
                } else {
                    store.set_title(index, title);
                    store.commit_edit_title();
                }
            }
            Command::Evidence(message) => {
                if let Err(e) = check_message(&store, message) {
                    return Action::Show(e);
                }
                store.toggle_evidence_expanded(message);
                let shown = &store.active_session().messages[message];
                return Action::Show(render::message(message, shown, palette));
            }
            Command::EvidencePin { message, evidence } => {
                if let Err(e) = check_evidence(&store, message, evidence) {
                    return Action::Show(e);
                }
                store.toggle_evidence_pin(message, evidence);
                let shown = &store.active_session().messages[message];
                return Action::Show(render::message(message, shown, palette));
            }
            Command::EvidenceDelete { message, evidence } => {
                if let Err(e) = check_evidence(&store, message, evidence) {
                    return Action::Show(e);
                }
                store.delete_evidence(message, evidence);
                let shown = &store.active_session().messages[message];
                return Action::Show(render::message(message, shown, palette));
            }
            Command::Theme => {
                let text = match self.theme.toggle() {
                    Ok(theme) => format!("Theme set to {}.", theme),
                    Err(e) => {
                        warn!("Failed to save theme: {}", e);
                        format!("Theme set to {} (not saved: {}).", self.theme.theme(), e)
                    }
                };
                return Action::Show(text);
            }
        }

        Action::Show(render::session_list(&store, self.palette()))
    }
}

fn check_session(store: &SessionStore, index: usize) -> Result<(), String> {
    if index < store.len() {
        Ok(())
    } else {
        Err(format!("No chat {} (there are {}).", index + 1, store.len()))
    }
}

fn check_message(store: &SessionStore, message: usize) -> Result<(), String> {
    let count = store.active_session().messages.len();
    if message < count {
        Ok(())
    } else {
        Err(format!("No message {} in this chat (there are {}).", message + 1, count))
    }
}

fn check_evidence(store: &SessionStore, message: usize, evidence: usize) -> Result<(), String> {
    check_message(store, message)?;
    let count = store.active_session().messages[message].evidence.len();
    if evidence < count {
        Ok(())
    } else {
        Err(format!(
            "Message {} has no evidence {} (there are {}).",
            message + 1,
            evidence + 1,
            count
        ))
    }
}

/// Text shown when a reply lands
fn describe_outcome(store: &SessionStore, outcome: SubmitOutcome, palette: Palette) -> String {
    let id = outcome.session_id();
    if let SubmitOutcome::Dropped(_) = outcome {
        return format!("{}", palette.error("Reply discarded: its chat was deleted."));
    }
    let Some(position) = store.sessions().iter().position(|s| s.id() == id) else {
        return String::new();
    };
    let session = &store.sessions()[position];
    let Some(last) = session.messages.len().checked_sub(1) else {
        return String::new();
    };
    let reply = render::message(last, &session.messages[last], palette);
    if position == store.active_index() {
        reply
    } else {
        format!("(reply in chat {}: {})\n{}", position + 1, session.title, reply)
    }
}
