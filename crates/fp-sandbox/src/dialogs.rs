//! Scripted dialog responders.
//!
//! The sandbox has no windows to show, so each user is assigned a
//! [`DialogScript`] that answers prompts for them. `Ignore` leaves the
//! prompt open forever, which is how tests exercise remote-call
//! timeouts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use fp_api::{DialogPrompt, DialogService, HostResult, PromptAnswer, UserId};

use crate::events::{EventLog, SandboxEvent};
use crate::relock;

/// How a sandbox user answers dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogScript {
    /// Confirm yes; pick the first option of any chooser.
    AcceptAll,
    /// Confirm no; dismiss any chooser.
    DeclineAll,
    /// Close every dialog without answering.
    #[default]
    DismissAll,
    /// Never answer; the prompt stays open until the caller gives up.
    Ignore,
    /// Confirm yes; pick a fixed option index (dismiss when out of
    /// range).
    ChooseIndex(usize),
}

pub(crate) type ScriptTable = Arc<RwLock<HashMap<UserId, DialogScript>>>;

/// Dialog service view for one user, answering from the script table.
pub struct SandboxDialogs {
    user: UserId,
    scripts: ScriptTable,
    events: Arc<EventLog>,
}

impl SandboxDialogs {
    pub(crate) fn new(user: UserId, scripts: ScriptTable, events: Arc<EventLog>) -> Self {
        Self {
            user,
            scripts,
            events,
        }
    }

    fn script(&self) -> DialogScript {
        relock(self.scripts.read())
            .get(&self.user)
            .copied()
            .unwrap_or_default()
    }

    fn record(&self, title: &str, answer: &str) {
        self.events.push(SandboxEvent::DialogAnswered {
            user: self.user,
            title: title.to_string(),
            answer: answer.to_string(),
        });
    }
}

#[async_trait]
impl DialogService for SandboxDialogs {
    async fn confirm(&self, prompt: &DialogPrompt) -> HostResult<PromptAnswer> {
        let answer = match self.script() {
            DialogScript::AcceptAll | DialogScript::ChooseIndex(_) => PromptAnswer::Accepted,
            DialogScript::DeclineAll => PromptAnswer::Declined,
            DialogScript::DismissAll => PromptAnswer::Dismissed,
            DialogScript::Ignore => return std::future::pending().await,
        };
        tracing::debug!(user = %self.user, title = %prompt.title, ?answer, "confirm dialog");
        let label = match answer {
            PromptAnswer::Accepted => "accepted",
            PromptAnswer::Declined => "declined",
            PromptAnswer::Dismissed => "dismissed",
        };
        self.record(&prompt.title, label);
        Ok(answer)
    }

    async fn choose(&self, title: &str, options: &[String]) -> HostResult<Option<usize>> {
        let pick = match self.script() {
            DialogScript::AcceptAll => {
                if options.is_empty() {
                    None
                } else {
                    Some(0)
                }
            }
            DialogScript::ChooseIndex(i) => {
                if i < options.len() {
                    Some(i)
                } else {
                    None
                }
            }
            DialogScript::DeclineAll | DialogScript::DismissAll => None,
            DialogScript::Ignore => return std::future::pending().await,
        };
        tracing::debug!(user = %self.user, title, ?pick, "choose dialog");
        match pick {
            Some(i) => self.record(title, &format!("option {i}")),
            None => self.record(title, "dismissed"),
        }
        Ok(pick)
    }

    async fn inform(&self, title: &str, _body: &str) -> HostResult<()> {
        if self.script() == DialogScript::Ignore {
            return std::future::pending().await;
        }
        self.record(title, "closed");
        Ok(())
    }
}
