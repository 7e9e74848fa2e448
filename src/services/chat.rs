use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::core::config::ChatConfig;

const STRATEGY_HEADING: &str = "Making Strategy";
const ANSWER_HEADING: &str = "Generating Answer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Step { heading: String, text: String },
    Reply(String),
}

/// Messages exchanged so far plus the loading and selection flags.
#[derive(Debug, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    steps: Vec<(String, String)>,
    loading: bool,
    selected: Option<usize>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a user message. Blank input or input while a reply is pending is rejected.
    pub fn send(&mut self, input: &str) -> bool {
        if input.trim().is_empty() || self.loading {
            return false;
        }
        self.messages.push(ChatMessage {
            role: Role::User,
            content: input.to_string(),
        });
        self.loading = true;
        self.steps.clear();
        true
    }

    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Step { heading, text } => self.steps.push((heading, text)),
            ChatEvent::Reply(content) => {
                self.messages.push(ChatMessage {
                    role: Role::Assistant,
                    content,
                });
                self.loading = false;
                self.steps.clear();
            }
        }
    }

    /// Marks an assistant message as selected and returns its content.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        if self.messages.get(index)?.role != Role::Assistant {
            return None;
        }
        self.selected = Some(index);
        Some(&self.messages[index].content)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Loading steps shown while a reply is pending.
    pub fn steps(&self) -> &[(String, String)] {
        &self.steps
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }
}

/// Plays the fixed "thinking" steps and then the canned reply.
#[derive(Debug, Clone)]
pub struct ScriptedResponder {
    strategy_steps: Vec<String>,
    answer_steps: Vec<String>,
    response: String,
    delay: Duration,
}

impl ScriptedResponder {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            strategy_steps: config.strategy_steps.clone(),
            answer_steps: config.answer_steps.clone(),
            response: config.response.clone(),
            delay: Duration::from_millis(config.step_delay_ms),
        }
    }

    pub fn script(&self) -> Vec<ChatEvent> {
        let steps = self
            .strategy_steps
            .iter()
            .map(|text| (STRATEGY_HEADING, text))
            .chain(self.answer_steps.iter().map(|text| (ANSWER_HEADING, text)));
        steps
            .map(|(heading, text)| ChatEvent::Step {
                heading: heading.to_string(),
                text: text.clone(),
            })
            .chain(std::iter::once(ChatEvent::Reply(self.response.clone())))
            .collect()
    }

    /// Sends the script over `tx`, sleeping after every step.
    /// Stops early if the receiver is gone.
    pub async fn respond(&self, tx: mpsc::Sender<ChatEvent>) {
        for event in self.script() {
            let is_step = matches!(event, ChatEvent::Step { .. });
            if tx.send(event).await.is_err() {
                tracing::debug!("chat receiver dropped, stopping script");
                return;
            }
            if is_step {
                tokio::time::sleep(self.delay).await;
            }
        }
    }
}
