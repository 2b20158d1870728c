//! Chat Panel - assistant widget transcript
//!
//! Information Hiding:
//! - Typing indicator bookkeeping hidden from callers
//! - Server failures become a single fallback reply, the error is still returned

use crate::client::StorefrontApi;
use crate::config::{ChatConfig, DEFAULT_FALLBACK_MESSAGE};
use crate::error::ApiError;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    Message { sender: Sender, text: String },
    Typing(TypingId),
}

/// A submission whose reply has not arrived yet
///
/// Holds the typing indicator shown for it until passed to
/// [`ChatPanel::finish`].
#[derive(Debug)]
pub struct PendingReply {
    typing: TypingId,
    message: String,
}

impl PendingReply {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn typing_id(&self) -> TypingId {
        self.typing
    }
}

/// What happened to one submission
#[derive(Debug)]
pub enum ChatOutcome {
    Replied(String),
    /// The fallback message was shown in place of a reply
    Failed(ApiError),
}

pub struct ChatPanel {
    api: Arc<dyn StorefrontApi>,
    fallback_message: String,
    transcript: Vec<ChatEntry>,
    next_typing_id: u64,
    open: bool,
}

impl ChatPanel {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            transcript: Vec::new(),
            next_typing_id: 0,
            open: false,
        }
    }

    pub fn from_config(api: Arc<dyn StorefrontApi>, config: &ChatConfig) -> Self {
        Self::new(api).with_fallback_message(config.fallback_message.clone())
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the new open state
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn transcript(&self) -> &[ChatEntry] {
        &self.transcript
    }

    /// Messages only, without typing indicators
    pub fn messages(&self) -> impl Iterator<Item = (Sender, &str)> {
        self.transcript.iter().filter_map(|entry| match entry {
            ChatEntry::Message { sender, text } => Some((*sender, text.as_str())),
            ChatEntry::Typing(_) => None,
        })
    }

    pub fn typing_indicators(&self) -> usize {
        self.transcript
            .iter()
            .filter(|entry| matches!(entry, ChatEntry::Typing(_)))
            .count()
    }

    /// Send `input` to the assistant and wait for the answer
    ///
    /// Blank input is ignored and returns `None`. Callers that redraw while
    /// the request is in flight use [`begin`](Self::begin),
    /// [`send`](Self::send) and [`finish`](Self::finish) instead.
    pub async fn submit(&mut self, input: &str) -> Option<ChatOutcome> {
        let pending = self.begin(input)?;
        let result = self.send(&pending).await;
        Some(self.finish(pending, result))
    }

    /// Show the user message and a typing indicator
    ///
    /// Returns `None` for blank input, leaving the transcript untouched.
    pub fn begin(&mut self, input: &str) -> Option<PendingReply> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        self.push_message(Sender::User, message);
        let typing = self.add_typing_indicator();
        tracing::debug!("[ChatPanel] Waiting for reply {:?}", typing);

        Some(PendingReply {
            typing,
            message: message.to_string(),
        })
    }

    /// Ask the server; the transcript is only borrowed, so it can be drawn
    /// meanwhile
    pub async fn send(&self, pending: &PendingReply) -> Result<String, ApiError> {
        self.api.chat(&pending.message).await
    }

    /// Replace the typing indicator with the reply or the fallback message
    pub fn finish(&mut self, pending: PendingReply, result: Result<String, ApiError>) -> ChatOutcome {
        self.remove_typing_indicator(pending.typing);

        match result {
            Ok(reply) => {
                self.push_message(Sender::Assistant, &reply);
                ChatOutcome::Replied(reply)
            }
            Err(e) => {
                tracing::warn!("[ChatPanel] Chat request failed: {}", e);
                let fallback = self.fallback_message.clone();
                self.push_message(Sender::Assistant, &fallback);
                ChatOutcome::Failed(e)
            }
        }
    }

    fn push_message(&mut self, sender: Sender, text: &str) {
        self.transcript.push(ChatEntry::Message {
            sender,
            text: text.to_string(),
        });
    }

    fn add_typing_indicator(&mut self) -> TypingId {
        let id = TypingId(self.next_typing_id);
        self.next_typing_id += 1;
        self.transcript.push(ChatEntry::Typing(id));
        id
    }

    fn remove_typing_indicator(&mut self, id: TypingId) {
        self.transcript
            .retain(|entry| *entry != ChatEntry::Typing(id));
    }
}
