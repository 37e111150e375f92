// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock sender for deterministic testing.
//!
//! `MockSender` implements `MessageSender` with a queue of scripted replies
//! and captures every contact it was asked to deliver to.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use herald_core::{Campaign, Contact, HealthStatus, HeraldError, MessageId, MessageSender};

/// What the mock does on its next `send()`.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Succeed with a generated `mock-msg-<uuid>` id.
    Succeed,
    /// Succeed with a fixed id.
    SucceedWith(String),
    /// Provider rejection with the given text.
    Reject(String),
    /// Missing-credential error with the given text.
    Unconfigured(String),
    /// Connection failure.
    Transport,
    /// Panic inside `send()`.
    Panic,
}

/// A scripted sender for testing.
///
/// Replies are consumed in order; once the script is empty every send
/// returns the fallback reply, which defaults to [`Reply::Succeed`].
pub struct MockSender {
    name: String,
    script: Arc<Mutex<VecDeque<Reply>>>,
    fallback: Reply,
    sent: Arc<Mutex<Vec<Contact>>>,
}

impl MockSender {
    /// Create a mock that always succeeds.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Reply::Succeed,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that plays `replies` in order, then succeeds.
    pub fn scripted(name: impl Into<String>, replies: impl IntoIterator<Item = Reply>) -> Self {
        let mock = Self::new(name);
        Self {
            script: Arc::new(Mutex::new(replies.into_iter().collect())),
            ..mock
        }
    }

    /// Create a mock that answers every send with `reply`.
    pub fn always(name: impl Into<String>, reply: Reply) -> Self {
        Self {
            fallback: reply,
            ..Self::new(name)
        }
    }

    /// Contacts passed to `send()`, in call order.
    pub async fn sent_contacts(&self) -> Vec<Contact> {
        self.sent.lock().await.clone()
    }

    /// Number of `send()` calls so far.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl MessageSender for MockSender {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, _campaign: &Campaign, contact: &Contact) -> Result<MessageId, HeraldError> {
        self.sent.lock().await.push(contact.clone());
        let reply = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::Succeed => Ok(MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4()))),
            Reply::SucceedWith(id) => Ok(MessageId(id)),
            Reply::Reject(message) => Err(HeraldError::rejected(self.name.clone(), message)),
            Reply::Unconfigured(message) => Err(HeraldError::Config(message)),
            Reply::Transport => Err(HeraldError::transport(
                self.name.clone(),
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            )),
            Reply::Panic => panic!("mock sender {} panicked on {}", self.name, contact.name),
        }
    }

    async fn health_check(&self) -> Result<HealthStatus, HeraldError> {
        Ok(HealthStatus::Healthy)
    }
}
