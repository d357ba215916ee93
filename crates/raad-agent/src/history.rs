// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered, append-only conversation history for one session.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use raad_core::{ChatMessage, Role};

/// Messages in insertion order. Only whole-history clears remove anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionHistory {
    messages: Vec<ChatMessage>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Every message, oldest first.
    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The last `min(n, len)` messages; `n == 0` means the whole history.
    pub fn recent(&self, n: usize) -> &[ChatMessage] {
        if n == 0 {
            return &self.messages;
        }
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Markdown transcript of the conversation, stamped with the current time.
    pub fn to_markdown(&self) -> String {
        self.to_markdown_at(Utc::now())
    }

    pub fn to_markdown_at(&self, exported_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Raad Chat History");
        let _ = writeln!(out, "Exported: {} UTC", exported_at.format("%Y-%m-%d %H:%M:%S"));
        out.push_str("\n---\n\n");

        for message in &self.messages {
            match message.role() {
                Role::User => {
                    let _ = writeln!(out, "## User ({})", message.formatted_timestamp());
                    for line in message.content().lines() {
                        let _ = writeln!(out, "> {line}");
                    }
                }
                Role::Assistant => {
                    let _ = writeln!(out, "## Raad ({})", message.formatted_timestamp());
                    if let Some(kind) = message.response_type() {
                        let _ = writeln!(out, "*Response type: {kind}*\n");
                    }
                    let _ = writeln!(out, "{}", message.content());
                    if let Some(path) = message.artifact() {
                        let _ = writeln!(out, "\nChart: `{}`", path.display());
                    }
                    if let Some(code) = message.code().filter(|_| message.has_code()) {
                        let _ = writeln!(out, "\nGenerated code:\n\n```\n{}\n```", code.trim_end());
                    }
                }
                Role::System => {
                    let _ = writeln!(out, "## System");
                    let _ = writeln!(out, "{}", message.content());
                }
            }
            out.push_str("\n---\n\n");
        }
        out
    }
}
