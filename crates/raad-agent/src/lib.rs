// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat pipeline for Raad.
//!
//! A [`ChatSession`] records each question in its [`SessionHistory`], hands
//! it to the [`QueryDispatcher`] together with the selected dataset, and
//! records the rendered answer. [`SessionRegistry`] holds the live sessions
//! served by the gateway.

pub mod classify;
pub mod dispatcher;
pub mod examples;
pub mod history;
pub mod registry;
pub mod renderer;
pub mod sanitize;
pub mod session;

pub use classify::classify;
pub use dispatcher::{ERROR_PREFIX, QueryDispatcher};
pub use examples::{EXAMPLE_QUESTIONS, ExampleCategory, ExampleQuestion};
pub use history::SessionHistory;
pub use registry::{SessionHandle, SessionRegistry};
pub use renderer::{CHART_CONTENT, DisplayAction, render_and_record};
pub use sanitize::{MIN_QUESTION_LEN, sanitize_question, suspicious_patterns};
pub use session::{ChatSession, RecentQuery, Reply, SessionSettings};
