// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams between the chat pipeline and its backends.

pub mod engine;

pub use engine::{EngineRequest, QueryEngine};
