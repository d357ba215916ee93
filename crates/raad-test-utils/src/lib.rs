// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Raad integration tests.
//!
//! Provides a scripted query engine, fixture datasets and a harness that
//! wires them into a real chat pipeline, without any external service.
//!
//! # Components
//!
//! - [`MockQueryEngine`] - engine returning queued answers and recording calls
//! - [`fixtures`] - small versions of the four datasets
//! - [`TestHarness`] - data directory, store, dispatcher and session in one

pub mod fixtures;
pub mod harness;
pub mod mock_engine;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_engine::{MockQueryEngine, RecordedCall};
