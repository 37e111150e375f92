// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Herald integration tests.
//!
//! Provides a scripted sender and fixtures for fast, deterministic tests
//! without external services.
//!
//! # Components
//!
//! - [`MockSender`] - Sender that replays scripted replies and records contacts
//! - [`fixtures`] - Campaign, contact and configuration builders

pub mod fixtures;
pub mod mock_sender;

pub use mock_sender::{MockSender, Reply};
