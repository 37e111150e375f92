// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions shared across sender crates.
//!
//! Senders use `#[async_trait]` so the router can hold them as
//! `Arc<dyn MessageSender>`.

pub mod sender;

pub use sender::MessageSender;
