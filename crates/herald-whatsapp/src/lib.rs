// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp senders for the Herald dispatch workspace.
//!
//! Two [`MessageSender`](herald_core::MessageSender) implementations share the
//! platform: [`WbizToolSender`] is tried first, and
//! [`WhatsAppBusinessSender`] is the fallback the router uses when the
//! gateway fails and Business API credentials exist.

pub mod business;
pub mod gateway;
pub mod phone;

pub use business::WhatsAppBusinessSender;
pub use gateway::WbizToolSender;
pub use phone::normalize_phone;
