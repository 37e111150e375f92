// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Herald dispatch workspace.
//!
//! Provides the campaign and contact records the dispatch core consumes, the
//! outcome and batch types it produces, the [`HeraldError`] taxonomy, and the
//! [`MessageSender`] trait every provider integration implements.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HeraldError;
pub use traits::MessageSender;
pub use types::{
    BatchProgress, BatchResult, Campaign, CampaignStats, Contact, DispatchOutcome, FailureKind,
    HealthStatus, MessageId, Platform, SendSummary,
};
