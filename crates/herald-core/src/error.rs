// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Herald dispatch workspace.

use thiserror::Error;

use crate::types::FailureKind;

/// The primary error type returned by senders and the dispatch core.
///
/// Errors never cross the batch boundary: the router folds every variant into a
/// [`DispatchOutcome::Failure`](crate::types::DispatchOutcome) for the contact
/// that produced it.
#[derive(Debug, Error)]
pub enum HeraldError {
    /// A provider credential is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The contact lacks the addressing field the platform requires.
    #[error("invalid contact: {message}")]
    InvalidContact { message: String },

    /// The provider answered with a non-success response.
    #[error("{provider} rejected the message: {message}")]
    Provider { provider: String, message: String },

    /// The HTTP call itself failed (DNS, connect, timeout, unreadable body).
    #[error("network error connecting to {provider}")]
    Transport {
        provider: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The campaign names a platform no sender handles.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// A demo-mode failure drawn by the simulated sender.
    #[error("{0}")]
    Simulated(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HeraldError {
    /// Builds a [`HeraldError::Transport`] from any error type.
    pub fn transport(
        provider: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            provider: provider.into(),
            source: Box::new(source),
        }
    }

    /// Builds a [`HeraldError::Provider`] rejection.
    pub fn rejected(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Builds a [`HeraldError::InvalidContact`].
    pub fn invalid_contact(message: impl Into<String>) -> Self {
        Self::InvalidContact {
            message: message.into(),
        }
    }

    /// The outcome category this error is reported under.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Config(_) => FailureKind::Configuration,
            Self::InvalidContact { .. } => FailureKind::InvalidContact,
            Self::Provider { .. } => FailureKind::ProviderRejected,
            Self::Transport { .. } => FailureKind::Network,
            Self::UnsupportedPlatform(_) => FailureKind::UnsupportedPlatform,
            Self::Simulated(_) => FailureKind::Simulated,
            Self::Internal(_) => FailureKind::Internal,
        }
    }

    /// The text shown to the user for this error.
    ///
    /// Provider rejections surface the provider's own wording; configuration
    /// errors are passed through verbatim so the caller can point at setup.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(message) => message.clone(),
            Self::InvalidContact { message } => message.clone(),
            Self::Provider { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
