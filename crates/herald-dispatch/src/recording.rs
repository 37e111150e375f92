// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome counters.
//!
//! Uses the metrics-rs facade; without an installed recorder these are no-ops.

use herald_core::DispatchOutcome;
use metrics::describe_counter;

pub const OUTCOMES_TOTAL: &str = "herald_dispatch_outcomes_total";

/// Register metric descriptions. Call once after installing a recorder.
pub fn register_metrics() {
    describe_counter!(
        OUTCOMES_TOTAL,
        "Per-contact dispatch outcomes by platform and outcome"
    );
}

/// Count one contact's outcome.
pub fn record_outcome(platform: &str, outcome: &DispatchOutcome) {
    let label = match outcome.failure_kind() {
        None => "success".to_string(),
        Some(kind) => kind.to_string(),
    };
    metrics::counter!(
        OUTCOMES_TOTAL,
        "platform" => platform.to_string(),
        "outcome" => label
    )
    .increment(1);
}
