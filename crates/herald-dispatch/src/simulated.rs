// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo-mode sender that draws outcomes instead of calling a provider.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use herald_config::model::SimulationConfig;
use herald_core::{Campaign, Contact, HeraldError, MessageId, MessageSender};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const FALLBACK_ERROR: &str = "Simulated: delivery failed";

/// Simulates delivery with a fixed success probability.
///
/// Success ids look like `demo_<millis>_<seq>_<9 base36 chars>`; the sequence
/// number keeps them unique within the process.
pub struct SimulatedSender {
    rng: Mutex<StdRng>,
    success_rate: f64,
    errors: Vec<String>,
    seq: AtomicU64,
}

impl SimulatedSender {
    /// Builds a sender from config, seeding from OS entropy unless a seed is set.
    pub fn new(config: &SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng, config.success_rate, config.error_messages.clone())
    }

    pub fn with_rng(rng: StdRng, success_rate: f64, errors: Vec<String>) -> Self {
        Self {
            rng: Mutex::new(rng),
            success_rate: success_rate.clamp(0.0, 1.0),
            errors,
            seq: AtomicU64::new(0),
        }
    }

    /// One draw: `Ok(suffix)` on success, `Err(reason)` otherwise.
    fn draw(&self) -> Result<String, String> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        if rng.r#gen::<f64>() < self.success_rate {
            let suffix = (0..9)
                .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
                .collect();
            Ok(suffix)
        } else {
            Err(self
                .errors
                .choose(&mut *rng)
                .cloned()
                .unwrap_or_else(|| FALLBACK_ERROR.to_string()))
        }
    }
}

#[async_trait]
impl MessageSender for SimulatedSender {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn send(&self, _campaign: &Campaign, contact: &Contact) -> Result<MessageId, HeraldError> {
        match self.draw() {
            Ok(suffix) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                let millis = chrono::Utc::now().timestamp_millis();
                let id = format!("demo_{millis}_{seq}_{suffix}");
                debug!(contact = %contact.name, message_id = %id, "simulated delivery");
                Ok(MessageId(id))
            }
            Err(reason) => {
                debug!(contact = %contact.name, reason = %reason, "simulated failure");
                Err(HeraldError::Simulated(reason))
            }
        }
    }
}
