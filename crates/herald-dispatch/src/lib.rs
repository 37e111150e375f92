// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign dispatch for the Herald workspace.
//!
//! Resolves demo versus production mode from the credential set, validates
//! contacts per platform, routes each send through an ordered list of
//! provider senders and aggregates per-contact outcomes into a
//! [`BatchResult`](herald_core::BatchResult).
//!
//! # Usage
//!
//! ```no_run
//! use herald_dispatch::{partition_contacts, DispatchService};
//! # async fn run(campaign: herald_core::Campaign, contacts: Vec<herald_core::Contact>) {
//! let config = herald_config::load_and_validate().expect("config errors");
//! let service = DispatchService::from_config(&config).expect("http client");
//!
//! let partition = partition_contacts(&contacts, &campaign.platform);
//! if let Some(notice) = partition.skipped_notice(&campaign.platform) {
//!     eprintln!("{notice}");
//! }
//! let result = service.send_campaign_to_contacts(&campaign, &partition.valid).await;
//! println!("{}", herald_core::SendSummary::headline(&result));
//! # }
//! ```

pub mod batch;
pub mod messenger;
pub mod mode;
pub mod recording;
pub mod router;
pub mod service;
pub mod simulated;
pub mod validate;

pub use batch::BatchAggregator;
pub use messenger::MessengerSender;
pub use mode::{is_demo_mode, DispatchMode};
pub use router::ProviderRouter;
pub use service::DispatchService;
pub use simulated::SimulatedSender;
pub use validate::{contact_address, partition_contacts, validate_contact, ContactPartition};
