//! Storage Hub Core - warehouse job lifecycle library.
//!
//! This crate holds the domain of the storage hub, shared by every component:
//! - `storage-hub` - document stores, sync layer and the warehouse service
//! - `storage-hub-cli` - command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! database access, no HTTP clients. Every mutation works on an in-memory
//! [`SystemData`] aggregate; persisting it is the caller's job.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, statuses, zones and production lines
//! - [`model`] - jobs, boxes, customers and the aggregate root
//! - [`lifecycle`] - the job state machine and customer registration
//! - [`issues`] - per-box issue flags
//! - [`queries`] - read-only views (pools, zone summaries, recycle bin)
//! - [`error`] - validation and lifecycle errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod issues;
pub mod lifecycle;
pub mod model;
pub mod queries;
pub mod types;

pub use error::{LifecycleError, ValidationError};
pub use lifecycle::{BoxDraft, BoxRemoval, CustomerDraft, JobDraft};
pub use model::{Customer, Job, JobState, PullRecord, StorageBox, SystemData};
pub use queries::{BinEntry, ZoneSummary};
pub use types::*;
