//! Core pipelines and domain logic for leetlog.
//!
//! This crate ties slug resolution, metadata lookups and the catalog document
//! together into the two batch jobs: [`update::update_catalog`] and
//! [`coverage::report_coverage`].

pub mod coverage;
pub mod detect;
pub mod progress;
pub mod slug;
pub mod update;
pub(crate) mod write;
