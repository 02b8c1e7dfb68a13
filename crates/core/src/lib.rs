//! Core business logic for Soundledger.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All reconciliation arithmetic and chart synthesis lives
//! here.
//!
//! # Modules
//!
//! - `royalty` - Snapshot arithmetic, time-series synthesis, share resolution
//! - `storage` - Archived-statement storage collaborator

pub mod royalty;
pub mod storage;
