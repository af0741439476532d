//! # tg-models
//!
//! Data models for the taogauge subnet pipeline.
//!
//! Covers raw Taostats responses, the merged snapshot row, reconciled
//! project sources, scraped website data, LLM research and score reports,
//! the per-phase pipeline records and the frontend taxonomy payload.
//!
//! ## Usage
//!
//! ```ignore
//! use tg_models::{PoolMarketData, SubnetIdentity};
//!
//! let identity = SubnetIdentity::from_value(&entry);
//! let pool = PoolMarketData::from_value(&pool_entry);
//! ```

#![warn(clippy::all)]

pub mod common;
pub mod frontend;
pub mod pipeline;
pub mod research;
pub mod scoring;
pub mod sources;
pub mod subnet;
pub mod website;

pub use common::*;
pub use frontend::*;
pub use pipeline::*;
pub use research::*;
pub use scoring::*;
pub use sources::*;
pub use subnet::*;
pub use website::*;
