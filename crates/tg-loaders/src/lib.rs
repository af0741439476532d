/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! # tg-loaders
//!
//! Data loading and orchestration on top of the Taostats client:
//!
//! - Fetch loaders for subnet identities, latest stats and pool market data
//! - Merge of the three feeds into the snapshot table, with CSV/JSON output
//! - Frontend sync of the snapshot into category groups
//! - The five-phase subnet analysis [`pipeline`]
//! - Shared plumbing: [`BatchProcessor`] and [`ProcessTracker`]

pub mod batch_processor;
pub mod csv_processor;
pub mod error;
pub mod frontend_sync;
pub mod identity_loader;
pub mod loader;
pub mod market_loader;
pub mod merge;
pub mod pipeline;
pub mod process_tracker;
pub mod snapshot;
pub mod stats_loader;
pub mod update;

// Re-export commonly used types
pub use batch_processor::{BatchConfig, BatchProcessor, BatchResult};
pub use error::{LoaderError, LoaderResult};
pub use loader::{DataLoader, LoaderConfig, LoaderContext};
pub use process_tracker::{ProcessInfo, ProcessState, ProcessTracker};

// Re-export loaders
pub use identity_loader::{IdentityLoader, IdentityLoaderInput};
pub use market_loader::MarketLoader;
pub use stats_loader::{StatsLoader, StatsLoaderInput};

pub use csv_processor::CsvProcessor;
pub use frontend_sync::{FrontendSync, SyncSummary};
pub use merge::{merge_subnet_data, merge_summary, MergeSummary};
pub use pipeline::{PipelineConfig, PipelineReport, PipelineSummary, RunState, SubnetPipeline};
pub use snapshot::{SnapshotPaths, SnapshotWriter};
pub use update::{update_subnet_data, UpdateOutcome};

// Prelude for convenient imports
pub mod prelude {
  pub use crate::{
    BatchConfig, BatchProcessor, DataLoader, LoaderConfig, LoaderContext, LoaderError, LoaderResult, ProcessState,
    ProcessTracker,
  };
}
