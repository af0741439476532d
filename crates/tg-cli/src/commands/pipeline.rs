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

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

use tg_core::Config;
use tg_loaders::pipeline::{PipelineConfig, SubnetPipeline};

#[derive(Args, Debug)]
pub struct PipelineArgs {
  /// Comma-separated netuids to analyze (default: every subnet)
  #[arg(short, long, value_delimiter = ',')]
  pub subnets: Option<Vec<i64>>,

  /// Directory for phase snapshots and the final dataset
  #[arg(short, long, default_value = "pipeline_output")]
  pub output_dir: PathBuf,

  /// Subnets scraped or researched at once
  #[arg(long, default_value_t = 3)]
  pub max_concurrent: usize,

  /// Show progress bars
  #[arg(long)]
  pub progress: bool,

  /// Print the full run report as JSON
  #[arg(long)]
  pub json: bool,
}

pub async fn execute(args: PipelineArgs, config: Config) -> Result<()> {
  let pipeline_config = PipelineConfig {
    output_dir: args.output_dir,
    max_concurrent: args.max_concurrent,
    target_netuids: args.subnets,
    show_progress: args.progress,
  };
  let pipeline = SubnetPipeline::from_config(&config, pipeline_config).context("Failed to set up pipeline")?;

  let report = pipeline.run().await;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  }

  if !report.is_success() {
    bail!("Pipeline failed: {}", report.error.unwrap_or_default());
  }

  println!("\nPipeline Summary:");
  if let Some(summary) = &report.summary {
    println!("   Subnets processed: {}", summary.total_subnets_processed);
    println!("   Research ready:    {}", summary.research_ready_subnets);
    println!("   With GitHub:       {}", summary.subnets_with_github);
    println!("   Avg source health: {:.1}", summary.average_source_health);
    println!("   Errors:            {}", summary.pipeline_errors);
    println!("   Execution time:    {}", summary.execution_time);
  }
  if let Some(path) = &report.final_dataset_path {
    println!("   Final dataset:     {}", path.display());
  }
  for error in &report.run_state.errors {
    println!("   ! {}", error);
  }

  Ok(())
}
