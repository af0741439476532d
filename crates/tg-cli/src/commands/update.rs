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

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use tg_client::TaostatsClient;
use tg_core::Config;
use tg_loaders::{update_subnet_data, LoaderConfig, LoaderContext, ProcessTracker};

#[derive(Args, Debug)]
pub struct UpdateArgs {
  /// Where the merged snapshot is written
  #[arg(short, long, default_value = "results")]
  pub results_dir: PathBuf,

  /// Skip the dated copy under `daily/`
  #[arg(long)]
  pub no_daily: bool,
}

pub async fn execute(args: UpdateArgs, config: Config) -> Result<()> {
  let client = Arc::new(TaostatsClient::new(&config).context("Failed to create Taostats client")?);
  let tracker = ProcessTracker::new();
  let context = LoaderContext::new(client, LoaderConfig::default()).with_process_tracker(tracker.clone());

  let outcome = update_subnet_data(&context, &args.results_dir, !args.no_daily)
    .await
    .context("Subnet data update failed")?;
  let summary = &outcome.summary;

  println!("\nSubnet Data Summary:");
  println!("   Total subnets:   {}", summary.total_subnets);
  println!("   Active subnets:  {}", summary.active_subnets);
  println!("   Total emission:  {:.4}", summary.total_emission);
  println!("   Market cap:      {:.2} TAO", summary.total_market_cap);
  println!("   24h volume:      {:.2} TAO", summary.total_volume_24hr);
  if let Some(registration) = &summary.registration {
    println!(
      "   Registration:    oldest {} days, newest {} days, average {:.1}",
      registration.oldest_days, registration.newest_days, registration.average_days
    );
  }

  println!("\nTop subnets by emission:");
  for row in summary.top_by_emission.iter().take(5) {
    println!("   SN{:<4} {:<30} {:.4}%", row.subnet_id, row.subnet_name, row.value);
  }

  println!("\nFiles:");
  println!("   {}", outcome.latest.csv.display());
  println!("   {}", outcome.latest.json.display());
  if let Some(daily) = &outcome.daily {
    println!("   {}", daily.csv.display());
  }

  for process in tracker.get_all().await {
    let elapsed = process.duration().map(|d| d.num_milliseconds()).unwrap_or_default();
    println!("   {:<16} {:?} in {} ms", process.process_name, process.state, elapsed);
  }

  Ok(())
}
