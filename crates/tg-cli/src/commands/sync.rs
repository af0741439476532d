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

use tg_loaders::FrontendSync;

#[derive(Args, Debug)]
pub struct SyncArgs {
  /// Merged snapshot CSV
  #[arg(short, long, default_value = "results/merged_subnet_data.csv")]
  pub input: PathBuf,

  /// Frontend JSON to overwrite
  #[arg(short, long, default_value = "../frontend/public/subnets_frontend_ready.json")]
  pub output: PathBuf,

  /// Where the timestamped backup goes
  #[arg(short, long, default_value = "results")]
  pub results_dir: PathBuf,
}

pub fn execute(args: SyncArgs) -> Result<()> {
  let summary = FrontendSync::new(&args.input, &args.output, &args.results_dir)
    .run()
    .with_context(|| format!("Frontend sync from {} failed", args.input.display()))?;

  println!("\nSync Summary:");
  println!("   Total Subnets: {}", summary.total_subnets);
  println!("   Active Subnets: {}", summary.active_subnets);
  println!("   Categories: {}", summary.categories);
  println!("   Total Market Cap: {:.2}", summary.total_market_cap);
  println!("   Output: {}", summary.output.display());
  println!("   Backup: {}", summary.backup.display());
  Ok(())
}
