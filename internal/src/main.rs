// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use structopt::StructOpt;
use tracing::debug;

#[derive(Debug, StructOpt)]
#[structopt(name = "single_run", about = "routes air cargo requests by column generation")]
struct ClArgs {
    /// json instance
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// number of pricing threads (overrides the instance parameters)
    #[structopt(long, short = "t")]
    threads: Option<usize>,
    /// additionally write json log lines to this file
    #[structopt(long, parse(from_os_str))]
    log: Option<PathBuf>,
    #[structopt(long, parse(from_os_str), default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args: ClArgs = StructOpt::from_args();
    let _guard = internal::logging::init_logging(args.log.as_ref())?;
    debug!(?args);

    let file = File::open(&args.input)
        .with_context(|| format!("could not open {}", args.input.display()))?;
    let mut input_data: serde_json::Value = serde_json::from_reader(file)
        .with_context(|| format!("{} is not valid json", args.input.display()))?;
    if let Some(threads) = args.threads {
        internal::override_threads(&mut input_data, threads)?;
    }
    println!("\n---------- RUN: {} ----------", args.input.display());

    let output = internal::run(input_data)?;

    // output path with sub-directory creation
    let output_path = ensure_output_path(&args.input, &args.output_dir)?;
    let file = File::create(&output_path)
        .with_context(|| format!("could not create {}", output_path.display()))?;
    serde_json::to_writer_pretty(file, &output).context("could not write the output")?;
    println!("output written to {}", output_path.display());
    Ok(())
}

fn ensure_output_path(input_path: &Path, output_dir: &Path) -> anyhow::Result<PathBuf> {
    let file_name = input_path
        .file_name()
        .with_context(|| format!("{} has no file name", input_path.display()))?
        .to_string_lossy();
    let output_path = output_dir.join(format!("output_{}", file_name));
    fs::create_dir_all(output_dir)
        .with_context(|| format!("could not create {}", output_dir.display()))?;
    Ok(output_path)
}
