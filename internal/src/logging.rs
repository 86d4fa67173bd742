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

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// human readable events on stderr, filtered by `RUST_LOG` (default `info`). With a logfile the
/// events are also written there as json lines; the returned guard flushes the file on drop.
pub fn init_logging(logfile: Option<impl AsRef<Path>>) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_log = fmt::layer().with_writer(std::io::stderr);

    let (json_log, flush_guard) = match logfile {
        Some(path) => {
            let path = path.as_ref();
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("could not open log file {}", path.display()))?;
            let (writer, guard) = NonBlockingBuilder::default().lossy(false).finish(file);
            let json_log = fmt::layer()
                .json()
                .with_span_list(true)
                .with_current_span(false)
                .with_writer(writer);
            (Some(json_log), Some(guard))
        }
        None => (None, None),
    };

    registry()
        .with(env_filter)
        .with(stderr_log)
        .with(json_log)
        .try_init()
        .context("could not install the log subscriber")?;
    Ok(flush_guard)
}
