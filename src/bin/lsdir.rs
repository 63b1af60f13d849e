use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use fskit::cli::{self, ListArgs};
use fskit::core::errors::IoContext;
use fskit::core::telemetry::logging::init_logging;
use fskit::services::fs::listing::{list_dir, write_entry, OutputFormat};

fn main() -> ExitCode {
    let args: ListArgs = cli::parse_or_exit();
    init_logging(args.common.verbose);
    args.log_params();

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = list_dir(&args.directory, |entry| write_entry(&mut out, &entry, format))
        .and_then(|count| {
            out.flush().context("Error writing to standard output")?;
            tracing::debug!(entries = count, "listing finished");
            Ok(count)
        });
    cli::finish(result)
}
