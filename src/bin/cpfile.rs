use std::io::{self, Write};
use std::process::ExitCode;

use fskit::cli::{self, CopyArgs};
use fskit::core::errors::IoContext;
use fskit::core::telemetry::logging::init_logging;
use fskit::services::fs::copy::copy_file;

fn main() -> ExitCode {
    let args: CopyArgs = cli::parse_or_exit();
    init_logging(args.common.verbose);
    args.log_params();

    let verbose = args.common.verbose;
    let stdout = io::stdout();
    let result = copy_file(&args.input, &args.output, |bytes| {
        if verbose {
            writeln!(stdout.lock(), "Copied {bytes} bytes")
                .context("Error writing to standard output")?;
        }
        Ok(())
    });
    cli::finish(result)
}
