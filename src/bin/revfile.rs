use std::io::{self, BufWriter};
use std::process::ExitCode;

use fskit::cli::{self, RevArgs};
use fskit::core::telemetry::logging::init_logging;
use fskit::services::fs::reverse::reverse_file;

fn main() -> ExitCode {
    let args: RevArgs = cli::parse_or_exit();
    init_logging(args.common.verbose);
    args.log_params();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    cli::finish(reverse_file(&args.input, &mut out))
}
