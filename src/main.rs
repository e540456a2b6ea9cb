use clap::Parser;
use filedock::cli::{Args, run_cli};
use filedock::logging::init_logger;

fn main() {
    let args = Args::parse();
    let _guard = init_logger(&args.log_file, args.verbose);

    let options = args.options();
    if let Err(e) = run_cli(args.command, &options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
