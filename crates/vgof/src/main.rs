mod cli;

use clap::Parser;
use log::{error, info, warn};
use vgof_core::{Kernel, KernelResult};

use crate::cli::CliArgs;

fn init_logging(args: &CliArgs) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = &args.log_level {
        builder.parse_filters(level);
    }
    builder.init();
}

fn run(args: &CliArgs) -> KernelResult<()> {
    let config = args.kernel_config()?;
    let mut kernel = Kernel::new(config)?;

    let report = kernel.boot()?;
    if !report.is_complete() {
        warn!(
            "{} module(s) were never started: {}",
            report.unsatisfied.len(),
            report.unsatisfied.join(", ")
        );
    }

    kernel.start()
}

fn main() {
    let args = CliArgs::parse();
    init_logging(&args);

    match run(&args) {
        Ok(()) => info!("Shutting down."),
        Err(e) => {
            error!("{}", e);
            eprintln!("Fatal: {}", e);
            std::process::exit(1);
        }
    }
}
