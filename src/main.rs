use clap::Parser;
use log::{debug, LevelFilter};

mod args;
mod survey;

fn main() {
    let args = args::Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();
    debug!("main: args: {:?}", args);

    if let Err(e) = survey::run(&args) {
        eprintln!("Error: {}", e);
        let mut last = e.to_string();
        let mut cause = std::error::Error::source(&e);
        while let Some(c) = cause {
            let msg = c.to_string();
            if msg != last {
                eprintln!("  caused by: {}", msg);
            }
            last = msg;
            cause = c.source();
        }
        std::process::exit(1);
    }
}
