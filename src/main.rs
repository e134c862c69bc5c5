use clap::Parser;
use env_logger::Env;
use log::LevelFilter;
use snafu::ErrorCompat;

mod args;
mod survey;

fn main() {
    let args = args::Args::parse();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = survey::run(&args) {
        for (idx, err) in ErrorCompat::iter_chain(&e).enumerate() {
            if idx == 0 {
                eprintln!("An error occurred: {}", err);
            } else {
                eprintln!("  caused by: {}", err);
            }
        }
        std::process::exit(1);
    }
}
