//! Prints the four demonstrations to stdout.

use std::env;
use std::io::{self, Write};

use log::info;

use unsafe_tour::{run_tour, TourConfig};

fn main() -> io::Result<()> {
    if env::var("UNSAFE_TOUR_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("UNSAFE_TOUR_LOG")
            .write_style("UNSAFE_TOUR_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    let config = TourConfig::from_env();
    info!("starting tour with {config:?}");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_tour(&mut out, &config)?;
    out.flush()
}
