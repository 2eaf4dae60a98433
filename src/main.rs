use std::env;
use std::process;

use crsplit::{cli, logging};

fn main() {
    logging::init();
    let args: Vec<String> = env::args().collect();
    process::exit(cli::run_with_args(&args));
}
