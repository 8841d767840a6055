//! typed-params binary: runs the CLI, prints any error to stderr and exits 1

use typed_params::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
