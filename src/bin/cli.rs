// src/bin/cli.rs
use gas_scrape::cli;

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("Warning: {e}");
    }
    if let Err(e) = cli::run() {
        let code = e.exit_code();
        eprintln!("Error: {:?}", color_eyre::eyre::Report::new(e));
        std::process::exit(code);
    }
}
