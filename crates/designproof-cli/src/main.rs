mod args;
mod cmd;
mod logging;
mod output;

use clap::Parser;

fn main() {
    let cli = args::Cli::parse();
    logging::init(cli.verbose);
    output::init(cli.json);

    if let Err(e) = cmd::dispatch(&cli) {
        output::eprintln_line(&format!("error: certificate issuance failed: {e:#}"));
        std::process::exit(1);
    }
}
