use std::process::ExitCode;

use clap::Parser;
use smartcart_cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match smartcart_cli::run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
