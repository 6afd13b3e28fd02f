//! Command-line front end for CAS/UN extraction
//!
//! ```text
//! snapchem-identifiers extract "Acetone CAS 67-64-1 UN1090"
//! echo "UN 2014" | snapchem-identifiers extract --all
//! snapchem-identifiers validate 7732-18-5
//! ```

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use snapchem_identifiers::{extract, extract_all, is_valid_cas, is_valid_un};

#[derive(Parser)]
#[command(name = "snapchem-identifiers", version, about = "Extract and validate CAS and UN numbers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract identifiers from TEXT (or stdin) and print them as JSON
    Extract {
        text: Option<String>,
        /// Print every occurrence with its byte span
        #[arg(long)]
        all: bool,
    },
    /// Check whether ID is a valid CAS or UN number
    Validate { id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { text, all } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                        eprintln!("failed to read stdin: {}", e);
                        return ExitCode::FAILURE;
                    }
                    buf
                }
            };

            let json = if all {
                serde_json::to_string_pretty(&extract_all(&text))
            } else {
                serde_json::to_string_pretty(&extract(&text))
            };

            match json {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("failed to encode result: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Validate { id } => {
            let id = id.trim();
            if is_valid_cas(id) {
                println!("{}: valid CAS number", id);
                ExitCode::SUCCESS
            } else if is_valid_un(id) {
                println!("{}: valid UN number", id);
                ExitCode::SUCCESS
            } else {
                println!("{}: not a valid CAS or UN number", id);
                ExitCode::FAILURE
            }
        }
    }
}
