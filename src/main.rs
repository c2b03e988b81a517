//! Command-line front end: decode a `.wasm` file and print it as WAT.
//!
//! Usage: watdump module.wasm [--json] [--hex] [--quiet]

use clap::Parser;
use env_logger::Env;
use log::debug;
use std::fs;
use std::path::PathBuf;
use std::process;

use watdump::parser;
use watdump::wat;

/// Disassemble a WebAssembly binary module into text format
#[derive(Parser, Debug)]
#[command(name = "watdump", version, about)]
struct Cli {
    /// Path to the module
    file: PathBuf,

    /// Treat the file as hex text (whitespace is ignored)
    #[arg(long)]
    hex: bool,

    /// Print the decoded module as JSON instead of WAT
    #[arg(long)]
    json: bool,

    /// Do not report the version or diagnostics on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn read_input(cli: &Cli) -> Result<Vec<u8>, String> {
    let display = cli.file.display();
    if cli.hex {
        let text = fs::read_to_string(&cli.file)
            .map_err(|e| format!("couldn't read {display}: {e}"))?;
        let digits: String = text.split_whitespace().collect();
        hex::decode(digits).map_err(|e| format!("{display} is not valid hex: {e}"))
    } else {
        fs::read(&cli.file).map_err(|e| format!("couldn't read {display}: {e}"))
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let bytes = read_input(cli)?;
    debug!("read {} bytes from {}", bytes.len(), cli.file.display());

    let module = parser::parse(&bytes)
        .map_err(|e| format!("error decoding {}: {e}", cli.file.display()))?;

    if !cli.quiet {
        eprintln!("version {}", module.version);
        for diagnostic in &module.diagnostics {
            eprintln!("warning: {diagnostic}");
        }
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&module)
            .map_err(|e| format!("error writing JSON: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", wat::format(&module));
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("error")).init();

    let cli = Cli::parse();
    if let Err(message) = run(&cli) {
        eprintln!("{message}");
        process::exit(1);
    }
}
