#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use bcz_cli::args::{CliArgs, OutputFormat};
use bcz_cli::driver::{self, EXIT_FAILURE};
use bcz_cli::reporter::{Reporter, render_json};

#[cfg(not(target_arch = "wasm32"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    // Zero cost unless BCZ_LOG or RUST_LOG is set.
    bcz::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let summary = match driver::run(&args) {
        Ok(summary) => summary,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(EXIT_FAILURE);
        }
    };

    let report = match args.format {
        OutputFormat::Json => render_json(&summary)?,
        OutputFormat::Text => {
            let color = !args.no_color && std::io::stdout().is_terminal();
            Reporter::new(color).render_text(&summary)
        }
    };
    if !report.is_empty() {
        println!("{report}");
    }

    std::process::exit(summary.exit_code());
}
