mod cli;
mod info_cmd;
mod render_cmd;
mod script;
mod width_cmd;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::prelude::*;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        cli::Commands::Render {
            ref script,
            ref output,
            ref pdf_version,
            no_compress,
        } => render_cmd::run(script, output, pdf_version, no_compress),
        cli::Commands::Info {
            ref file,
            ref format,
        } => info_cmd::run(file, format),
        cli::Commands::Width {
            ref text,
            ref font,
            size,
        } => width_cmd::run(text, font, size),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
