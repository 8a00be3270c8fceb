use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Render drawing scripts to PDF and inspect the results.
#[derive(Debug, Parser)]
#[command(name = "pdfscribe", about, version)]
pub struct Cli {
    /// Log lifecycle events to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a JSON drawing script and write the resulting PDF
    Render {
        /// Path to the JSON script
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Output PDF; pages are appended if it already exists
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// PDF header version for new files
        #[arg(long, default_value = "1.7")]
        pdf_version: String,

        /// Write uncompressed streams
        #[arg(long)]
        no_compress: bool,
    },

    /// Show page sizes, document info and outlines of a PDF
    Info {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Measure a string in one of the standard fonts
    Width {
        /// Text to measure
        text: String,

        /// Standard font name (e.g. 'Courier', 'Times-BoldItalic')
        #[arg(long, default_value = "Helvetica")]
        font: String,

        /// Font size in points
        #[arg(long, default_value_t = 12.0)]
        size: f64,
    },
}

/// Output format for `info`.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON object
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_render_with_defaults() {
        let cli = Cli::parse_from(["pdfscribe", "render", "script.json", "-o", "out.pdf"]);
        match cli.command {
            Commands::Render {
                script,
                output,
                pdf_version,
                no_compress,
            } => {
                assert_eq!(script, PathBuf::from("script.json"));
                assert_eq!(output, PathBuf::from("out.pdf"));
                assert_eq!(pdf_version, "1.7");
                assert!(!no_compress);
            }
            _ => panic!("expected Render subcommand"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn render_requires_output() {
        assert!(Cli::try_parse_from(["pdfscribe", "render", "script.json"]).is_err());
    }

    #[test]
    fn parse_info_json() {
        let cli = Cli::parse_from(["pdfscribe", "info", "doc.pdf", "--format", "json", "-v"]);
        match cli.command {
            Commands::Info { file, format } => {
                assert_eq!(file, PathBuf::from("doc.pdf"));
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected Info subcommand"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn parse_width_defaults() {
        let cli = Cli::parse_from(["pdfscribe", "width", "Hello"]);
        match cli.command {
            Commands::Width { text, font, size } => {
                assert_eq!(text, "Hello");
                assert_eq!(font, "Helvetica");
                assert_eq!(size, 12.0);
            }
            _ => panic!("expected Width subcommand"),
        }
    }

    #[test]
    fn invalid_format_rejected() {
        let result = Cli::try_parse_from(["pdfscribe", "info", "doc.pdf", "--format", "xml"]);
        assert!(result.is_err());
    }
}
