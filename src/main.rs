//! # Labsheet CLI
//!
//! Command-line interface for laboratory report templates.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the HTTP API
//! labsheet serve --listen 0.0.0.0:8080 --public-url https://lab.example.com
//!
//! # Start a new template from the default report layout
//! labsheet new --name "Lipid Panel" --default-layout -o lipid.json
//!
//! # Export a template
//! labsheet export lipid.json --format image -o lipid.png
//!
//! # Preview as HTML (or PNG with --png)
//! labsheet preview lipid.json --mode preview > lipid.html
//!
//! # Build a template from a scanned report
//! labsheet import scan.png -o scanned.json
//!
//! # List the built-in templates
//! labsheet list
//! ```

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use labsheet::{
    LabsheetError, TemplateDocument,
    analysis::{self, FixedLayoutAnalyzer},
    export::{self, ExportFormat, ExportOptions},
    library::TemplateLibrary,
    render::{RenderMode, html, raster},
    server::{self, ServerConfig},
    upload::Upload,
};

/// Labsheet - Laboratory report template utility
#[derive(Parser, Debug)]
#[command(name = "labsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "LABSHEET_LISTEN", default_value = "127.0.0.1:8080")]
        listen: String,

        /// Base URL used in share links
        #[arg(long, env = "LABSHEET_PUBLIC_URL", default_value = "http://localhost:8080")]
        public_url: String,
    },

    /// Write a new template
    New {
        /// Template name
        #[arg(long, default_value = "New Template")]
        name: String,

        /// Start from the default report layout instead of a blank page
        #[arg(long)]
        default_layout: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export a template file
    Export {
        /// Template JSON file
        input: PathBuf,

        /// pdf, json, image or html
        #[arg(long, default_value = "json")]
        format: ExportFormat,

        /// Leave import metadata out of JSON exports
        #[arg(long)]
        no_metadata: bool,

        /// Output file (defaults to the template name with the format's extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render a template as HTML or PNG
    Preview {
        /// Template JSON file
        input: PathBuf,

        /// edit or preview
        #[arg(long, default_value = "preview", value_parser = ["edit", "preview"])]
        mode: String,

        /// Write a PNG to this file instead of HTML
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// PNG width in pixels
        #[arg(
            long,
            default_value = "850",
            value_parser = clap::value_parser!(u32).range(raster::MIN_WIDTH as i64..=raster::MAX_WIDTH as i64)
        )]
        width: u32,

        /// HTML output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Build a template from a scanned report (PDF, JPG or PNG)
    Import {
        /// Scan to analyze
        scan: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Copy a template under a new id
    Duplicate {
        /// Template JSON file
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the built-in templates
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabsheetError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen, public_url } => {
            let config = ServerConfig {
                listen_addr: listen,
                public_url,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))
        }

        Commands::New {
            name,
            default_layout,
            output,
        } => {
            let doc = if default_layout {
                TemplateDocument {
                    id: labsheet::template::new_id(),
                    name,
                    ..TemplateDocument::default_report()
                }
            } else {
                TemplateDocument::blank(name)
            };
            write_output(output.as_deref(), export::serialize(&doc)?.as_bytes())
        }

        Commands::Export {
            input,
            format,
            no_metadata,
            output,
        } => {
            let doc = read_template(&input)?;
            let options = ExportOptions {
                file_name: None,
                include_metadata: !no_metadata,
            };
            let artifact = export::export(&doc, format, &options)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&artifact.file_name));
            std::fs::write(&path, &artifact.bytes)?;
            println!("Exported {} ({}, {} bytes)", path.display(), artifact.mime_type, artifact.bytes.len());
            Ok(())
        }

        Commands::Preview {
            input,
            mode,
            png,
            width,
            output,
        } => {
            let doc = read_template(&input)?;
            let mode = if mode == "edit" {
                RenderMode::Edit
            } else {
                RenderMode::Preview
            };
            match png {
                Some(path) => {
                    let bytes = raster::render_png(&doc, mode, width as usize)?;
                    std::fs::write(&path, bytes)?;
                    println!("Saved preview to {}", path.display());
                    Ok(())
                }
                None => write_output(output.as_deref(), html::render_page(&doc, mode).as_bytes()),
            }
        }

        Commands::Import { scan, output } => {
            let bytes = std::fs::read(&scan)?;
            let file_name = scan
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let upload = Upload::accept(file_name, None, bytes)?;
            let (doc, result) = analysis::import(&FixedLayoutAnalyzer, &upload)?;
            eprintln!(
                "Detected {} regions ({:.0}% confidence)",
                result.regions.len(),
                result.confidence * 100.0
            );
            write_output(output.as_deref(), export::serialize(&doc)?.as_bytes())
        }

        Commands::Duplicate { input, output } => {
            let doc = read_template(&input)?;
            let copy = export::duplicate(&doc)?;
            write_output(output.as_deref(), export::serialize(&copy)?.as_bytes())
        }

        Commands::List => {
            let library = TemplateLibrary::with_builtins();
            for summary in library.summaries() {
                println!(
                    "{:<4} {:<32} {:<16} {} {}{}",
                    summary.id,
                    summary.name,
                    summary.category,
                    summary.last_modified,
                    summary.element_count,
                    if summary.is_default { "  (default)" } else { "" }
                );
            }
            Ok(())
        }
    }
}

fn read_template(path: &Path) -> Result<TemplateDocument, LabsheetError> {
    let bytes = std::fs::read(path)?;
    export::deserialize(&bytes)
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), LabsheetError> {
    match path {
        Some(path) => std::fs::write(path, bytes)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview_width(width: &str) -> Result<u32, clap::Error> {
        let cli = Cli::try_parse_from(["labsheet", "preview", "report.json", "--png", "out.png", "--width", width])?;
        match cli.command {
            Commands::Preview { width, .. } => Ok(width),
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn test_preview_width_bounds() {
        assert_eq!(preview_width("200").unwrap(), 200);
        assert_eq!(preview_width("2000").unwrap(), 2000);
        for bad in ["0", "199", "2001", "4294967295", "-5"] {
            assert!(preview_width(bad).is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn test_preview_width_default() {
        let cli = Cli::try_parse_from(["labsheet", "preview", "report.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Preview { width: 850, .. }));
    }
}
