use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use content_pages::config::loader::load_config;
use content_pages::i18n::slug::path_segments;
use content_pages::PageService;

#[derive(Parser)]
#[command(name = "page-cli")]
#[command(about = "Inspect how page routes resolve against the CMS", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "CONTENT_PAGES_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the slug and language a path resolves to
    Resolve { path: String },
    /// Print the GROQ query and bound parameters for a path
    Query { path: String },
    /// Run the page query and print the document
    Fetch { path: String },
    /// Print the metadata derived for a path
    Metadata { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let service = PageService::from_config(&config)?;

    match cli.command {
        Commands::Resolve { path } => {
            let resolved = service.resolve(&path_segments(&path))?;
            print_json(&resolved)?;
        }
        Commands::Query { path } => {
            let resolved = service.resolve(&path_segments(&path))?;
            let query = service.queries().build(&resolved);
            println!("{}", query.query);
            print_json(&query.params)?;
        }
        Commands::Fetch { path } => {
            let (resolved, document) = service.fetch(&path_segments(&path)).await?;
            let Some(document) = document else {
                eprintln!("No page for slug '{}' (lang: {:?})", resolved.slug, resolved.lang);
                std::process::exit(1);
            };
            print_json(&document)?;
        }
        Commands::Metadata { path } => match service.generate_metadata(&path_segments(&path)).await {
            Ok(meta) => print_json(&meta)?,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
