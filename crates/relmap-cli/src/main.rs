//! relmap command-line compiler
//!
//! Compiles a JSON mapping document into a relational persistence model.

mod formatter;

use clap::Parser;
use formatter::OutputFormat;
use relmap_core::{load_persistence_model, MappingDocument, StorageConfiguration};
use std::path::PathBuf;
use tracing::info;

/// relmap command-line compiler
#[derive(Parser, Debug)]
#[command(name = "relmap")]
#[command(version, about = "Compile class mappings into tables, views and constraints")]
pub struct Args {
    /// Mapping document (JSON)
    #[arg(short, long)]
    pub mapping: PathBuf,

    /// Storage configuration (JSON); built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "summary", value_enum)]
    pub format: OutputFormat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("relmap_cli=info,relmap_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let output = compile(&args)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, output)?;
            info!(path = %path.display(), format = %args.format, "Wrote compiled model");
        }
        None => println!("{}", output),
    }

    Ok(())
}

/// Load the inputs, compile them and render the model.
fn compile(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => StorageConfiguration::from_path(path)?,
        None => StorageConfiguration::default(),
    };
    let graph = MappingDocument::from_path(&args.mapping)?.into_graph()?;
    let model = load_persistence_model(&graph, &config)?;

    info!(
        classes = graph.class_count(),
        entities = model.entity_count(),
        tables = model.table_names().len(),
        "Compiled mapping"
    );

    let formatter = formatter::create_formatter(args.format);
    Ok(formatter.format_model(&graph, &model)?)
}
