//! Output formatters for compiled models.

use clap::ValueEnum;
use comfy_table::Table;
use relmap_core::{Error, MappingGraph, PersistenceModel};

/// Output format for the compiled model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The full model as pretty JSON
    Json,
    /// One table row per entity
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Trait for formatting a compiled model.
pub trait Formatter {
    /// Format the model compiled from `graph`.
    fn format_model(&self, graph: &MappingGraph, model: &PersistenceModel) -> Result<String, Error>;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Summary => Box::new(SummaryFormatter),
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_model(&self, _graph: &MappingGraph, model: &PersistenceModel) -> Result<String, Error> {
        model.to_json_string()
    }
}

/// Summary formatter using comfy-table.
pub struct SummaryFormatter;

impl Formatter for SummaryFormatter {
    fn format_model(&self, graph: &MappingGraph, model: &PersistenceModel) -> Result<String, Error> {
        let mut table = Table::new();
        table.set_header(vec!["Class", "Kind", "View", "Storage", "Provider", "Columns"]);

        for class in graph.classes() {
            let Some(entity) = model.entity(class.handle()) else {
                continue;
            };

            let storage = model
                .backing_tables(entity)
                .iter()
                .filter_map(|t| t.table_name())
                .map(|name| name.to_string())
                .collect::<Vec<_>>()
                .join(", ");

            // Unsupported properties make the column count unknown.
            let columns = match entity.columns() {
                Ok(columns) => columns.len().to_string(),
                Err(_) => "unsupported".to_string(),
            };

            table.add_row(vec![
                class.id().to_string(),
                entity.kind().to_string(),
                entity.view_name().to_string(),
                storage,
                entity.storage_provider_id().to_string(),
                columns,
            ]);
        }

        Ok(table.to_string())
    }
}
