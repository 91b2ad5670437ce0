pub mod export;
pub mod types;

pub use export::{export_csv, export_json, export_results, export_text};
pub use types::ExportFormat;
