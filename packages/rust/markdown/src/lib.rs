//! Catalog document model: typed row parsing, the row merge engine, and the
//! coverage block renderer.
//!
//! The document is kept as a list of lines so that everything outside the
//! catalog section and the coverage block round-trips unchanged.

mod document;
mod row;
mod summary;

pub use document::{
    BlockMarkers, BlockPlacement, CatalogDocument, Diagnostic, MergeOutcome, Solution, TableMarkers,
    TableRow, TableScan,
};
pub use row::{RowCells, RowParse, leading_id, parse_row, render_row};
pub use summary::{NOT_AVAILABLE, render_block};
