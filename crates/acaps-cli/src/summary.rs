use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use acaps_output::WrittenDataset;
use acaps_transform::JoinReport;

use crate::pipeline::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Workbook: {}", result.workbook.display());
    println!("Output: {}", result.processed.export.dir.display());
    println!("{}", summary_table(result));
}

/// Build the run summary table.
pub fn summary_table(result: &RunResult) -> Table {
    let measures = &result.measures;
    let processed = &result.processed;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Records"),
        header_cell("Unmatched"),
        header_cell("Details"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    table.add_row(vec![
        name_cell("Measures"),
        Cell::new(measures.records),
        dim_cell("-"),
        Cell::new(format!(
            "{} rows read, {} without region, {} undated",
            measures.rows_read, measures.dropped_without_region, measures.undated
        )),
    ]);
    table.add_row(vec![
        name_cell("Aggregates"),
        Cell::new(processed.aggregates),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        name_cell("Geography"),
        Cell::new(processed.geography_features),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table.add_row(output_row(
        "Detail",
        &processed.export.detail,
        &processed.detail_join,
    ));
    table.add_row(output_row(
        "Summary",
        &processed.export.summary,
        &processed.summary_join,
    ));
    table
}

fn output_row(name: &str, written: &WrittenDataset, join: &JoinReport) -> Vec<Cell> {
    vec![
        name_cell(name),
        Cell::new(written.records).add_attribute(Attribute::Bold),
        count_cell(join.unmatched_right),
        path_cell(&written.path),
    ]
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn name_cell(name: &str) -> Cell {
    Cell::new(name).add_attribute(Attribute::Bold)
}

fn path_cell(path: &Path) -> Cell {
    Cell::new(path.display()).fg(Color::Green)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
