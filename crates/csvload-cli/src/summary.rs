use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use csvload_core::{FileReport, RunSummary};

pub fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Table"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("ms"),
        header_cell("Error"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for report in &summary.files {
        table.add_row(vec![
            Cell::new(report.file_name()),
            table_cell(report),
            status_cell(report),
            rows_cell(report),
            dim_cell(report.duration.as_millis()),
            error_cell(report),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!(
            "{} loaded, {} failed",
            summary.loaded().count(),
            summary.failed().count()
        ))
        .add_attribute(Attribute::Bold),
        Cell::new(summary.total_rows()).add_attribute(Attribute::Bold),
        dim_cell(summary.duration.as_millis()),
        dim_cell("-"),
    ]);
    println!("{table}");

    if !summary.skipped.is_empty() {
        println!();
        println!("Skipped (no matching table):");
        for path in &summary.skipped {
            println!("- {}", path.display());
        }
    }
}

fn table_cell(report: &FileReport) -> Cell {
    match &report.table {
        Some(table) => Cell::new(table).fg(Color::Blue),
        None => dim_cell("-"),
    }
}

fn status_cell(report: &FileReport) -> Cell {
    if report.is_success() {
        Cell::new(report.status()).fg(Color::Green)
    } else {
        Cell::new(report.status())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn rows_cell(report: &FileReport) -> Cell {
    if report.rows_loaded > 0 {
        Cell::new(report.rows_loaded)
    } else {
        dim_cell(report.rows_loaded)
    }
}

fn error_cell(report: &FileReport) -> Cell {
    match &report.error {
        Some(error) => Cell::new(error).fg(Color::Red),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Fixed(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(4)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
