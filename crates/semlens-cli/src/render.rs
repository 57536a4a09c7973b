//! Table rendering for terminal output.

use anyhow::{Result, bail};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use semlens_model::{ColumnMapping, MappingIssue, SemanticSchema, Severity};
use semlens_transform::ColumnProfile;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// One row per schema; required roles are marked with `*`.
pub fn schema_table(schemas: &[SemanticSchema]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Schema"),
        header_cell("Type"),
        header_cell("Roles"),
    ]);
    apply_table_style(&mut table);
    for schema in schemas {
        let roles = schema
            .roles
            .iter()
            .map(|role| {
                if role.required {
                    format!("{}*", role.id)
                } else {
                    role.id.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&schema.id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(schema.data_type),
            Cell::new(roles),
        ]);
    }
    table
}

pub fn profile_table(profiles: &[ColumnProfile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Filled"),
        header_cell("Unique"),
        header_cell("Top value"),
        header_cell("Quality"),
        header_cell("Issues"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    for profile in profiles {
        let top = profile
            .top_values
            .first()
            .map(|top| format!("{} ({})", top.value, top.count));
        let worst = profile
            .quality_issues
            .iter()
            .map(|issue| issue.severity)
            .max();
        let issues = profile
            .quality_issues
            .iter()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        table.add_row(vec![
            Cell::new(&profile.display_name),
            Cell::new(profile.data_type.as_str()),
            Cell::new(format!("{:.0}%", profile.completeness() * 100.0)),
            Cell::new(profile.unique_count),
            top.map_or_else(|| dim_cell("-"), Cell::new),
            quality_cell(profile.quality_score),
            match worst {
                Some(severity) => Cell::new(issues).fg(severity_color(severity)),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

/// Mapping problems found when a bundle was added.
pub fn mapping_issue_table(issues: &[MappingIssue]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Severity"), header_cell("Issue")]);
    apply_table_style(&mut table);
    for issue in issues {
        let severity = issue.severity();
        table.add_row(vec![
            Cell::new(severity).fg(severity_color(severity)),
            Cell::new(issue.message()),
        ]);
    }
    table
}

/// Parse a `COLUMN=ROLE` argument.
pub fn parse_mapping(arg: &str) -> Result<ColumnMapping> {
    let Some((column, role)) = arg.split_once('=') else {
        bail!("invalid mapping '{arg}': expected COLUMN=ROLE");
    };
    let (column, role) = (column.trim(), role.trim());
    if column.is_empty() || role.is_empty() {
        bail!("invalid mapping '{arg}': column and role must not be empty");
    }
    Ok(ColumnMapping::new(column, role))
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn quality_cell(score: u8) -> Cell {
    let color = match score {
        80.. => Color::Green,
        50..80 => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(score).fg(color)
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::DarkGrey,
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
