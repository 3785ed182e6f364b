//! Table formatting utilities for CLI output.

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};

/// Whether a usage row describes a rule or a data key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Rule,
    Data,
}

/// Usage status of one rule or data key in a generation run.
pub struct UsageRow {
    pub kind: UsageKind,
    /// Display name (the root rule shows as `<root>`).
    pub name: String,
    pub used: bool,
}

/// Format usage rows as a table, rules first.
pub fn format_usage_table(rows: &[UsageRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Name", "Status"]);

    for row in rows {
        let kind = match row.kind {
            UsageKind::Rule => "rule",
            UsageKind::Data => "data",
        };
        let status = if row.used {
            Cell::new("used").fg(Color::Green)
        } else {
            Cell::new("unused").fg(Color::DarkGrey)
        };
        table.add_row(vec![Cell::new(kind), Cell::new(&row.name), status]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_entry() {
        let rows = vec![
            UsageRow {
                kind: UsageKind::Rule,
                name: "<root>".to_string(),
                used: true,
            },
            UsageRow {
                kind: UsageKind::Data,
                name: "unused key".to_string(),
                used: false,
            },
        ];
        let table = format_usage_table(&rows);
        assert_eq!(table.row_count(), 2);

        let rendered = table.to_string();
        assert!(rendered.contains("<root>"));
        assert!(rendered.contains("unused key"));
    }
}
