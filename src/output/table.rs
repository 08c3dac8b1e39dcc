//! Table output for registered apps

use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::app::RegistryEntry;

/// Format registry entries as an ASCII table
pub fn format_apps(entries: &[RegistryEntry]) -> String {
    if entries.is_empty() {
        return "(no apps registered)".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        ["Name", "Path", "Created"]
            .iter()
            .map(|col| Cell::new(col).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(entry.path.display().to_string()),
            Cell::new(&entry.created),
        ]);
    }

    table.to_string()
}
