//! CSV report helpers.

use csv::WriterBuilder;

fn needs_formula_guard(value: &str) -> bool {
    matches!(value.chars().next(), Some('=' | '+' | '-' | '@'))
}

/// Prefixes cells that a spreadsheet would evaluate as a formula.
pub fn guard_cell(value: &str) -> String {
    if needs_formula_guard(value) {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

/// Renders a header row plus data rows into a CSV document.
pub fn render_csv(header: &[&str], rows: &[Vec<String>]) -> anyhow::Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row.iter().map(|cell| guard_cell(cell)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_cell_prefixes_formula_like_values() {
        assert_eq!(guard_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(guard_cell("@cmd"), "'@cmd");
        assert_eq!(guard_cell("TRK-001"), "TRK-001");
    }

    #[test]
    fn render_csv_quotes_commas_and_guards_cells() {
        let csv = render_csv(
            &["plate", "model"],
            &[vec!["-AB1".to_string(), "Volvo, FH16".to_string()]],
        )
        .expect("render");
        assert_eq!(csv, "plate,model\n'-AB1,\"Volvo, FH16\"\n");
    }
}
