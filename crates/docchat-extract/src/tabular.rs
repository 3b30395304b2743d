use crate::error::{ExtractError, Result};

/// Parses UTF-8 CSV bytes (first row is the header) and renders them as a
/// fixed-width text table without a row-index column.
pub fn extract_csv_text(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|e| ExtractError::Encoding(e.to_string()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(ExtractError::Csv("No columns to parse from file".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "Parsed CSV document");

    Ok(render_table(&headers, &rows))
}

/// Right-aligns every cell to its column's widest value and separates columns
/// with two spaces. Widths count characters, not bytes.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line(headers, &widths));
    for row in rows {
        lines.push(render_line(row, &widths));
    }
    lines.join("\n")
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let csv = b"name,qty\nwidget,3\nbolt,120\n";
        let table = extract_csv_text(csv).unwrap();

        let expected = "  name  qty\nwidget    3\n  bolt  120";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_contains_every_cell_and_no_index() {
        let csv = b"city,population,country\nOslo,709000,Norway\nLima,10000000,Peru\n";
        let table = extract_csv_text(csv).unwrap();

        for cell in ["city", "population", "country", "Oslo", "709000", "Norway", "Lima", "10000000", "Peru"] {
            assert!(table.contains(cell), "missing {cell} in:\n{table}");
        }

        // Rows start with the first column's value, not a 0/1 row index.
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim_start().starts_with("Oslo"));
        assert!(lines[2].trim_start().starts_with("Lima"));
    }

    #[test]
    fn test_header_only() {
        let table = extract_csv_text(b"a,b,c\n").unwrap();
        assert_eq!(table, "a  b  c");
    }

    #[test]
    fn test_quoted_fields() {
        let table = extract_csv_text(b"label,note\nx,\"hello, world\"\n").unwrap();
        assert!(table.contains("hello, world"));
    }

    #[test]
    fn test_wide_characters_count_as_one() {
        let table = extract_csv_text("k,v\nÅse,ü\n".as_bytes()).unwrap();
        assert_eq!(table, "  k  v\nÅse  ü");
    }

    #[test]
    fn test_empty_file() {
        let err = extract_csv_text(b"").unwrap_err();
        assert!(err.to_string().contains("No columns to parse from file"));
    }

    #[test]
    fn test_ragged_rows() {
        let err = extract_csv_text(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, ExtractError::Csv(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = extract_csv_text(&[0x61, 0x2c, 0xff, 0xfe, 0x0a]).unwrap_err();
        assert!(matches!(err, ExtractError::Encoding(_)));
        assert!(err.to_string().starts_with("Error extracting CSV text: "));
    }
}
