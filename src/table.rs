//! Plain-text rendering of small tables for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Renders `headers` and `rows` as space-separated columns with a dashed rule
/// under the header. Cells beyond the header count are ignored; `align` may
/// be shorter than the header, in which case missing entries are `Left`.
pub fn render_table(headers: &[String], rows: &[Vec<String>], align: &[Align]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| char_width(h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(char_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", render_line(headers, &widths, &[]));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", render_line(&rule, &widths, &[]));
    for row in rows {
        let _ = writeln!(output, "{}", render_line(row, &widths, align));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>], align: &[Align]) {
    print!("{}", render_table(headers, rows, align));
}

fn render_line(values: &[String], widths: &[usize], align: &[Align]) -> String {
    let mut line = String::new();
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let cell = values.get(idx).map(|v| flatten(v)).unwrap_or_default();
        let padding = width.saturating_sub(char_width(&cell));
        match align.get(idx).copied().unwrap_or_default() {
            Align::Left => {
                line.push_str(&cell);
                line.extend(std::iter::repeat_n(' ', padding));
            }
            Align::Right => {
                line.extend(std::iter::repeat_n(' ', padding));
                line.push_str(&cell);
            }
        }
    }
    line.truncate(line.trim_end().len());
    line
}

fn char_width(value: &str) -> usize {
    value.chars().count()
}

/// Line breaks and tabs inside a cell would break the layout.
fn flatten(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn render_table_pads_and_aligns_columns() {
        let headers = strings(&["name", "n"]);
        let rows = vec![strings(&["ab", "7"]), strings(&["c", "123"])];
        let rendered = render_table(&headers, &rows, &[Align::Left, Align::Right]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "name  n");
        assert_eq!(lines[1], "----  ---");
        assert_eq!(lines[2], "ab      7");
        assert_eq!(lines[3], "c     123");
    }

    #[test]
    fn render_table_flattens_embedded_newlines() {
        let headers = strings(&["note"]);
        let rows = vec![strings(&["a\nb"])];
        let rendered = render_table(&headers, &rows, &[]);
        assert!(rendered.lines().any(|line| line == "a b"));
    }

    #[test]
    fn short_rows_render_blank_cells() {
        let headers = strings(&["a", "b"]);
        let rows = vec![strings(&["x"])];
        let rendered = render_table(&headers, &rows, &[]);
        assert_eq!(rendered.lines().nth(2), Some("x"));
    }
}
