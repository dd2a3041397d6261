use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Render a fixed-width table. Columns that hold nothing but numbers
/// (points, totals, percentages) are right-aligned so magnitudes line up.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", format_table(headers, &rows));
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    let mut numeric = vec![!rows.is_empty(); cols];
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(cell.len());
            if !cell.is_empty() && !is_numeric(cell) {
                numeric[i] = false;
            }
        }
    }

    let mut out = String::new();
    render_line(&mut out, headers.iter().map(|h| *h), &widths, &numeric);
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&sep.join("  "));
    out.push('\n');
    for row in rows {
        render_line(&mut out, row.iter().map(|c| c.as_str()), &widths, &numeric);
    }
    out
}

fn render_line<'a>(
    out: &mut String,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
    numeric: &[bool],
) {
    let rendered: Vec<String> = cells
        .enumerate()
        .map(|(i, cell)| {
            let w = widths.get(i).copied().unwrap_or(0);
            if numeric.get(i).copied().unwrap_or(false) {
                format!("{:>w$}", cell, w = w)
            } else {
                format!("{:w$}", cell, w = w)
            }
        })
        .collect();
    let mut line = rendered.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    out.push_str(&line);
    out.push('\n');
}

/// Numeric for alignment purposes: plain integers, decimals, percentages
/// and "done/total" progress cells.
fn is_numeric(cell: &str) -> bool {
    let trimmed = cell.strip_suffix('%').unwrap_or(cell);
    trimmed
        .split('/')
        .all(|part| !part.is_empty() && part.parse::<f64>().is_ok())
}
