use colored::Colorize;

const MIN_COLUMN_WIDTH: usize = 6;

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render an aligned table for string rows.
///
/// Cells wider than their column wrap onto continuation lines. Embedded
/// newlines are kept.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .flat_map(|cell| cell.lines())
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| pad(header, *width, false))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line.trim_end().to_string());
    lines.push(divider);

    for row in rows {
        let cells = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                (wrap(value, *width), looks_numeric(value))
            })
            .collect::<Vec<_>>();
        let height = cells.iter().map(|(cell, _)| cell.len()).max().unwrap_or(1);

        for line_index in 0..height {
            let line = cells
                .iter()
                .zip(widths.iter())
                .map(|((cell, numeric), width)| {
                    let text = cell.get(line_index).map_or("", String::as_str);
                    let padded = pad(text, *width, *numeric);
                    if options.color {
                        colorize(text, padded)
                    } else {
                        padded
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(line.trim_end().to_string());
        }
    }

    lines.join("\n")
}

fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    if widths.is_empty() {
        return;
    }

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;

    while total > max_width {
        let mut candidate_idx = None;
        let mut candidate_width = 0usize;
        for (idx, width) in widths.iter().enumerate() {
            let min_width = headers[idx].chars().count().max(MIN_COLUMN_WIDTH);
            if *width > min_width && *width > candidate_width {
                candidate_idx = Some(idx);
                candidate_width = *width;
            }
        }

        let Some(idx) = candidate_idx else {
            break;
        };

        widths[idx] -= 1;
        total -= 1;
    }
}

/// Word-wrap `value` to `width` columns. Words longer than a line are split.
fn wrap(value: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for paragraph in value.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                out.push(std::mem::take(&mut current));
            }
            if word_len > width {
                let chars = word.chars().collect::<Vec<_>>();
                let mut chunks = chars.chunks(width).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece = chunk.iter().collect::<String>();
                    if chunks.peek().is_some() {
                        out.push(piece);
                    } else {
                        current = piece;
                    }
                }
                continue;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(current);
    }

    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | ','))
        && trimmed.chars().any(|ch| ch.is_ascii_digit())
}

fn pad(value: &str, width: usize, numeric: bool) -> String {
    let pad = width.saturating_sub(value.chars().count());
    if numeric {
        format!("{}{value}", " ".repeat(pad))
    } else {
        format!("{value}{}", " ".repeat(pad))
    }
}

/// Highlight cells that report a missing or failed setting.
fn colorize(text: &str, padded: String) -> String {
    match text.trim().to_ascii_lowercase().as_str() {
        "(not set)" | "false" | "error" | "failed" => padded.red().to_string(),
        "true" | "ok" | "saved" => padded.green().to_string(),
        _ => padded,
    }
}
