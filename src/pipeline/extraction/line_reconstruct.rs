// Geometric line reconstruction for digital PDF text layers.
// Text extractors emit runs in drawing order; result and reference columns
// often arrive as separate runs at the same height. Grouping by y and
// sorting by x recovers the visual rows, and wide x gaps become columns.

use super::types::{PositionedToken, ReconstructedLine, TokenPage, COLUMN_BREAK};

/// A row under construction: anchor height plus member tokens.
struct Row<'a> {
    y: f64,
    tokens: Vec<&'a PositionedToken>,
}

/// Rebuild the visual lines of one page.
///
/// A token joins the nearest row whose anchor lies within `row_tolerance`,
/// otherwise it opens a new row. Rows are emitted top to bottom (descending
/// y), tokens left to right. Consecutive tokens whose x positions differ by
/// more than `column_gap` are separated by [`COLUMN_BREAK`], others by a
/// single space. Blank tokens and lines are skipped.
pub fn reconstruct_lines(
    page_number: usize,
    tokens: &[PositionedToken],
    row_tolerance: f64,
    column_gap: f64,
) -> Vec<ReconstructedLine> {
    let mut rows: Vec<Row<'_>> = Vec::new();

    for token in tokens {
        if token.text.trim().is_empty() || !token.x.is_finite() || !token.y.is_finite() {
            continue;
        }
        let nearest = rows
            .iter_mut()
            .map(|row| ((row.y - token.y).abs(), row))
            .filter(|(distance, _)| *distance <= row_tolerance)
            .min_by(|a, b| a.0.total_cmp(&b.0));

        match nearest {
            Some((_, row)) => row.tokens.push(token),
            None => rows.push(Row {
                y: token.y,
                tokens: vec![token],
            }),
        }
    }

    rows.sort_by(|a, b| b.y.total_cmp(&a.y));

    rows.into_iter()
        .filter_map(|mut row| {
            row.tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
            let text = join_row(&row.tokens, column_gap);
            (!text.is_empty()).then(|| ReconstructedLine::new(page_number, text))
        })
        .collect()
}

/// Reconstruct every page, in page order.
pub fn reconstruct_pages(
    pages: &[TokenPage],
    row_tolerance: f64,
    column_gap: f64,
) -> Vec<ReconstructedLine> {
    let mut ordered: Vec<&TokenPage> = pages.iter().collect();
    ordered.sort_by_key(|p| p.page_number);

    let lines: Vec<ReconstructedLine> = ordered
        .into_iter()
        .flat_map(|page| {
            reconstruct_lines(page.page_number, &page.tokens, row_tolerance, column_gap)
        })
        .collect();

    tracing::debug!(
        pages = pages.len(),
        lines = lines.len(),
        "Reconstructed lines from positioned tokens"
    );
    lines
}

fn join_row(tokens: &[&PositionedToken], column_gap: f64) -> String {
    let mut cells: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut last_x: Option<f64> = None;

    for token in tokens {
        let text = collapse_spaces(&token.text);
        if let Some(prev) = last_x {
            if token.x - prev > column_gap {
                cells.push(std::mem::take(&mut current));
            } else if !current.is_empty() {
                current.push(' ');
            }
        }
        current.push_str(&text);
        last_x = Some(token.x);
    }
    cells.push(current);

    cells
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(&COLUMN_BREAK.to_string())
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str, x: f64, y: f64) -> PositionedToken {
        PositionedToken::new(text, x, y)
    }

    #[test]
    fn groups_rows_and_orders_top_to_bottom() {
        let tokens = vec![
            tok("Potássio", 40.0, 680.0),
            tok("Sódio", 40.0, 700.0),
            tok("4,7", 70.0, 680.5),
            tok("140", 70.0, 699.2),
        ];
        let lines = reconstruct_lines(1, &tokens, 2.0, 40.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Sódio 140");
        assert_eq!(lines[1].text, "Potássio 4,7");
    }

    #[test]
    fn wide_gap_becomes_column_break() {
        let tokens = vec![
            tok("136 a 145", 400.0, 500.0),
            tok("Sódio", 40.0, 500.0),
            tok("140 mmol/L", 200.0, 500.3),
        ];
        let lines = reconstruct_lines(1, &tokens, 2.0, 40.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Sódio\t140 mmol/L\t136 a 145");
        assert_eq!(lines[0].columns(), vec!["Sódio", "140 mmol/L", "136 a 145"]);
    }

    #[test]
    fn token_joins_nearest_row_within_tolerance() {
        let tokens = vec![
            tok("A", 10.0, 100.0),
            tok("B", 10.0, 103.0),
            tok("b2", 30.0, 101.8),
        ];
        let lines = reconstruct_lines(1, &tokens, 2.0, 40.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "B b2");
        assert_eq!(lines[1].text, "A");
    }

    #[test]
    fn tokens_outside_tolerance_start_new_rows() {
        let tokens = vec![tok("um", 10.0, 100.0), tok("dois", 20.0, 97.0)];
        let lines = reconstruct_lines(1, &tokens, 2.0, 40.0);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn blank_tokens_and_whitespace_are_collapsed() {
        let tokens = vec![
            tok("  Hemoglobina  ", 10.0, 50.0),
            tok("   ", 20.0, 50.0),
            tok("13,5   g/dL", 30.0, 50.0),
        ];
        let lines = reconstruct_lines(3, &tokens, 2.0, 40.0);
        assert_eq!(lines[0].text, "Hemoglobina 13,5 g/dL");
        assert_eq!(lines[0].page_number, 3);
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(reconstruct_lines(1, &[], 2.0, 40.0).is_empty());
    }

    #[test]
    fn pages_are_emitted_in_page_order() {
        let pages = vec![
            TokenPage {
                page_number: 2,
                tokens: vec![tok("segunda", 10.0, 10.0)],
            },
            TokenPage {
                page_number: 1,
                tokens: vec![tok("primeira", 10.0, 10.0)],
            },
        ];
        let lines = reconstruct_pages(&pages, 2.0, 40.0);
        assert_eq!(lines[0].text, "primeira");
        assert_eq!(lines[1].text, "segunda");
    }
}
