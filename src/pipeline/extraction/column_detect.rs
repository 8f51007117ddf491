// Whitespace-based column recovery for layout-preserving plain text.
// Without token positions, text extractors still keep table cells apart
// with runs of spaces. Those gutters become column breaks so the
// tab-column strategy sees the same shape as reconstructed lines.

use super::types::{ReconstructedLine, COLUMN_BREAK};

/// Split every line of plain text at its gutters.
///
/// A gutter is a run of `min_spaces`+ spaces, or a run holding a literal tab
/// or a `|` rule, with text on both sides. Lines without gutters pass
/// through as single-column lines.
pub fn split_gutters(text: &str, min_spaces: usize) -> Vec<ReconstructedLine> {
    text.lines()
        .filter_map(|line| {
            let cells = split_line_at_gutters(line, min_spaces);
            let joined = cells.join(&COLUMN_BREAK.to_string());
            (!joined.is_empty()).then(|| ReconstructedLine::new(1, joined))
        })
        .collect()
}

/// Cells of one line, trimmed, in reading order.
fn split_line_at_gutters(line: &str, min_spaces: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut cells = Vec::new();
    let mut cell_start = 0;

    for (start, end) in find_gutters_in_line(&chars, min_spaces) {
        cells.push(chars[cell_start..start].iter().collect::<String>());
        cell_start = end;
    }
    cells.push(chars[cell_start..].iter().collect::<String>());

    cells
        .into_iter()
        .map(|c| {
            c.trim_matches(|ch: char| ch.is_whitespace() || ch == '|')
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|c| !c.is_empty())
        .collect()
}

/// Char ranges `[start, end)` of gutters that have text on both sides.
fn find_gutters_in_line(chars: &[char], min_spaces: usize) -> Vec<(usize, usize)> {
    let len = chars.len();
    let mut gutters = Vec::new();
    let mut i = 0;

    while i < len {
        if is_gutter_char(chars[i]) {
            let start = i;
            let mut has_rule = false;
            while i < len && is_gutter_char(chars[i]) {
                has_rule |= chars[i] != ' ';
                i += 1;
            }
            let gap_width = i - start;

            if has_rule || gap_width >= min_spaces {
                let has_left = chars[..start].iter().any(|c| !c.is_whitespace());
                let has_right = chars[i..].iter().any(|c| !c.is_whitespace());
                if has_left && has_right {
                    gutters.push((start, i));
                }
            }
        } else {
            i += 1;
        }
    }

    gutters
}

fn is_gutter_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '|')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lab_table_rows_become_columns() {
        let text = "Exame          Resultado       Referência\n\
                    Potássio       4,7 mmol/L      3,5 a 5,1\n\
                    Sódio          140 mmol/L      136 a 145";
        let lines = split_gutters(text, 3);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].columns(), vec!["Potássio", "4,7 mmol/L", "3,5 a 5,1"]);
        assert_eq!(lines[2].text, "Sódio\t140 mmol/L\t136 a 145");
    }

    #[test]
    fn single_spaces_do_not_split() {
        let lines = split_gutters("Potássio: 4,7 mmol/L (de 3,5 a 5,1)", 3);
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].has_columns());
    }

    #[test]
    fn literal_tab_is_a_gutter() {
        let lines = split_gutters("Glicose\t90 mg/dL", 3);
        assert_eq!(lines[0].columns(), vec!["Glicose", "90 mg/dL"]);
    }

    #[test]
    fn pipe_rules_are_gutters() {
        let lines = split_gutters("| Sódio | 140 mmol/L | 136 a 145 |", 3);
        assert_eq!(lines[0].columns(), vec!["Sódio", "140 mmol/L", "136 a 145"]);
    }

    #[test]
    fn leading_and_trailing_spaces_are_not_gutters() {
        let chars: Vec<char> = "        Only right side text".chars().collect();
        assert!(find_gutters_in_line(&chars, 3).is_empty());
        let chars: Vec<char> = "Only left side text        ".chars().collect();
        assert!(find_gutters_in_line(&chars, 3).is_empty());
    }

    #[test]
    fn gutter_width_threshold_is_respected() {
        let chars: Vec<char> = "Ureia  32 mg/dL".chars().collect();
        assert!(find_gutters_in_line(&chars, 3).is_empty());
        assert_eq!(find_gutters_in_line(&chars, 2), vec![(5, 7)]);
    }

    #[test]
    fn accented_text_survives_split() {
        let lines = split_gutters("Hemácias      4,50 milhões/µL", 3);
        assert_eq!(lines[0].columns(), vec!["Hemácias", "4,50 milhões/µL"]);
    }

    #[test]
    fn blank_text_yields_no_lines() {
        assert!(split_gutters("", 3).is_empty());
        assert!(split_gutters("   \n\t\n", 3).is_empty());
    }
}
