use super::types::ReconstructedLine;

/// Minimum spaces in a run for it to count as an aligned-column gap.
const MIN_SPACE_GAP: usize = 3;

/// Count reconstructed lines that look like table rows.
pub fn count_tabular_lines(lines: &[ReconstructedLine]) -> usize {
    lines
        .iter()
        .filter(|l| l.columns().len() >= 3 || is_tabular_line(&l.text))
        .count()
}

/// Heuristic: a line looks tabular if it has multiple columns separated by
/// tabs, pipes, or consistent multi-space gaps.
///
/// Patterns detected:
/// - Tab-separated: "Sódio\t140 mmol/L\t136 a 145"
/// - Pipe-separated: "Sódio | 140 | mmol/L"
/// - Multi-space aligned: "Potássio    4,7    mmol/L"
pub fn is_tabular_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.chars().count() < 5 {
        return false;
    }

    if trimmed.matches('\t').count() >= 2 {
        return true;
    }

    if trimmed.matches('|').count() >= 2 {
        return true;
    }

    count_multi_space_gaps(trimmed) >= 2
}

/// Count runs of [`MIN_SPACE_GAP`]+ consecutive spaces.
fn count_multi_space_gaps(text: &str) -> usize {
    let mut count = 0;
    let mut in_gap = false;
    let mut gap_len = 0;

    for ch in text.chars() {
        if ch == ' ' {
            gap_len += 1;
            if gap_len >= MIN_SPACE_GAP && !in_gap {
                in_gap = true;
                count += 1;
            }
        } else {
            in_gap = false;
            gap_len = 0;
        }
    }

    count
}
