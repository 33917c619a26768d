//! Semicolon-delimited CSV tokenizer with quote toggling.

/// Split CSV text into rows of trimmed cells.
///
/// A `"` flips the in-quotes flag and is never emitted, so `""` collapses to
/// nothing. Blank lines are skipped.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    text.trim_start_matches('\u{feff}')
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(tokenize_line)
        .collect()
}

fn tokenize_line(line: &str) -> Vec<String> {
    let mut row = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                row.push(current.trim().to_string());
                current.clear();
            }
            other => current.push(other),
        }
    }

    row.push(current.trim().to_string());
    row
}
