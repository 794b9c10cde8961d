//! Word wrapping and justification
//!
//! The layout engine is metric-agnostic: callers supply a measure function
//! that returns the width of a string in points (with the font size already
//! folded in), so the same algorithm serves real font metrics and tests.

/// Result of wrapping a text against a width budget
#[derive(Debug, Clone, PartialEq)]
pub struct WrapResult {
    /// Broken lines, words joined with single spaces
    pub lines: Vec<String>,
    /// Per-word horizontal offsets, relative to the line origin
    pub word_positions: Vec<WordPosition>,
}

/// A positioned word within a wrapped text
#[derive(Debug, Clone, PartialEq)]
pub struct WordPosition {
    /// Line index (0-based)
    pub line: usize,
    /// The word itself
    pub word: String,
    /// Horizontal offset from the line origin in points
    pub x: f64,
}

/// Wrap `text` greedily against `max_width` and compute word positions.
///
/// A word joins the current line when the line width plus a separating
/// space plus the word still fits. A single word wider than `max_width`
/// occupies its own line unmodified.
///
/// With `justify` set, every line except the last one and except
/// single-word lines gets uniform inter-word gaps sized so the last
/// word's right edge lands exactly at `max_width`. The last line and
/// single-word lines keep natural spacing.
pub fn wrap_text<F>(text: &str, measure: F, max_width: f64, justify: bool) -> WrapResult
where
    F: Fn(&str) -> f64,
{
    if text.is_empty() {
        return WrapResult {
            lines: Vec::new(),
            word_positions: Vec::new(),
        };
    }

    let space_width = measure(" ");

    // First pass: determine line breaks
    let mut word_lines: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_width = 0.0;

    for word in text.split(' ') {
        let word_width = measure(word);
        let new_width =
            current_width + if current.is_empty() { 0.0 } else { space_width } + word_width;

        if !current.is_empty() && new_width > max_width {
            word_lines.push(std::mem::take(&mut current));
            current.push(word);
            current_width = word_width;
        } else {
            current.push(word);
            current_width = new_width;
        }
    }
    if !current.is_empty() {
        word_lines.push(current);
    }

    let lines: Vec<String> = word_lines.iter().map(|words| words.join(" ")).collect();

    // Second pass: word positions, with justified gaps where requested
    let mut word_positions = Vec::new();
    let line_count = word_lines.len();

    for (line, words) in word_lines.iter().enumerate() {
        let is_last = line + 1 == line_count;

        if !justify || is_last || words.len() == 1 {
            let mut x = 0.0;
            for word in words {
                word_positions.push(WordPosition {
                    line,
                    word: (*word).to_string(),
                    x,
                });
                x += measure(word) + space_width;
            }
        } else {
            let words_width: f64 = words.iter().map(|w| measure(w)).sum();
            let gap = (max_width - words_width) / (words.len() - 1) as f64;

            let mut x = 0.0;
            for (i, word) in words.iter().enumerate() {
                word_positions.push(WordPosition {
                    line,
                    word: (*word).to_string(),
                    x,
                });
                x += measure(word);
                if i + 1 < words.len() {
                    x += gap;
                }
            }
        }
    }

    WrapResult {
        lines,
        word_positions,
    }
}
