//! Text measurement for the builtin Helvetica faces.
//!
//! The renderer only uses PDF builtin fonts, so glyph advances are
//! approximated with an average character width rather than parsed from a
//! font file. The same model drives wrapping and alignment, which keeps both
//! consistent with each other.

/// Ascender height as a fraction of the font size.
pub const ASCENDER_RATIO: f32 = 0.75;

/// Approximate width of `text` in points at `font_size`.
///
/// Average char width ≈ 0.5 × font size for proportional fonts; bold is
/// about 10 % wider.
pub fn measure_text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let avg = if bold { 0.55 } else { 0.5 };
    text.chars().count() as f32 * font_size * avg
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
///
/// Existing newlines are kept as paragraph breaks. A word wider than the box
/// is broken at character boundaries so that no line exceeds `max_width`,
/// unless a single glyph is already wider than the box.
pub fn wrap_text(text: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in &words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            if measure_text_width(&candidate, font_size, bold) <= max_width {
                current_line = candidate;
                continue;
            }
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            if measure_text_width(word, font_size, bold) <= max_width {
                current_line = word.to_string();
            } else {
                let mut pieces = break_word(word, font_size, bold, max_width);
                current_line = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Split one over-wide word into pieces that each fit `max_width`.
fn break_word(word: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for c in word.chars() {
        piece.push(c);
        if measure_text_width(&piece, font_size, bold) > max_width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Number of lines of `line_height` that fit into `box_height`; at least one.
pub fn lines_that_fit(box_height: f32, line_height: f32) -> usize {
    if line_height <= 0.0 {
        return 1;
    }
    ((box_height / line_height).floor() as usize).max(1)
}
