//! Text widget layout estimates.
//!
//! The engine has no font stack, so rendered height is estimated from an
//! average glyph advance. Good enough to grow and shrink a text box with its
//! content; the presentation layer may overwrite the height with a real
//! measurement through an update.

use crate::widget::TextProps;

/// Padding inside a text box, on each side.
pub const TEXT_PADDING: f64 = 8.0;
/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.4;
/// Height changes at or below this are ignored.
pub const AUTO_RESIZE_TOLERANCE: f64 = 3.0;

const AVERAGE_ADVANCE: f64 = 0.55;
const BOLD_ADVANCE: f64 = 0.6;
const FALLBACK_FONT_SIZE: f64 = 16.0;
const FALLBACK_WIDTH: f64 = 200.0;
/// Measured in place of empty content.
const PLACEHOLDER: &str = "Empty text";

/// Height of one line plus padding.
pub fn min_text_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT + TEXT_PADDING * 2.0
}

/// Estimated rendered height of `props` laid out in a box `width` wide.
pub fn measure_text_height(props: &TextProps, width: f64) -> f64 {
    let font_size = if props.font_size.is_finite() && props.font_size > 0.0 {
        props.font_size
    } else {
        FALLBACK_FONT_SIZE
    };
    let width = if width.is_finite() && width > 0.0 { width } else { FALLBACK_WIDTH };

    let advance = font_size * if props.bold { BOLD_ADVANCE } else { AVERAGE_ADVANCE };
    let inner_width = (width - TEXT_PADDING * 4.0).max(advance);
    let columns = ((inner_width / advance).floor() as usize).max(1);

    let content = if props.content.is_empty() { PLACEHOLDER } else { &props.content };
    let lines: usize = content.split('\n').map(|line| wrapped_line_count(line, columns)).sum();

    let height = lines as f64 * font_size * LINE_HEIGHT + TEXT_PADDING * 2.0;
    height.max(min_text_height(font_size))
}

/// Lines needed for one paragraph with greedy word wrap at `columns` characters.
///
/// Words longer than a line are broken.
fn wrapped_line_count(paragraph: &str, columns: usize) -> usize {
    let mut lines = 1;
    let mut used = 0;

    for word in paragraph.split(' ') {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed <= columns {
            used = needed;
            continue;
        }
        if used > 0 {
            lines += 1;
        }
        // The word starts a new line and may spill over several.
        lines += len.saturating_sub(1) / columns;
        used = match len % columns {
            0 if len > 0 => columns,
            rest => rest,
        };
    }
    lines
}

/// Whether a measured height differs enough from the current one to resize.
pub fn should_auto_resize(current: f64, measured: f64) -> bool {
    (current - measured).abs() > AUTO_RESIZE_TOLERANCE
}

/// Drop trailing line breaks left over from editing.
pub fn strip_trailing_newlines(content: &str) -> &str {
    content.trim_end_matches(['\n', '\r'])
}
