use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` terminal columns, appending `"..."`
/// when anything was cut.
///
/// Widths of 3 or less leave no room for the ellipsis, so the result is just
/// the prefix that fits. Borrows when no truncation is needed.
///
/// ```
/// use newsreel::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Breaking news", 20), "Breaking news");
/// assert_eq!(truncate_to_width("Breaking news", 8), "Break...");
/// assert_eq!(truncate_to_width("Breaking", 3), "Bre");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], suffix))
}

/// Last `n` characters of an identifier, used to show ad unit ids compactly.
pub fn id_suffix(id: &str, n: usize) -> &str {
    let count = id.chars().count();
    if count <= n {
        return id;
    }
    let start = id
        .char_indices()
        .nth(count - n)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &id[start..]
}

fn is_stripped_control(c: char) -> bool {
    c == '\u{7f}' || (c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r'))
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Article text comes from third-party publishers and is drawn straight into
/// the terminal. Drops C0 controls (except tab, newline, carriage return),
/// DEL, CSI sequences (`ESC [ ... final`), OSC sequences (`ESC ] ... BEL` or
/// `ESC ] ... ESC \`) and bare ESC. Borrows when nothing needs removing.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c == '\u{1b}' || is_stripped_control(c)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            if !is_stripped_control(c) {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameters and intermediates up to and including the final byte
                for next in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&next) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '\u{07}' {
                        break;
                    }
                    if next == '\u{1b}' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}
