use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Number of terminal columns `s` occupies.
///
/// Wide characters (CJK, most emoji) count as two columns and combining
/// marks as zero.
///
/// ```
/// use movieboard::util::display_width;
///
/// assert_eq!(display_width("Seven"), 5);
/// assert_eq!(display_width("千と千尋"), 8);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: char = '…';

/// Shorten `s` to at most `max_width` columns, marking the cut with `…`.
///
/// Borrows when nothing is cut.
///
/// ```
/// use movieboard::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Inception", 20), "Inception");
/// assert_eq!(truncate_to_width("Les indestructibles 2", 10), "Les indes…");
/// assert_eq!(truncate_to_width("Inception", 0), "");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // Reserve one column for the ellipsis.
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(max_width + ELLIPSIS.len_utf8());
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Truncate or right-pad `s` so it occupies exactly `width` columns.
///
/// ```
/// use movieboard::util::fit_to_width;
///
/// assert_eq!(fit_to_width("Seven", 8), "Seven   ");
/// assert_eq!(fit_to_width("Pulp Fiction", 8), "Pulp Fi…");
/// ```
pub fn fit_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width);
    let pad = width.saturating_sub(display_width(&truncated));
    let mut out = truncated.into_owned();
    out.extend(std::iter::repeat(' ').take(pad));
    out
}

/// Remove control characters and ANSI escape sequences from untrusted text.
///
/// Catalog titles and categories come from files or remote endpoints and are
/// drawn straight to the terminal. Newlines and tabs become spaces, since a
/// title always renders on a single row.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.peek() {
                // CSI: parameters until a final byte in @..~
                Some('[') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if ('@'..='~').contains(&c) {
                            break;
                        }
                    }
                }
                // OSC: until BEL or ESC \
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' | '\n' | '\r' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
