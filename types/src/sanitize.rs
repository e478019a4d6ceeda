//! Terminal text sanitization for model output.
//!
//! Generated text is rendered straight into the terminal, so escape sequences
//! (cursor movement, OSC 52 clipboard writes, OSC 8 hyperlinks) and stray
//! control characters are removed before display.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{9b}';

/// Strip escape sequences and control characters, keeping `\n` and `\t`.
///
/// Returns `Cow::Borrowed` when the input is already clean.
///
/// ```
/// use innersight_types::sanitize_terminal_text;
///
/// assert_eq!(sanitize_terminal_text("Stillness"), "Stillness");
/// assert_eq!(sanitize_terminal_text("Still\x1b[31mness"), "Stillness");
/// ```
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_stripped) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => match chars.peek() {
                Some('[') => {
                    chars.next();
                    skip_csi(&mut chars);
                }
                Some(']' | 'P' | '^' | '_' | 'X') => {
                    chars.next();
                    skip_string_sequence(&mut chars);
                }
                // Two-character escapes (e.g. ESC c); drop the final byte too.
                Some(_) => {
                    chars.next();
                }
                None => {}
            },
            C1_CSI => skip_csi(&mut chars),
            c if is_stripped(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_stripped(c: char) -> bool {
    match c {
        '\n' | '\t' => false,
        '\r' => true,
        c => c.is_control(),
    }
}

/// CSI: parameter and intermediate bytes, terminated by a byte in `@..=~`.
fn skip_csi(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    for c in chars.by_ref() {
        if ('@'..='~').contains(&c) {
            break;
        }
    }
}

/// OSC/DCS/PM/APC/SOS: terminated by BEL or ST (`ESC \`).
fn skip_string_sequence(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while let Some(c) = chars.next() {
        if c == BEL {
            break;
        }
        if c == ESC {
            if chars.peek() == Some(&'\\') {
                chars.next();
            }
            break;
        }
    }
}
