//! ANSI escape sequence removal.
//!
//! ESP-IDF and most RTOS loggers colour their output
//! (`\x1b[0;32mI (312) IR_main: ...\x1b[0m`). Expectations are written
//! against the plain text, so the reader strips these sequences by default.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Strip ANSI escape sequences from a line of text.
///
/// Handles CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL|ST`), character set
/// designation and two-character escapes. Text without an escape character
/// is returned borrowed.
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains(ESC) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ESC {
            skip_sequence(&mut chars);
        } else {
            result.push(c);
        }
    }

    Cow::Owned(result)
}

fn skip_sequence(chars: &mut Peekable<Chars<'_>>) {
    let Some(&next) = chars.peek() else {
        return;
    };

    match next {
        '[' => {
            chars.next();
            // Parameters and intermediates, then one final byte in 0x40..=0x7e.
            for param in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&param) {
                    break;
                }
            }
        }
        ']' => {
            chars.next();
            while let Some(osc) = chars.next() {
                if osc == BEL {
                    break;
                }
                if osc == ESC {
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    break;
                }
            }
        }
        '(' | ')' | '*' | '+' => {
            chars.next();
            chars.next();
        }
        _ if next.is_ascii_uppercase() || next == '=' || next == '>' => {
            chars.next();
        }
        // Lone ESC: drop it and keep the following text.
        _ => {}
    }
}
