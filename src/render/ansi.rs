//! Escape-sequence aware width accounting.
//!
//! Every badge carries SGR color codes and some are wrapped in OSC 8
//! hyperlinks, so nothing in the renderer may measure or cut a string by
//! bytes or chars. Everything here walks the text as a stream of
//! [`Token`]s: whole escape sequences (zero columns) and single code points.

use super::badge::Rgb;

pub const RESET: &str = "\x1b[0m";
pub const ERASE_TO_EOL: &str = "\x1b[K";
pub const CLEAR_LINE_WITH_DEFAULT_BG: &str = "\x1b[0m\x1b[49m\x1b[2K\r";
pub const RESET_BG: &str = "\x1b[49m";
pub const RESET_FG: &str = "\x1b[39m";
pub const FG_WHITE: &str = "\x1b[97m";

/// 24-bit background color sequence.
pub fn bg_rgb(rgb: Rgb) -> String {
    format!("\x1b[48;2;{};{};{}m", rgb.0, rgb.1, rgb.2)
}

/// 24-bit foreground color sequence.
pub fn fg_rgb(rgb: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", rgb.0, rgb.1, rgb.2)
}

/// Wrap `text` in an OSC 8 terminal hyperlink pointing at `url`.
pub fn hyperlink(url: &str, text: &str) -> String {
    format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, text)
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// A complete CSI or OSC sequence, introducer through terminator.
    Escape(&'a str),
    Text(char),
}

struct Tokens<'a> {
    src: &'a str,
    pos: usize,
}

fn tokens(src: &str) -> Tokens<'_> {
    Tokens { src, pos: 0 }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.src[self.pos..];
        let c = rest.chars().next()?;
        let escape = if c == '\x1b' { escape_len(rest) } else { None };
        match escape {
            Some(len) => {
                self.pos += len;
                Some(Token::Escape(&rest[..len]))
            }
            None => {
                self.pos += c.len_utf8();
                Some(Token::Text(c))
            }
        }
    }
}

/// Byte length of the escape sequence at the start of `s`, or `None` when
/// `s` does not open a CSI (`ESC [`) or OSC (`ESC ]`) sequence.
///
/// An unterminated sequence runs to the end of the input. Every returned
/// length lands on an ASCII byte, so slicing with it is always valid UTF-8.
fn escape_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    match bytes.get(1)? {
        b'[' => {
            let end = bytes[2..]
                .iter()
                .position(|b| (0x40..=0x7e).contains(b))
                .map(|i| i + 3);
            Some(end.unwrap_or(bytes.len()))
        }
        b']' => {
            let mut i = 2;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return Some(i + 1),
                    0x1b if bytes.get(i + 1) == Some(&b'\\') => return Some(i + 2),
                    _ => i += 1,
                }
            }
            Some(bytes.len())
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Width
// ---------------------------------------------------------------------------

/// Code points that terminals draw two columns wide: CJK, fullwidth forms,
/// and the emoji that default to emoji presentation.
fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115f
            | 0x2329..=0x232a
            | 0x2e80..=0xa4cf
            | 0xac00..=0xd7a3
            | 0xf900..=0xfaff
            | 0xfe10..=0xfe19
            | 0xfe30..=0xfe6f
            | 0xff00..=0xff60
            | 0xffe0..=0xffe6
            | 0x23e9..=0x23f3 // ⏩..⏳, includes the stopwatch ⏲
            | 0x25aa..=0x25ab
            | 0x25fb..=0x25fe
            | 0x2614..=0x2615
            | 0x2648..=0x2653
            | 0x26a1
            | 0x26aa..=0x26ab
            | 0x2705
            | 0x2728
            | 0x1f300..=0x1f64f
            | 0x1f680..=0x1f6ff
            | 0x1f900..=0x1f9ff
            | 0x1fa00..=0x1faff
    )
}

/// Display columns taken by a single code point.
pub fn char_width(c: char) -> usize {
    if is_wide(c) {
        2
    } else {
        1
    }
}

/// Number of terminal columns `s` occupies once escape sequences are
/// interpreted.
pub fn visible_width(s: &str) -> usize {
    tokens(s)
        .map(|t| match t {
            Token::Escape(_) => 0,
            Token::Text(c) => char_width(c),
        })
        .sum()
}

/// Longest prefix of `s` that fits in `max_width` columns, always followed
/// by a reset so colors never bleed past the cut.
///
/// Escape sequences are copied whole while budget remains; a character that
/// would overflow the budget is dropped and scanning stops.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return RESET.to_string();
    }

    let mut out = String::with_capacity(s.len() + RESET.len());
    let mut width = 0;
    for token in tokens(s) {
        if width >= max_width {
            break;
        }
        match token {
            Token::Escape(seq) => out.push_str(seq),
            Token::Text(c) => {
                let w = char_width(c);
                if width + w > max_width {
                    break;
                }
                out.push(c);
                width += w;
            }
        }
    }
    out.push_str(RESET);
    out
}

// ---------------------------------------------------------------------------
// Text rewriting
// ---------------------------------------------------------------------------

/// Rewrite visible characters with `f`, leaving escape sequences (and the
/// URLs inside hyperlinks) untouched.
fn map_text(s: &str, mut f: impl FnMut(char, &mut String)) -> String {
    let mut out = String::with_capacity(s.len());
    for token in tokens(s) {
        match token {
            Token::Escape(seq) => out.push_str(seq),
            Token::Text(c) => f(c, &mut out),
        }
    }
    out
}

/// ASCII stand-ins for the badge emoji, used on narrow terminals.
const EMOJI_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{1f9e0}', "ctx"),  // 🧠
    ('\u{1f4ca}', "+/-"),  // 📊
    ('\u{1f525}', "tok"),  // 🔥
    ('\u{1f4b8}', "$"),    // 💸
    ('\u{23f2}', "T"),     // ⏲
    ('\u{1f333}', "wt:"),  // 🌳
    ('\u{1f33f}', "br:"),  // 🌿
    ('\u{1f4cb}', "cfg"),  // 📋
    ('\u{1f3ab}', "tkt"),  // 🎫
    ('\u{1f517}', "PR"),   // 🔗
    ('\u{1f9e9}', "R"),    // 🧩
    ('\u{1f4da}', "L"),    // 📚
    ('\u{1f4e6}', "C"),    // 📦
    ('\u{1f9ec}', "I"),    // 🧬
    ('\u{1f4dd}', "log"),  // 📝
    ('\u{1f50c}', "mcp:"), // 🔌
    ('\u{1f4f1}', "RC"),   // 📱
];

/// Replace badge emoji with short ASCII abbreviations.
pub fn strip_emojis(s: &str) -> String {
    map_text(s, |c, out| {
        match EMOJI_REPLACEMENTS.iter().find(|(emoji, _)| *emoji == c) {
            Some((_, ascii)) => out.push_str(ascii),
            None => out.push(c),
        }
    })
}

/// Swap visible spaces for no-break spaces so hosts that trim or collapse
/// whitespace keep the badge padding intact.
pub fn harden_spaces(s: &str) -> String {
    map_text(s, |c, out| out.push(if c == ' ' { '\u{a0}' } else { c }))
}
