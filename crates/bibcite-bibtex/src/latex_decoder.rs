//! LaTeX character decoding
//!
//! Decodes LaTeX special characters and commands to Unicode. The decoder is
//! a single left-to-right scan: accents become combining marks that are
//! composed at the end, symbol commands are looked up in a table, and any
//! other command is dropped while its argument text is kept.

use lazy_static::lazy_static;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Control words that stand for a character or symbol
    static ref SYMBOLS: HashMap<&'static str, &'static str> = [
        // Ligatures and special letters
        ("ae", "æ"), ("AE", "Æ"),
        ("oe", "œ"), ("OE", "Œ"),
        ("aa", "å"), ("AA", "Å"),
        ("o", "ø"), ("O", "Ø"),
        ("l", "ł"), ("L", "Ł"),
        ("ss", "ß"),
        ("i", "ı"), ("j", "ȷ"),

        // Text symbols
        ("textbackslash", "\\"),
        ("textasciitilde", "~"),
        ("textasciicircum", "^"),
        ("textasciigrave", "`"),
        ("textbar", "|"),
        ("textless", "<"),
        ("textgreater", ">"),
        ("textunderscore", "_"),
        ("textendash", "–"),
        ("textemdash", "—"),
        ("copyright", "©"),
        ("textcopyright", "©"),
        ("texttrademark", "™"),
        ("textregistered", "®"),
        ("pounds", "£"),
        ("euro", "€"),
        ("yen", "¥"),
        ("S", "§"),
        ("P", "¶"),
        ("dag", "†"),
        ("ddag", "‡"),
        ("textdagger", "†"),
        ("textdaggerdbl", "‡"),
        ("textbullet", "•"),
        ("ldots", "…"),
        ("dots", "…"),
        ("textellipsis", "…"),
        ("textdegree", "°"),

        // Greek letters
        ("alpha", "α"), ("beta", "β"), ("gamma", "γ"),
        ("delta", "δ"), ("epsilon", "ε"), ("zeta", "ζ"),
        ("eta", "η"), ("theta", "θ"), ("iota", "ι"),
        ("kappa", "κ"), ("lambda", "λ"), ("mu", "μ"),
        ("nu", "ν"), ("xi", "ξ"), ("pi", "π"),
        ("rho", "ρ"), ("sigma", "σ"), ("tau", "τ"),
        ("upsilon", "υ"), ("phi", "φ"), ("chi", "χ"),
        ("psi", "ψ"), ("omega", "ω"),
        ("Gamma", "Γ"), ("Delta", "Δ"), ("Theta", "Θ"),
        ("Lambda", "Λ"), ("Xi", "Ξ"), ("Pi", "Π"),
        ("Sigma", "Σ"), ("Upsilon", "Υ"), ("Phi", "Φ"),
        ("Psi", "Ψ"), ("Omega", "Ω"),

        // Math operators and relations
        ("times", "×"), ("div", "÷"),
        ("pm", "±"), ("mp", "∓"),
        ("cdot", "·"), ("circ", "∘"),
        ("leq", "≤"), ("geq", "≥"),
        ("neq", "≠"), ("approx", "≈"),
        ("equiv", "≡"), ("sim", "∼"),
        ("propto", "∝"), ("infty", "∞"),
        ("partial", "∂"), ("nabla", "∇"),
        ("rightarrow", "→"), ("leftarrow", "←"),
        ("to", "→"), ("Rightarrow", "⇒"),
        ("in", "∈"), ("sum", "∑"), ("int", "∫"),
    ]
    .into_iter()
    .collect();
}

/// Combining mark for a punctuation accent (`\'e`, `\"o`, ...)
fn symbol_accent(c: char) -> Option<char> {
    match c {
        '\'' => Some('\u{0301}'),
        '`' => Some('\u{0300}'),
        '^' => Some('\u{0302}'),
        '"' => Some('\u{0308}'),
        '~' => Some('\u{0303}'),
        '=' => Some('\u{0304}'),
        '.' => Some('\u{0307}'),
        _ => None,
    }
}

/// Combining mark for a letter accent (`\c c`, `\v{s}`, ...)
fn letter_accent(name: &str) -> Option<char> {
    match name {
        "c" => Some('\u{0327}'),
        "v" => Some('\u{030C}'),
        "u" => Some('\u{0306}'),
        "r" => Some('\u{030A}'),
        "k" => Some('\u{0328}'),
        "H" => Some('\u{030B}'),
        "d" => Some('\u{0323}'),
        "b" => Some('\u{0331}'),
        _ => None,
    }
}

/// Decode a BibTeX field value to plain Unicode.
///
/// Unescaped braces and math delimiters are dropped, whitespace is
/// collapsed and the result is NFC-normalized.
pub fn decode_latex(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            i = decode_command(&chars, i, &mut out);
            continue;
        }
        let next = chars.get(i + 1).copied();
        match c {
            '{' | '}' | '$' => i += 1,
            '~' => {
                out.push(' ');
                i += 1;
            }
            '-' if next == Some('-') => {
                if chars.get(i + 2) == Some(&'-') {
                    out.push('—');
                    i += 3;
                } else {
                    out.push('–');
                    i += 2;
                }
            }
            '`' if next == Some('`') => {
                out.push('\u{201C}');
                i += 2;
            }
            '\'' if next == Some('\'') => {
                out.push('\u{201D}');
                i += 2;
            }
            c if c.is_whitespace() => {
                out.push(' ');
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    let composed: String = out.nfc().collect();
    collapse_whitespace(&composed)
}

/// Decode accent commands only: `\"o`, `{\"o}`, `\'{e}`, `\v s`.
///
/// Every other character is kept as written, including braces, lone
/// backslashes and symbol commands. Used for plain-text formats such as
/// RIS that sometimes carry LaTeX accents.
pub fn decode_latex_accents(input: &str) -> String {
    if !input.contains('\\') {
        return input.to_string();
    }

    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        // `{\"o}` is one unit, braces included
        let wrapped = chars[i] == '{' && chars.get(i + 1) == Some(&'\\');
        let command = if wrapped { i + 1 } else { i };

        if chars[command] == '\\' {
            if let Some((letter, end)) = accent_at(&chars, command) {
                let end = match wrapped {
                    false => Some(end),
                    true if chars.get(end) == Some(&'}') => Some(end + 1),
                    true => None,
                };
                if let Some(end) = end {
                    out.push_str(&letter);
                    i = end;
                    continue;
                }
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}

/// The accented letter for an accent command at `start`, and the index
/// after it
fn accent_at(chars: &[char], start: usize) -> Option<(String, usize)> {
    let next = *chars.get(start + 1)?;
    let (mark, argument) = match symbol_accent(next) {
        Some(mark) => (mark, start + 2),
        None => {
            let name_end = chars[start + 1..]
                .iter()
                .position(|c| !c.is_ascii_alphabetic())
                .map(|p| start + 1 + p)
                .unwrap_or(chars.len());
            let name: String = chars[start + 1..name_end].iter().collect();
            (letter_accent(&name)?, skip_spaces(chars, name_end))
        }
    };

    let (base, end) = accent_argument(chars, argument);
    let base = base.filter(|c| c.is_alphabetic())?;
    Some(([base, mark].iter().collect::<String>().nfc().collect(), end))
}

/// Decode the command starting at `chars[start] == '\\'`; returns the index
/// after it
fn decode_command(chars: &[char], start: usize, out: &mut String) -> usize {
    let Some(&next) = chars.get(start + 1) else {
        return chars.len();
    };

    if let Some(mark) = symbol_accent(next) {
        let (base, end) = accent_argument(chars, start + 2);
        if let Some(base) = base {
            out.push(base);
            out.push(mark);
        }
        return end;
    }

    match next {
        '&' | '%' | '$' | '#' | '_' | '{' | '}' | '@' => {
            out.push(next);
            return start + 2;
        }
        // Line break, control space and thin space
        '\\' | ' ' | ',' | ';' => {
            out.push(' ');
            return start + 2;
        }
        c if !c.is_ascii_alphabetic() => {
            // Hyphenation hints, italic corrections and the like
            return start + 2;
        }
        _ => {}
    }

    let name_end = chars[start + 1..]
        .iter()
        .position(|c| !c.is_ascii_alphabetic())
        .map(|p| start + 1 + p)
        .unwrap_or(chars.len());
    let name: String = chars[start + 1..name_end].iter().collect();

    if let Some(mark) = letter_accent(&name) {
        let (base, end) = accent_argument(chars, skip_spaces(chars, name_end));
        if let Some(base) = base {
            out.push(base);
            out.push(mark);
        }
        return end;
    }

    if let Some(symbol) = SYMBOLS.get(name.as_str()) {
        out.push_str(symbol);
        // A symbol command may be terminated by an empty group
        if chars.get(name_end) == Some(&'{') && chars.get(name_end + 1) == Some(&'}') {
            return name_end + 2;
        }
        return name_end;
    }

    // Formatting or unknown command: drop it, its argument text stays
    name_end
}

/// Read the base letter of an accent: `e`, `{e}`, `\i`, `{\i}`
fn accent_argument(chars: &[char], start: usize) -> (Option<char>, usize) {
    let mut i = start;
    let braced = chars.get(i) == Some(&'{');
    if braced {
        i = skip_spaces(chars, i + 1);
    }

    let base = match chars.get(i) {
        Some('\\') if matches!(chars.get(i + 1), Some('i') | Some('j'))
            && !chars.get(i + 2).is_some_and(|c| c.is_ascii_alphabetic()) =>
        {
            let dotless = chars[i + 1];
            i += 2;
            // The control word swallows one following space
            if !braced && chars.get(i) == Some(&' ') {
                i += 1;
            }
            Some(dotless)
        }
        Some('}') if braced => None,
        Some(&c) => {
            i += 1;
            Some(c)
        }
        None => None,
    };

    if braced {
        i = skip_spaces(chars, i);
        if chars.get(i) == Some(&'}') {
            i += 1;
        }
    }
    (base, i)
}

fn skip_spaces(chars: &[char], mut i: usize) -> usize {
    while chars.get(i) == Some(&' ') {
        i += 1;
    }
    i
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
