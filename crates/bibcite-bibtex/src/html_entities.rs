//! HTML entity decoding
//!
//! Exports from web databases sometimes leave `&amp;`-style entities in
//! BibTeX values. They are decoded before LaTeX decoding; an `&` that is
//! escaped as `\&` is left for the LaTeX decoder.

/// Named entities recognised in field values
const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
    ("ndash", '–'),
    ("mdash", '—'),
    ("hellip", '…'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201C}'),
    ("rdquo", '\u{201D}'),
    ("copy", '©'),
    ("reg", '®'),
];

/// Decode HTML character references (`&amp;`, `&#233;`, `&#xE9;`)
pub fn decode_html_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        let escaped = rest[..pos].ends_with('\\');
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];

        let decoded = if escaped { None } else { decode_reference(candidate) };
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode one reference at the start of `input` (which begins with `&`)
fn decode_reference(input: &str) -> Option<(char, usize)> {
    let (end, _) = input.char_indices().take(12).find(|(_, c)| *c == ';')?;
    let body = &input[1..end];

    let c = if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        char::from_u32(code)?
    } else {
        NAMED.iter().find(|(name, _)| *name == body).map(|(_, c)| *c)?
    };

    Some((c, end + 1))
}
