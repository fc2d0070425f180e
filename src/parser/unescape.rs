//! Decoding of backslash escapes
//!
//! Literal-mode input spells control characters out (`\n`, `\x1b`, `\033`).
//! [`unescape`] turns such text back into the characters it stands for.
//! Unknown or malformed escapes are kept as written.

/// Decode the backslash escapes in `literal`
///
/// Handles `\n`, `\r`, `\t`, `\\`, `\a`, `\e`, `\xNN`, `\uNNNN` and octal
/// `\NNN` (one to three digits).
pub fn unescape(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    let mut rest = literal;

    while let Some(index) = rest.find('\\') {
        out.push_str(&rest[..index]);
        let escape = &rest[index..];
        match decode_escape(escape) {
            Some((c, len)) => {
                out.push(c);
                rest = &escape[len..];
            }
            None => {
                out.push('\\');
                rest = &escape[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the escape at the start of `s`, returning the character and the
/// length of its spelling
fn decode_escape(s: &str) -> Option<(char, usize)> {
    let c = match s[1..].chars().next()? {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '\\' => '\\',
        'a' => '\x07',
        'e' | 'E' => '\x1b',
        'x' | 'X' => return hex(s, 2),
        'u' | 'U' => return hex(s, 4),
        '0'..='7' => return octal(s),
        _ => return None,
    };
    Some((c, 2))
}

fn hex(s: &str, digits: usize) -> Option<(char, usize)> {
    let end = 2 + digits;
    let text = s.get(2..end)?;
    if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(text, 16).ok()?;
    char::from_u32(value).map(|c| (c, end))
}

fn octal(s: &str) -> Option<(char, usize)> {
    let digits = s[1..]
        .bytes()
        .take(3)
        .take_while(|b| (b'0'..=b'7').contains(b))
        .count();
    let value = u32::from_str_radix(&s[1..1 + digits], 8).ok()?;
    char::from_u32(value).map(|c| (c, 1 + digits))
}
