//! Positional arguments of an inline player call such as
//! `javascript:loadJWPlayer7('a.mp4', '/img.jpg', "<p>..</p>", false); return false;`.

/// Arguments of the first call expression in `raw`, unquoted.
///
/// Quoted arguments may use `'` or `"` and backslash escapes; bare tokens
/// (`false`, numbers) are kept as written. Returns `None` when the call is
/// unterminated.
pub(crate) fn invocation_args(raw: &str) -> Option<Vec<String>> {
    let open = raw.find('(')?;
    let mut chars = raw[open + 1..].chars().peekable();
    let mut args = Vec::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.peek().copied()? {
            ')' if args.is_empty() => return Some(args),
            quote @ ('\'' | '"') => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next()? {
                        '\\' => value.push(chars.next()?),
                        c if c == quote => break,
                        c => value.push(c),
                    }
                }
                args.push(value);
            }
            _ => {
                let mut value = String::new();
                while let Some(c) = chars.next_if(|c| *c != ',' && *c != ')') {
                    value.push(c);
                }
                args.push(value.trim_end().to_string());
            }
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next()? {
            ',' => continue,
            ')' => return Some(args),
            _ => return None,
        }
    }
}
