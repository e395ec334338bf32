/// Normalize a scraped text fragment.
///
/// Every run of whitespace (including NBSP, tabs and newlines) becomes one
/// ASCII space, the ends are trimmed, and a single trailing `.` is dropped.
/// The dot is kept when dropping it would leave another trailing dot
/// (`"Recess..."`, `"A. ."`), so `clean(clean(s)) == clean(s)` for every input.
pub fn clean(raw: &str) -> String {
    let mut collapsed = String::with_capacity(raw.len());
    for word in raw.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }

    if let Some(stripped) = collapsed.strip_suffix('.') {
        let stripped = stripped.trim_end();
        if !stripped.ends_with('.') {
            return stripped.to_string();
        }
    }
    collapsed
}

/// Split an excerpt into agenda items.
///
/// Only text after the first `separator` counts; items are split on
/// `item_separator`, cleaned, and blanks dropped. No separator means no agenda.
pub fn split_agenda(excerpt: &str, separator: &str, item_separator: &str) -> Vec<String> {
    let Some((_, rest)) = excerpt.split_once(separator) else {
        return Vec::new();
    };
    rest.split(item_separator)
        .map(clean)
        .filter(|item| !item.is_empty())
        .collect()
}
