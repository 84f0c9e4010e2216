//! Helpers for comma-separated Takeout exports.
//!
//! Fields are split naively on commas. The positional rules used by the
//! playlist CSV decoder live here so they can be tested on their own.

/// Splits text into lines after dropping a leading UTF-8 byte order mark.
pub fn lines(text: &str) -> Vec<&str> {
    text.strip_prefix('\u{feff}').unwrap_or(text).lines().collect()
}

/// Trims whitespace and one pair of surrounding double quotes.
pub fn clean_field(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
        .trim()
}

/// First field of a line, if it is not blank.
pub fn leading_field(line: &str) -> Option<&str> {
    line.split(',')
        .next()
        .map(clean_field)
        .filter(|field| !field.is_empty())
}

/// Field counted from the end of the line: `0` is the last field, `2` the
/// third-from-last. `None` when the line has too few fields.
pub fn trailing_field(line: &str, from_end: usize) -> Option<&str> {
    line.split(',').rev().nth(from_end).map(clean_field)
}

/// Index of the first data row in a playlist export.
///
/// Without a playlist name the column header sits on line 1 and data starts
/// on line 2. With a name, metadata is followed by one or more blank lines and
/// a column header; data starts right after that header. `None` when no blank
/// line exists.
pub fn data_start(lines: &[&str], has_name: bool) -> Option<usize> {
    if !has_name {
        return Some(2);
    }

    let first_blank = header_boundary(lines)?;
    let header = lines[first_blank..]
        .iter()
        .position(|line| !line.trim().is_empty())
        .map_or(lines.len(), |offset| first_blank + offset);

    Some(header + 1)
}

/// Index of the first blank line, which separates metadata from the video list.
pub fn header_boundary(lines: &[&str]) -> Option<usize> {
    lines.iter().position(|line| line.trim().is_empty())
}
