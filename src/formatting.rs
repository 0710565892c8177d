/// Renders ordered `(label, value)` pairs into a single block of text.
///
/// Empty values are dropped. With `align_columns` every retained `label + separator`
/// is right-padded to the widest one so all values start in the same column.
pub fn format_labeled_block(
    fields: &[(&str, &str)],
    separator: &str,
    record_delimiter: &str,
    align_columns: bool,
) -> String {
    let keys: Vec<(String, &str)> = fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| (format!("{}{}", label, separator), *value))
        .collect();

    let width = if align_columns {
        keys.iter()
            .map(|(key, _)| key.chars().count())
            .max()
            .unwrap_or(0)
    } else {
        0
    };

    keys.iter()
        .map(|(key, value)| {
            let padding = width.saturating_sub(key.chars().count());
            format!("{}{}{}", key, " ".repeat(padding), value)
        })
        .collect::<Vec<_>>()
        .join(record_delimiter)
}
