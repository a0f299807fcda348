/// Strip byte-order marks and zero-width characters spreadsheet exports leave
/// behind, then trim. Blank cells become `None`.
pub(crate) fn clean_cell(value: &str) -> Option<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}'], "");
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
