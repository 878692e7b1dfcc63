/// Split file text into row contents.
///
/// A trailing `'\r'` is stripped from every line and a final newline does not produce an extra
/// empty row (`"a\nb\n"` is two rows, `""` is none).
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Split inserted text at every `'\n'` into row pieces, dropping carriage returns.
///
/// Always yields at least one piece (`""` gives `[""]`, `"a\n"` gives `["a", ""]`).
pub(crate) fn split_inserted(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|piece| piece.chars().filter(|&c| c != '\r').collect())
        .collect()
}
