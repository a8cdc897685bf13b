//! Tokenizing captured command output.
//!
//! Output is only ever tokenized after a successful execution, so nothing in
//! here deals with errors: malformed rows are left for the caller to judge.

use std::sync::LazyLock;

use regex::Regex;

/// One or more spaces or tabs, the column separator of `lvs`, `du` and
/// `/etc/mtab`.
pub static FIELD_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[ \t]+").expect("valid regex")
});

/// Split output into lines after dropping one trailing newline.
///
/// Empty output yields a single empty line.
#[must_use]
pub fn to_lines(output: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(output);
    let text = text.strip_suffix('\n').unwrap_or(&text);
    text.split('\n').map(str::to_owned).collect()
}

/// Split every line of `output` into fields on `delimiter`.
///
/// Leading padding produces an empty first field, exactly as the delimiter
/// dictates; callers that map fields positionally must account for it.
#[must_use]
pub fn to_token_rows(output: &[u8], delimiter: &Regex) -> Vec<Vec<String>> {
    to_lines(output)
        .iter()
        .map(|line| delimiter.split(line).map(str::to_owned).collect())
        .collect()
}
