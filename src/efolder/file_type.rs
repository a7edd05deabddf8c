// File-type gate for eFolder attachments

use tracing::warn;

/// Suffixes Encompass accepts, compared against the last four characters only.
///
/// `.docx`, `.html` and `.jpeg` are five characters long and so appear here
/// without their dot.
pub const ACCEPTABLE_SUFFIXES: [&str; 10] = [
    ".doc", "docx", ".emf", "html", "jpeg", ".jpg", ".pdf", ".tif", ".txt", ".xps",
];

/// True iff the last four characters of `filename` equal one of [`ACCEPTABLE_SUFFIXES`].
///
/// This is a literal, case-sensitive suffix comparison, not an extension parse:
/// `report.xdoc` passes and `scan.PDF` does not.
pub fn is_acceptable(filename: &str) -> bool {
    let count = filename.chars().count();
    if count < 4 {
        return false;
    }

    let suffix: String = filename.chars().skip(count - 4).collect();
    ACCEPTABLE_SUFFIXES.contains(&suffix.as_str())
}

/// Log the rejection with the list of formats Encompass takes.
pub(crate) fn log_rejection(filename: &str) {
    warn!(
        filename = %filename,
        "File is in unacceptable format. Acceptable formats are: .doc, .docx, .emf, .html, .jpeg, .jpg, .pdf, .tif, .txt, .xps"
    );
}
