//! Common utilities for report rendering.

use std::path::{Path, PathBuf};

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\n', r"\n")
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_' || ch == ',')
            && !last_dash
            && !result.is_empty()
        {
            result.push('-');
            last_dash = true;
        }
    }

    let trimmed = result.trim_matches('-');
    if trimmed.is_empty() {
        return fallback.to_string();
    }

    trimmed.to_string()
}

/// `relatorio-<clients>-<period>.pdf`
pub fn report_filename(client_label: &str, period_label: &str) -> String {
    format!(
        "relatorio-{}-{}.pdf",
        sanitize_filename(client_label, "clientes"),
        sanitize_filename(period_label, "periodo")
    )
}

/// Template names are plain file names inside the template directory.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

/// Default template directory shipped with the crate.
pub fn get_static_dir() -> PathBuf {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")).to_path_buf()
}
