//! Export naming for CSV downloads and rendered plots.

use cone_viewer_protocol::SharedStr;

use crate::model::Filters;

/// Name the backend would give an export of `filters`:
/// `{subject}_{meridian}_{types}[_ecc{min}-{max}]_cones.csv`.
pub fn csv_file_name(filters: &Filters) -> String {
    sanitize_file_name(&format!("{}.csv", export_stem(filters)))
}

/// Same stem as [`csv_file_name`], for a rendered SVG of the selection.
pub fn svg_file_name(filters: &Filters) -> String {
    sanitize_file_name(&format!("{}.svg", export_stem(filters)))
}

fn export_stem(filters: &Filters) -> String {
    let types = if filters.cone_types().is_empty() {
        "all".to_string()
    } else {
        filters
            .cone_types()
            .iter()
            .map(SharedStr::as_str)
            .collect::<Vec<_>>()
            .join("_")
    };
    let ecc = match (filters.eccentricity_min(), filters.eccentricity_max()) {
        (None, None) => String::new(),
        (min, max) => {
            let min = min.map_or_else(|| "0".to_string(), |v| format!("{v:.1}"));
            let max = max.map_or_else(|| "inf".to_string(), |v| format!("{v:.1}"));
            format!("_ecc{min}-{max}")
        }
    };
    format!(
        "{}_{}_{types}{ecc}_cones",
        filters.subject_id(),
        filters.meridian()
    )
}

/// Precomputed per-subject file in object storage.
pub fn storage_file_name(display_id: &str) -> String {
    sanitize_file_name(&format!("{display_id}.csv"))
}

/// The `filename` parameter of a `Content-Disposition` header.
///
/// Prefers the RFC 5987 `filename*` form when present. Returns `None` when
/// the header carries no usable name.
pub fn content_disposition_file_name(header: &str) -> Option<String> {
    let mut plain = None;
    for part in header.split(';').map(str::trim) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        if key == "filename*" {
            // charset'lang'percent-encoded
            let encoded = value.splitn(3, '\'').nth(2).unwrap_or(value);
            if let Some(name) = usable_file_name(&percent_decode(encoded)) {
                return Some(name);
            }
        } else if key == "filename" {
            plain = usable_file_name(value.trim_matches('"')).or(plain);
        }
    }
    plain
}

/// The sanitized name, unless nothing writable is left of it (`out/`,
/// `..`).
fn usable_file_name(name: &str) -> Option<String> {
    let name = sanitize_file_name(name);
    (!matches!(name.trim(), "" | "." | "..")).then_some(name)
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let Some(b) = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok())
        {
            out.push(b);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Keep only the final path component and replace characters that are
/// not portable in file names.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
