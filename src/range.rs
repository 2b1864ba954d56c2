//! Range formatting over a whole-file fixer.
//!
//! The fixer only accepts complete files, so a selected sub-range is
//! wrapped into a synthetically complete unit: boundary whitespace is
//! captured and stripped (the fixer normalizes file-boundary whitespace
//! and would corrupt the surrounding document), and an opening `<?php`
//! tag is synthesized when the selection does not start with one.

use crate::errors::FixerError;

pub const PHP_OPEN_TAG: &str = "<?php";

const BOUNDARY_WHITESPACE: &[char] = &[' ', '\t', '\r', '\n'];

/// Format a selected range through `fix`, preserving the range's exact
/// leading and trailing whitespace runs.
///
/// Returns `None` for whitespace-only selections, when fixing fails
/// (range failures never interrupt typing), or when the final text is
/// identical to the input.
pub fn format_range<F>(range_text: &str, fix: F) -> Option<String>
where
    F: FnOnce(&str) -> Result<String, FixerError>,
{
    let without_lead = range_text.trim_start_matches(BOUNDARY_WHITESPACE);
    if without_lead.is_empty() {
        return None;
    }
    let leading = &range_text[..range_text.len() - without_lead.len()];
    let body = without_lead.trim_end_matches(BOUNDARY_WHITESPACE);
    let trailing = &without_lead[body.len()..];

    let synthesized = !body.starts_with(PHP_OPEN_TAG);
    let input = if synthesized {
        format!("{PHP_OPEN_TAG}\n{body}")
    } else {
        body.to_string()
    };

    let fixed = match fix(&input) {
        Ok(fixed) => fixed,
        Err(err) => {
            log::debug!("range format produced no change: {err}");
            return None;
        }
    };

    let fixed = if synthesized { strip_synthesized_open_tag(&fixed) } else { fixed.as_str() };
    // The fixer's own file-boundary whitespace is discarded in favor of
    // the captured runs.
    let fixed = fixed.trim_matches(BOUNDARY_WHITESPACE);

    let replacement = format!("{leading}{fixed}{trailing}");
    if replacement == range_text { None } else { Some(replacement) }
}

/// Remove exactly the synthesized opening tag line plus any immediately
/// following blank lines.
fn strip_synthesized_open_tag(text: &str) -> &str {
    let mut rest = text.strip_prefix(PHP_OPEN_TAG).unwrap_or(text);
    while let Some(next) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
        rest = next;
    }
    rest
}
