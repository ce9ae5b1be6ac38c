//! Text splice

use super::anchor::InsertionPoint;

/// Insert rendered entries at an insertion point
///
/// Returns `None` when there is nothing to insert. Each entry goes on its own
/// line with a trailing `,`; the text before and after the insertion point is
/// kept byte for byte, apart from the `,` added after an anchor that lacked
/// one.
#[must_use]
pub fn splice(
    source: &str,
    point: &InsertionPoint,
    rendered: &[String],
    match_indent: bool,
) -> Option<String> {
    if rendered.is_empty() {
        return None;
    }

    let (head, tail) = source.split_at(point.offset);
    let indent = if match_indent { point.indent.as_str() } else { "" };

    let mut out = String::new();
    out.push_str(head);
    if !head.ends_with(',') {
        out.push(',');
    }
    out.push_str(point.line_ending);

    let lines: Vec<String> = rendered
        .iter()
        .map(|entry| format!("{indent}{entry},"))
        .collect();
    out.push_str(lines.join(point.line_ending).trim_end());
    out.push_str(tail);

    Some(out)
}
