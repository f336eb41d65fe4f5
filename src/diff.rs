use similar::TextDiff;

pub const DEFAULT_CONTEXT: usize = 3;

fn normalized_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Renders a unified diff of `text_a` against `text_b`.
///
/// Both inputs are compared line by line, so CRLF endings and a missing
/// final newline never show up as changes. Returns an empty string when the
/// line sequences are identical.
pub fn unified_diff(
    text_a: &str,
    text_b: &str,
    label_a: &str,
    label_b: &str,
    context: usize,
) -> String {
    if text_a.lines().eq(text_b.lines()) {
        return String::new();
    }

    let a = normalized_lines(text_a);
    let b = normalized_lines(text_b);
    let diff = TextDiff::from_lines(&a, &b);
    let rendered = diff
        .unified_diff()
        .context_radius(context)
        .missing_newline_hint(false)
        .header(label_a, label_b)
        .to_string();
    rendered
}

/// Prefixes every line of `text` with `prefix`.
pub fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(prefix);
        out.push_str(line);
    }
    out
}
