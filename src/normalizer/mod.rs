//! Code normalization: strips markdown fences and surrounding whitespace.

/// Reduce a raw code payload to bare source.
///
/// Model output frequently arrives wrapped in a fenced code block even when
/// the prompt forbids it. Removes an opening fence (with or without a
/// language tag), a closing fence, and surrounding whitespace. The result
/// may be empty; callers must treat that as "no code", not as a program.
pub fn normalize(raw: &str) -> String {
    let mut code = raw.trim();
    if let Some(rest) = code.strip_prefix("```") {
        code = strip_fence_line(rest).trim_start();
    }
    if let Some(rest) = code.strip_suffix("```") {
        code = rest;
    }
    code.trim().to_string()
}

/// After the opening backticks, a language tag runs to the end of the fence
/// line. A fence line that holds anything else is kept as code.
fn strip_fence_line(rest: &str) -> &str {
    match rest.split_once('\n') {
        Some((first, remainder)) if is_language_tag(first.trim_end()) => remainder,
        _ => rest,
    }
}

fn is_language_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_' | '.'))
}
