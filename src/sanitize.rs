/// Removes the markdown fence the model sometimes wraps its document in.
///
/// Only a leading fence line (three or more backticks, optionally followed by a
/// language tag such as `html`) and a trailing fence are removed; fences inside
/// the document are left alone.
pub fn strip_code_fences(text: &str) -> String {
    let mut body = text.trim();

    if body.starts_with("```") {
        let ticks = body.chars().take_while(|c| *c == '`').count();
        let rest = &body[ticks..];
        body = match rest.find('\n') {
            // Anything after the backticks on that line is the language tag
            Some(newline) if is_info_string(&rest[..newline]) => &rest[newline + 1..],
            Some(_) => body,
            None if is_info_string(rest) => "",
            None => body.trim_start_matches('`'),
        };
    }

    let trimmed = body.trim_end();
    if let Some(stripped) = trimmed.strip_suffix("```") {
        body = stripped.trim_end_matches('`');
    }

    body.trim().to_string()
}

fn is_info_string(s: &str) -> bool {
    let s = s.trim();
    s.is_empty()
        || s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}
