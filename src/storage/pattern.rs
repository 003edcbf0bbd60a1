//! Graphite-style metric path globs

use regex::Regex;

use super::database::StoreError;

/// Compile a metric glob (`*`, `?`, `[abc]`, `{a,b}`) into an anchored regex.
///
/// Wildcards never cross a `.` node separator.
pub fn glob_to_regex(pattern: &str) -> Result<Regex, StoreError> {
    let mut re = String::with_capacity(pattern.len() * 2 + 2);
    re.push('^');

    let mut in_braces = false;
    let mut in_class = false;

    for c in pattern.chars() {
        match c {
            ']' if in_class => {
                in_class = false;
                re.push(']');
            }
            '\\' if in_class => re.push_str("\\\\"),
            c if in_class => re.push(c),
            '[' => {
                in_class = true;
                re.push('[');
            }
            '*' => re.push_str("[^.]*"),
            '?' => re.push_str("[^.]"),
            '{' if !in_braces => {
                in_braces = true;
                re.push_str("(?:");
            }
            '}' if in_braces => {
                in_braces = false;
                re.push(')');
            }
            ',' if in_braces => re.push('|'),
            c => re.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    if in_braces || in_class {
        return Err(StoreError::InvalidPattern(pattern.to_string()));
    }

    re.push('$');
    Regex::new(&re).map_err(|_| StoreError::InvalidPattern(pattern.to_string()))
}
