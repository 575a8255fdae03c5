use super::Environment;

/// Replace `$NAME` and `${NAME}` with their values; unset names expand to
/// nothing. `\$` yields a literal dollar sign and a `$` not followed by a
/// name is kept as is. Values are not expanded again.
pub fn expand_variables(text: &str, env: &Environment) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && chars.get(i + 1) == Some(&'$') {
            out.push('$');
            i += 2;
            continue;
        }
        if c != '$' {
            out.push(c);
            i += 1;
            continue;
        }

        if chars.get(i + 1) == Some(&'{') {
            if let Some(close) = chars[i + 2..].iter().position(|&c| c == '}') {
                let name: String = chars[i + 2..i + 2 + close].iter().collect();
                if super::is_valid_name(&name) {
                    out.push_str(env.get(&name).unwrap_or(""));
                    i += close + 3;
                    continue;
                }
            }
            out.push('$');
            i += 1;
            continue;
        }

        let start = i + 1;
        let mut end = start;
        while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
            if end == start && chars[end].is_ascii_digit() {
                break;
            }
            end += 1;
        }
        if end == start {
            out.push('$');
            i += 1;
        } else {
            let name: String = chars[start..end].iter().collect();
            out.push_str(env.get(&name).unwrap_or(""));
            i = end;
        }
    }
    out
}
