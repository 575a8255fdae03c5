// src/commands/sort/comparator.rs
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    pub reverse: bool,
    pub numeric: bool,
    pub unique: bool,
    pub ignore_case: bool,
    pub ignore_leading_blanks: bool,
    /// 1-based field used as the sort key (`-k N`).
    pub key: Option<usize>,
    pub separator: Option<char>,
}

/// Leading numeric prefix of `s`, as `sort -n` reads it. No number is zero.
pub fn numeric_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '-' | '+' if i == 0 => {}
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    s[..end].parse().unwrap_or(0.0)
}

fn key_of<'a>(line: &'a str, opts: &SortOptions) -> &'a str {
    let Some(field) = opts.key else {
        return line;
    };
    let index = field.saturating_sub(1);
    let picked = match opts.separator {
        Some(sep) => line.split(sep).nth(index),
        None => line.split_whitespace().nth(index),
    };
    picked.unwrap_or("")
}

/// Ordering of two lines under `opts`, before `-r` is applied.
pub fn compare_lines(a: &str, b: &str, opts: &SortOptions) -> Ordering {
    let (mut ka, mut kb) = (key_of(a, opts), key_of(b, opts));
    if opts.ignore_leading_blanks {
        ka = ka.trim_start();
        kb = kb.trim_start();
    }
    let primary = if opts.numeric {
        numeric_prefix(ka)
            .partial_cmp(&numeric_prefix(kb))
            .unwrap_or(Ordering::Equal)
    } else if opts.ignore_case {
        ka.to_lowercase().cmp(&kb.to_lowercase())
    } else {
        ka.cmp(kb)
    };
    // Whole-line byte order breaks ties, like GNU sort's last-resort compare.
    primary.then_with(|| if opts.unique { Ordering::Equal } else { a.cmp(b) })
}

/// Whether two lines count as duplicates for `-u`.
pub fn same_key(a: &str, b: &str, opts: &SortOptions) -> bool {
    compare_lines(a, b, &SortOptions { unique: true, ..opts.clone() }) == Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("42 apples"), 42.0);
        assert_eq!(numeric_prefix("  -3.5x"), -3.5);
        assert_eq!(numeric_prefix("abc"), 0.0);
        assert_eq!(numeric_prefix(""), 0.0);
    }

    #[test]
    fn test_compare_modes() {
        let plain = SortOptions::default();
        assert_eq!(compare_lines("10", "9", &plain), Ordering::Less);
        let numeric = SortOptions { numeric: true, ..Default::default() };
        assert_eq!(compare_lines("10", "9", &numeric), Ordering::Greater);
        let fold = SortOptions { ignore_case: true, ..Default::default() };
        assert_eq!(compare_lines("apple", "Banana", &fold), Ordering::Less);
        assert_eq!(compare_lines("apple", "Banana", &plain), Ordering::Greater);
    }

    #[test]
    fn test_key_fields() {
        let opts = SortOptions { key: Some(2), separator: Some(':'), numeric: true, ..Default::default() };
        assert_eq!(compare_lines("root:0", "user:1000", &opts), Ordering::Less);
        assert!(same_key("a:5", "b:5", &opts));
    }
}
