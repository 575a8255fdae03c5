// src/permissions/mode.rs
use thiserror::Error;

use super::{SGID, STICKY, SUID};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("invalid mode: '{0}'")]
    Invalid(String),
}

/// Parse a 3-digit (rwx only) or 4-digit (special + rwx) octal mode.
pub fn parse_octal(s: &str) -> Result<u32, ModeError> {
    if !(s.len() == 3 || s.len() == 4) || !s.chars().all(|c| ('0'..='7').contains(&c)) {
        return Err(ModeError::Invalid(s.to_string()));
    }
    let value = u32::from_str_radix(s, 8).map_err(|_| ModeError::Invalid(s.to_string()))?;
    if value > 0o7777 {
        return Err(ModeError::Invalid(s.to_string()));
    }
    Ok(value)
}

/// Parse either an octal or a symbolic mode relative to `current`.
pub fn parse_mode(spec: &str, current: u32, is_dir: bool) -> Result<u32, ModeError> {
    if spec.chars().all(|c| c.is_ascii_digit()) {
        parse_octal(spec)
    } else {
        apply_symbolic(spec, current, is_dir)
    }
}

#[derive(Default, Clone, Copy)]
struct Who {
    user: bool,
    group: bool,
    other: bool,
}

impl Who {
    fn all() -> Self {
        Self { user: true, group: true, other: true }
    }

    /// rwx bits of every targeted class.
    fn spread(self, rwx: u32) -> u32 {
        let mut bits = 0;
        if self.user {
            bits |= rwx << 6;
        }
        if self.group {
            bits |= rwx << 3;
        }
        if self.other {
            bits |= rwx;
        }
        bits
    }
}

/// Apply a comma-chained symbolic mode such as `u+x,g-w,o=r` to `current`.
///
/// Each clause is `[ugoa]*` followed by one or more `[+-=][rwxXst]*` actions.
/// `=` replaces the rwx bits of the targeted classes and leaves special bits
/// alone unless `s`/`t` appear in the same action.
pub fn apply_symbolic(spec: &str, current: u32, is_dir: bool) -> Result<u32, ModeError> {
    let invalid = || ModeError::Invalid(spec.to_string());
    if spec.is_empty() {
        return Err(invalid());
    }

    let mut mode = current & 0o7777;
    for clause in spec.split(',') {
        let mut chars = clause.chars().peekable();

        let mut who = Who::default();
        let mut any_who = false;
        while let Some(&c) = chars.peek() {
            match c {
                'u' => who.user = true,
                'g' => who.group = true,
                'o' => who.other = true,
                'a' => who = Who::all(),
                _ => break,
            }
            any_who = true;
            chars.next();
        }
        if !any_who {
            who = Who::all();
        }

        let mut saw_action = false;
        while let Some(op) = chars.next() {
            if !matches!(op, '+' | '-' | '=') {
                return Err(invalid());
            }
            saw_action = true;

            let mut rwx = 0;
            let mut special = 0;
            let mut touched_special = false;
            while let Some(&c) = chars.peek() {
                match c {
                    'r' => rwx |= 4,
                    'w' => rwx |= 2,
                    'x' => rwx |= 1,
                    'X' => {
                        if is_dir || mode & 0o111 != 0 {
                            rwx |= 1;
                        }
                    }
                    's' => {
                        touched_special = true;
                        if who.user {
                            special |= SUID;
                        }
                        if who.group {
                            special |= SGID;
                        }
                    }
                    't' => {
                        touched_special = true;
                        if who.other {
                            special |= STICKY;
                        }
                    }
                    _ => break,
                }
                chars.next();
            }

            let bits = who.spread(rwx);
            match op {
                '+' => mode |= bits | special,
                '-' => mode &= !(bits | special),
                _ => {
                    mode &= !who.spread(0o7);
                    mode |= bits;
                    if touched_special {
                        mode |= special;
                    }
                }
            }
        }
        if !saw_action {
            return Err(invalid());
        }
    }
    Ok(mode)
}

/// Render the nine permission characters, e.g. `rwsr-xr-T`.
pub fn mode_to_string(mode: u32) -> String {
    let triplet = |shift: u32, special: bool, set: char, unset: char| {
        let bits = (mode >> shift) & 0o7;
        let r = if bits & 4 != 0 { 'r' } else { '-' };
        let w = if bits & 2 != 0 { 'w' } else { '-' };
        let exec = bits & 1 != 0;
        let x = match (special, exec) {
            (true, true) => set,
            (true, false) => unset,
            (false, true) => 'x',
            (false, false) => '-',
        };
        [r, w, x]
    };

    triplet(6, mode & SUID != 0, 's', 'S')
        .into_iter()
        .chain(triplet(3, mode & SGID != 0, 's', 'S'))
        .chain(triplet(0, mode & STICKY != 0, 't', 'T'))
        .collect()
}

/// `ls -l` style mode column with the file-type prefix.
pub fn format_mode(mode: u32, is_dir: bool) -> String {
    format!("{}{}", if is_dir { 'd' } else { '-' }, mode_to_string(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_octal() {
        assert_eq!(parse_octal("755"), Ok(0o755));
        assert_eq!(parse_octal("0644"), Ok(0o644));
        assert_eq!(parse_octal("4755"), Ok(0o4755));
        assert!(parse_octal("75").is_err());
        assert!(parse_octal("77777").is_err());
        assert!(parse_octal("789").is_err());
        assert!(parse_octal("").is_err());
    }

    #[test]
    fn test_octal_renders_like_ls() {
        for (m, s) in [
            ("755", "rwxr-xr-x"),
            ("644", "rw-r--r--"),
            ("700", "rwx------"),
            ("000", "---------"),
            ("777", "rwxrwxrwx"),
            ("421", "r---w---x"),
        ] {
            assert_eq!(mode_to_string(parse_octal(m).unwrap()), s, "mode {}", m);
        }
    }

    #[test]
    fn test_special_bits_rendering() {
        assert_eq!(mode_to_string(0o4755), "rwsr-xr-x");
        assert_eq!(mode_to_string(0o4655), "rwSr-xr-x");
        assert_eq!(mode_to_string(0o2755), "rwxr-sr-x");
        assert_eq!(mode_to_string(0o2745), "rwxr-Sr-x");
        assert_eq!(mode_to_string(0o1777), "rwxrwxrwt");
        assert_eq!(mode_to_string(0o1776), "rwxrwxrwT");
        assert_eq!(format_mode(0o755, true), "drwxr-xr-x");
        assert_eq!(format_mode(0o644, false), "-rw-r--r--");
    }

    #[test]
    fn test_symbolic_plus_minus() {
        assert_eq!(apply_symbolic("u+x", 0o644, false), Ok(0o744));
        assert_eq!(apply_symbolic("g-w", 0o664, false), Ok(0o644));
        assert_eq!(apply_symbolic("+x", 0o644, false), Ok(0o755));
        assert_eq!(apply_symbolic("a-r", 0o644, false), Ok(0o200));
        assert_eq!(apply_symbolic("go-rwx", 0o755, false), Ok(0o700));
    }

    #[test]
    fn test_symbolic_equals_replaces_targeted_classes() {
        assert_eq!(apply_symbolic("a=r", 0o755, false), Ok(0o444));
        assert_eq!(apply_symbolic("o=", 0o757, false), Ok(0o750));
        assert_eq!(apply_symbolic("u=rwx,g=rx,o=", 0o000, false), Ok(0o750));
    }

    #[test]
    fn test_symbolic_equals_keeps_special_bits() {
        assert_eq!(apply_symbolic("u=rw", 0o4755, false), Ok(0o4655));
        assert_eq!(apply_symbolic("u=rwxs", 0o0755, false), Ok(0o4755));
    }

    #[test]
    fn test_symbolic_special_bits() {
        assert_eq!(apply_symbolic("u+s", 0o755, false), Ok(0o4755));
        assert_eq!(apply_symbolic("g+s", 0o755, false), Ok(0o2755));
        assert_eq!(apply_symbolic("+t", 0o777, true), Ok(0o1777));
        assert_eq!(apply_symbolic("o-t", 0o1777, true), Ok(0o777));
        assert_eq!(apply_symbolic("u-s", 0o4755, false), Ok(0o755));
    }

    #[test]
    fn test_symbolic_capital_x() {
        assert_eq!(apply_symbolic("a+X", 0o644, false), Ok(0o644));
        assert_eq!(apply_symbolic("a+X", 0o644, true), Ok(0o755));
        assert_eq!(apply_symbolic("a+X", 0o744, false), Ok(0o755));
    }

    #[test]
    fn test_symbolic_invalid() {
        for bad in ["", "u", "x+u", "u+z", "u+x,", "ugo", "+x,,g-w"] {
            assert!(apply_symbolic(bad, 0o644, false).is_err(), "{:?} should fail", bad);
        }
    }

    #[test]
    fn test_parse_mode_dispatches() {
        assert_eq!(parse_mode("600", 0o777, false), Ok(0o600));
        assert_eq!(parse_mode("u-w", 0o644, false), Ok(0o444));
        assert!(parse_mode("9999", 0o644, false).is_err());
    }
}
