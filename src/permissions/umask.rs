use super::mode::ModeError;

pub const DEFAULT_FILE_MODE: u32 = 0o666;
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// The file creation mask, 9 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Umask(u32);

impl Default for Umask {
    fn default() -> Self {
        Umask(0o022)
    }
}

impl Umask {
    pub fn new(mask: u32) -> Result<Self, ModeError> {
        if mask > 0o777 {
            return Err(ModeError::Invalid(format!("{:o}", mask)));
        }
        Ok(Umask(mask))
    }

    /// Parse 1 to 4 octal digits, e.g. `022` or `0077`.
    pub fn parse(s: &str) -> Result<Self, ModeError> {
        if s.is_empty() || s.len() > 4 || !s.chars().all(|c| ('0'..='7').contains(&c)) {
            return Err(ModeError::Invalid(s.to_string()));
        }
        let mask = u32::from_str_radix(s, 8).map_err(|_| ModeError::Invalid(s.to_string()))?;
        if mask > 0o777 {
            return Err(ModeError::Invalid(s.to_string()));
        }
        Ok(Umask(mask))
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn apply(self, default_mode: u32) -> u32 {
        default_mode & !self.0
    }

    pub fn file_mode(self) -> u32 {
        self.apply(DEFAULT_FILE_MODE)
    }

    pub fn dir_mode(self) -> u32 {
        self.apply(DEFAULT_DIR_MODE)
    }

    /// Symbolic form of the permissions the mask leaves, e.g. `u=rwx,g=rx,o=rx`.
    pub fn symbolic(self) -> String {
        let allowed = !self.0 & 0o777;
        let class = |shift: u32| {
            let bits = (allowed >> shift) & 0o7;
            let mut s = String::new();
            if bits & 4 != 0 {
                s.push('r');
            }
            if bits & 2 != 0 {
                s.push('w');
            }
            if bits & 1 != 0 {
                s.push('x');
            }
            s
        };
        format!("u={},g={},o={}", class(6), class(3), class(0))
    }
}

impl std::fmt::Display for Umask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}
