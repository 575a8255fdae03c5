// src/commands/sed/types.rs
use regex_lite::Regex;

#[derive(Debug, Clone)]
pub enum Address {
    /// 1-based line number.
    Line(usize),
    /// `$`
    Last,
    Pattern(Regex),
}

#[derive(Debug, Clone)]
pub struct AddressRange {
    pub start: Address,
    pub end: Option<Address>,
    /// `addr!` selects the lines the address does not.
    pub negated: bool,
}

#[derive(Debug, Clone)]
pub enum Action {
    Substitute {
        regex: Regex,
        /// Replacement in `Captures::expand` syntax.
        replacement: String,
        global: bool,
        /// Replace starting at this match (1-based).
        occurrence: usize,
    },
    Delete,
    Print,
}

/// One command of a script: an optional address and what to do.
#[derive(Debug, Clone)]
pub struct SedExpr {
    pub address: Option<AddressRange>,
    pub action: Action,
}
