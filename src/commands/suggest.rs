//! Typo suggestions for unknown commands.

use std::collections::HashMap;

use lazy_static::lazy_static;

const MAX_DISTANCE: usize = 2;
const MAX_SUGGESTIONS: usize = 3;

lazy_static! {
    static ref COMMON_MISTAKES: HashMap<&'static str, &'static str> = [
        ("lst", "ls"),
        ("lss", "ls"),
        ("sl", "ls"),
        ("cta", "cat"),
        ("catt", "cat"),
        ("cler", "clear"),
        ("claer", "clear"),
        ("clera", "clear"),
        ("mkdi", "mkdir"),
        ("mkdri", "mkdir"),
        ("mkidr", "mkdir"),
        ("chmdo", "chmod"),
        ("chmodd", "chmod"),
        ("pwdd", "pwd"),
        ("pdw", "pwd"),
        ("cdd", "cd"),
        ("dc", "cd"),
        ("grpe", "grep"),
        ("gerp", "grep"),
        ("greo", "grep"),
        ("fnd", "find"),
        ("fidn", "find"),
        ("toch", "touch"),
        ("touhc", "touch"),
        ("touche", "touch"),
        ("echoo", "echo"),
        ("ehco", "echo"),
        ("rmm", "rm"),
        ("rmd", "rm"),
        ("mvv", "mv"),
        ("mve", "mv"),
        ("cpp", "cp"),
        ("cpy", "cp"),
        ("cpo", "cp"),
        ("chonw", "chown"),
        ("chowwn", "chown"),
        ("chorn", "chown"),
        ("pss", "ps"),
        ("kil", "kill"),
        ("killl", "kill"),
        ("headd", "head"),
        ("taill", "tail"),
        ("sortt", "sort"),
        ("uniqq", "uniq"),
        ("sedc", "sed"),
        ("whcih", "which"),
        ("whci", "which"),
        ("whersi", "whereis"),
        ("locaet", "locate"),
        ("locat", "locate"),
        ("slep", "sleep"),
        ("slepp", "sleep"),
        ("jobss", "jobs"),
        ("fgg", "fg"),
        ("bgg", "bg"),
        ("expotr", "export"),
        ("exprot", "export"),
        ("envv", "env"),
        ("umaks", "umask"),
        ("umassk", "umask"),
        ("statt", "stat"),
        ("stt", "stat"),
        ("suu", "su"),
        ("whoamii", "whoami"),
        ("datee", "date"),
        ("halp", "help"),
        ("hlep", "help"),
    ]
    .into_iter()
    .collect();
}

pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut row = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Known commands that `input` is probably a misspelling of.
///
/// A hit in the common-mistakes table wins outright; otherwise up to three
/// names within edit distance 2, closest first.
pub fn suggest<'a, I>(input: &str, available: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered = input.to_lowercase();
    let available: Vec<&str> = available.into_iter().collect();

    if let Some(fixed) = COMMON_MISTAKES.get(lowered.as_str()) {
        if available.contains(fixed) {
            return vec![fixed.to_string()];
        }
    }

    let mut scored: Vec<(usize, &str)> = available
        .iter()
        .map(|cmd| (levenshtein(&lowered, &cmd.to_lowercase()), *cmd))
        .filter(|(d, _)| *d > 0 && *d <= MAX_DISTANCE)
        .collect();
    scored.sort();
    scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, c)| c.to_string()).collect()
}
