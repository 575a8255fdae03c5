// src/commands/date/mod.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::commands::args::ArgSpec;
use crate::commands::{Command, CommandContext, CommandResult};
use crate::interpreter::errors::ShellError;

pub struct DateCommand;

pub const DEFAULT_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";

/// Conversion characters passed through to chrono; anything else after `%`
/// is printed literally.
const KNOWN_SPECIFIERS: &str = "aAbBcCdDeFhHIjklmMnNpPrRsStTuUwWyYzZ%";

/// Resolve a `-d` argument: `now`, `today`, `yesterday`, `tomorrow`,
/// `@EPOCH`, RFC 3339, `YYYY-MM-DD[ HH:MM[:SS]]` or a bare epoch.
pub fn parse_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    let midnight = |days: i64| {
        let day = now.with_timezone(&Local).date_naive() + Duration::days(days);
        let naive = day.and_hms_opt(0, 0, 0)?;
        Local.from_local_datetime(&naive).single().map(|d| d.with_timezone(&Utc))
    };
    match text.to_lowercase().as_str() {
        "now" => return Some(now),
        "today" => return midnight(0),
        "yesterday" => return midnight(-1),
        "tomorrow" => return midnight(1),
        _ => {}
    }
    if let Ok(secs) = text.trim_start_matches('@').parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)))?;
    Local.from_local_datetime(&naive).single().map(|d| d.with_timezone(&Utc))
}

/// Render `format` strftime-style. `%Z` prints `zone` rather than an offset.
pub fn format_date(when: DateTime<FixedOffset>, format: &str, zone: &str) -> String {
    let mut out = String::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('Z') => out.push_str(zone),
            Some(':') => match chars.next() {
                Some('z') => out.push_str(&when.format("%:z").to_string()),
                Some(other) => {
                    out.push_str("%:");
                    out.push(other);
                }
                None => out.push_str("%:"),
            },
            Some(spec) if KNOWN_SPECIFIERS.contains(spec) => {
                out.push_str(&when.format(&format!("%{}", spec)).to_string());
            }
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}

#[async_trait]
impl Command for DateCommand {
    fn name(&self) -> &'static str {
        "date"
    }

    fn summary(&self) -> &'static str {
        "print the system date and time"
    }

    fn usage(&self) -> &'static str {
        "date [-uIR] [-d STRING] [+FORMAT]"
    }

    fn spec(&self) -> Option<ArgSpec> {
        Some(ArgSpec::flags("uIRd").values("d").max(1))
    }

    async fn execute(&self, ctx: CommandContext<'_>) -> CommandResult {
        let format = match ctx.args.operands.first() {
            Some(op) => match op.strip_prefix('+') {
                Some(f) => Some(f.to_string()),
                None => return Err(ShellError::invalid(format!("date: invalid date '{}'", op))),
            },
            None => None,
        };

        let now = Utc::now();
        let instant = match ctx.args.value('d') {
            Some(text) => {
                parse_date(text, now).ok_or_else(|| ShellError::invalid(format!("date: invalid date '{}'", text)))?
            }
            None => now,
        };

        let (when, zone) = if ctx.args.has_flag('u') {
            (instant.fixed_offset(), "UTC".to_string())
        } else {
            let local = instant.with_timezone(&Local);
            let zone = local.format("%Z").to_string();
            (local.fixed_offset(), zone)
        };

        let format = if ctx.args.has_flag('I') {
            "%Y-%m-%dT%H:%M:%S%:z".to_string()
        } else if ctx.args.has_flag('R') {
            "%a, %d %b %Y %H:%M:%S %z".to_string()
        } else {
            format.unwrap_or_else(|| DEFAULT_FORMAT.to_string())
        };
        Ok(format!("{}\n", format_date(when, &format, &zone)))
    }
}
