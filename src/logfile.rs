//! Plain text weight and intake logs.
//!
//! Weight lines are `yyyy-mm-dd value`, intake lines are
//! `yyyy-mm-dd kcal description`. Blank lines are ignored. Malformed lines
//! are logged and skipped so a single typo does not hide the rest of the log.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use log::warn;

use crate::domain::{IntakeEntry, WeightObservation};
use crate::error::ParseError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads the weight log. A missing file is an empty log.
pub fn read_weights<P: AsRef<Path>>(path: P) -> Result<Vec<WeightObservation>, ParseError> {
    read_lines(path.as_ref(), parse_weight_line)
}

/// Reads the intake log. A missing file is an empty log.
pub fn read_intake<P: AsRef<Path>>(path: P) -> Result<Vec<IntakeEntry>, ParseError> {
    read_lines(path.as_ref(), parse_intake_line)
}

fn read_lines<T>(
    path: &Path,
    parse: fn(&str, usize) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    if !path.exists() {
        log::debug!("{} does not exist yet", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ParseError::CannotRead(format!("{}: {}", path.display(), e)))?;

    let mut items = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse(line, idx + 1) {
            Ok(item) => items.push(item),
            Err(e) => warn!("{}: {}", path.display(), e),
        }
    }

    Ok(items)
}

/// Parses `yyyy-mm-dd value`.
pub fn parse_weight_line(line: &str, line_num: usize) -> Result<WeightObservation, ParseError> {
    let mut fields = line.split_whitespace();
    let date = parse_date(fields.next(), line_num)?;
    let raw = fields.next().ok_or(ParseError::MissingField {
        line: line_num,
        field: "weight",
    })?;

    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| ParseError::InvalidWeight {
            line: line_num,
            value: raw.to_string(),
        })?;

    Ok(WeightObservation::new(date, value))
}

/// Parses `yyyy-mm-dd kcal description`. Fields may be separated by any
/// run of whitespace; the description keeps its inner spacing.
pub fn parse_intake_line(line: &str, line_num: usize) -> Result<IntakeEntry, ParseError> {
    let (date_field, rest) = split_field(line.trim());
    let date = parse_date(date_field, line_num)?;
    let (raw, rest) = split_field(rest.unwrap_or_default());
    let raw = raw.ok_or(ParseError::MissingField {
        line: line_num,
        field: "kcal",
    })?;
    let kcal = raw.parse::<i64>().map_err(|_| ParseError::InvalidKcal {
        line: line_num,
        value: raw.to_string(),
    })?;
    let description = rest
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(ParseError::MissingField {
            line: line_num,
            field: "description",
        })?;

    Ok(IntakeEntry::new(date, kcal, description))
}

/// Splits off the first whitespace-separated field and the remainder.
fn split_field(text: &str) -> (Option<&str>, Option<&str>) {
    let text = text.trim_start();
    if text.is_empty() {
        return (None, None);
    }
    match text.split_once(char::is_whitespace) {
        Some((field, rest)) => (Some(field), Some(rest.trim_start())),
        None => (Some(text), None),
    }
}

fn parse_date(field: Option<&str>, line_num: usize) -> Result<NaiveDate, ParseError> {
    let raw = field.ok_or(ParseError::MissingField {
        line: line_num,
        field: "date",
    })?;
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ParseError::InvalidDate {
        line: line_num,
        value: raw.to_string(),
    })
}

/// Appends one observation to the weight log.
pub fn append_weight<P: AsRef<Path>>(path: P, obs: &WeightObservation) -> Result<(), ParseError> {
    append(path.as_ref(), &format!("{}\n", obs))
}

/// Appends one entry to the intake log.
///
/// A blank line separates days: it is written when `last_date`, the date of
/// the last entry already in the log, differs from the new entry's date.
pub fn append_intake<P: AsRef<Path>>(
    path: P,
    entry: &IntakeEntry,
    last_date: Option<NaiveDate>,
) -> Result<(), ParseError> {
    let separator = match last_date {
        Some(last) if last != entry.date => "\n",
        _ => "",
    };
    append(path.as_ref(), &format!("{}{}\n", separator, entry))
}

fn append(path: &Path, text: &str) -> Result<(), ParseError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| ParseError::CannotWrite(format!("{}: {}", parent.display(), e)))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ParseError::CannotWrite(format!("{}: {}", path.display(), e)))?;

    file.write_all(text.as_bytes())
        .map_err(|e| ParseError::CannotWrite(format!("{}: {}", path.display(), e)))
}
