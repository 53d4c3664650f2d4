//! How strict to be with a snapshot, based on its date.

use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use log::debug;
use regex::Regex;

/// How much of the validation a workbook has to pass.
///
/// The publishing tools became stricter over the years. Replaying old
/// snapshots at the current strictness would reject data that was accepted
/// at the time.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, PartialOrd, Ord)]
pub enum VerifyLevel {
    /// Anything that loads is accepted, the reporting structure is not
    /// checked.
    Load,
    /// Errors are reported but do not prevent the display.
    LoadAndDisplay,
    /// Any error rejects the workbook.
    LoadDisplayAndBeValid,
}

impl VerifyLevel {
    pub fn checks_graph(&self) -> bool {
        *self != VerifyLevel::Load
    }

    pub fn requires_validity(&self) -> bool {
        *self == VerifyLevel::LoadDisplayAndBeValid
    }
}

impl Default for VerifyLevel {
    fn default() -> VerifyLevel {
        VerifyLevel::LoadDisplayAndBeValid
    }
}

impl Display for VerifyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VerifyLevel::Load => "load",
            VerifyLevel::LoadAndDisplay => "load and display",
            VerifyLevel::LoadDisplayAndBeValid => "load, display and be valid",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for VerifyLevel {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<VerifyLevel, PolicyError> {
        match s {
            "load" => Ok(VerifyLevel::Load),
            "load and display" => Ok(VerifyLevel::LoadAndDisplay),
            "load, display and be valid" => Ok(VerifyLevel::LoadDisplayAndBeValid),
            _ => Err(PolicyError::UnknownLevel(s.to_string())),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PolicyError {
    /// Not a YYYY-MM-DD or DD-MM-YYYY date.
    UnparseableDate(String),
    NoDateInFilename(String),
    UnknownLevel(String),
}

impl Error for PolicyError {}

impl Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyError::UnparseableDate(s) => {
                write!(f, "Could not parse graph YYYY-MM-DD / DD-MM-YYYY: {:?}", s)
            }
            PolicyError::NoDateInFilename(s) => write!(f, "Cannot find date in filename: {}", s),
            PolicyError::UnknownLevel(s) => write!(f, "Unknown verify level: {:?}", s),
        }
    }
}

static YEAR_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})").expect("Invalid date regex")
});

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<day>\d{2})-(?P<month>\d{2})-(?P<year>\d{4})").expect("Invalid date regex")
});

fn date_from_captures(caps: &regex::Captures) -> Option<NaiveDate> {
    let year = caps.name("year")?.as_str().parse::<i32>().ok()?;
    let month = caps.name("month")?.as_str().parse::<u32>().ok()?;
    let day = caps.name("day")?.as_str().parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses a snapshot date written as YYYY-MM-DD or DD-MM-YYYY.
pub fn parse_graph_date(text: &str) -> Result<NaiveDate, PolicyError> {
    let text = text.trim();
    for re in [&*YEAR_FIRST, &*DAY_FIRST] {
        if let Some(caps) = re.captures(text) {
            let whole = caps.get(0).map(|m| m.as_str().len()).unwrap_or_default();
            if whole == text.len() {
                if let Some(date) = date_from_captures(&caps) {
                    return Ok(date);
                }
            }
        }
    }
    Err(PolicyError::UnparseableDate(text.to_string()))
}

/// Finds the snapshot date embedded in a file name, such as
/// `organogram-2016-09-30.xls`, and returns it as YYYY-MM-DD.
pub fn date_from_filename(filename: &str) -> Result<String, PolicyError> {
    let date = YEAR_FIRST
        .captures(filename)
        .or_else(|| DAY_FIRST.captures(filename))
        .and_then(|caps| date_from_captures(&caps));
    match date {
        Some(d) => Ok(d.format("%Y-%m-%d").to_string()),
        None => Err(PolicyError::NoDateInFilename(filename.to_string())),
    }
}

/// The verify level for a snapshot date.
///
/// 2011 data is taken as it is, data up to March 2016 may be displayed with
/// errors and anything later has to be valid.
pub fn verify_level_for(date: NaiveDate) -> VerifyLevel {
    let level = match (date.year(), date.month()) {
        (y, _) if y <= 2011 => VerifyLevel::Load,
        (y, _) if y <= 2015 => VerifyLevel::LoadAndDisplay,
        (2016, m) if m <= 3 => VerifyLevel::LoadAndDisplay,
        _ => VerifyLevel::LoadDisplayAndBeValid,
    };
    debug!("verify_level_for: {} -> {}", date, level);
    level
}

/// The verify level for a snapshot date written as YYYY-MM-DD or DD-MM-YYYY.
pub fn get_verify_level(date: &str) -> Result<VerifyLevel, PolicyError> {
    Ok(verify_level_for(parse_graph_date(date)?))
}
