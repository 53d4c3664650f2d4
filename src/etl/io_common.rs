// Names and dates, as they are written on disk.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

static ORG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ .:/&]").expect("Invalid separator regex"));
static ORG_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-_]").expect("Invalid name regex"));
static PATH_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\-_]").expect("Invalid name regex"));
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("Invalid regex"));
static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("Invalid regex"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex"));

/// The file name of a path, without the directories.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// The file name of a path, without the directories and the extension.
pub fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn collapse_runs(s: &str) -> String {
    let s = DASHES.replace_all(s, "-");
    UNDERSCORES.replace_all(&s, "_").to_string()
}

/// A name that is safe in a file name or an identifier:
/// `HM Revenue & Customs` becomes `hm_revenue_customs` with `_` as the separator.
pub fn munge_org(name: &str, separator: char) -> String {
    let lower = name.to_lowercase();
    let sep = separator.to_string();
    let separated = ORG_SEPARATORS.replace_all(&lower, sep.as_str());
    let safe = ORG_UNSAFE.replace_all(&separated, "");
    collapse_runs(&safe)
}

/// The storage name of a legacy upload, made of the three last segments of
/// its path: `/data/acas/2011-09-30/Organogram.xls` becomes
/// `acas_2011-09-30_Organogram`.
///
/// Returns `None` if the path does not have exactly five segments.
pub fn munge_xls_path(original_path: &str) -> Option<String> {
    let parts: Vec<&str> = original_path.split('/').collect();
    if parts.len() != 5 {
        return None;
    }
    let name = format!("{}__{}__{}", parts[2], parts[3], parts[4]);
    let name = match name.rsplit_once('.') {
        Some((head, _extension)) => head.to_string(),
        None => name,
    };
    let separated = ORG_SEPARATORS.replace_all(&name, "-");
    let safe = PATH_UNSAFE.replace_all(&separated, "");
    Some(collapse_runs(&safe))
}

/// `30/09/2011` -> `2011-09-30`
pub fn date_to_year_first(date: &str) -> String {
    let mut parts: Vec<&str> = date.trim().split('/').collect();
    parts.reverse();
    parts.join("-")
}

/// Reads a timestamp from the groups of digits of a text, in the order
/// year, month, day, hour, minute, second, microsecond. The last group is
/// ignored: `2015-03-10 12:34:56.789` is read as 10 March 2015, 12:34:56.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let mut numbers: Vec<u32> = DIGITS
        .find_iter(text)
        .map(|m| m.as_str().parse::<u32>())
        .collect::<Result<Vec<u32>, _>>()
        .ok()?;
    numbers.pop();
    if numbers.len() < 3 {
        return None;
    }
    let at = |idx: usize| numbers.get(idx).cloned().unwrap_or(0);
    NaiveDate::from_ymd_opt(at(0) as i32, at(1), at(2))?.and_hms_micro_opt(at(3), at(4), at(5), at(6))
}
