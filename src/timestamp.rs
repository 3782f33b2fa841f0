//! Creation timestamps derived from document filenames.
//!
//! Exported documents are commonly named `<name>_<yyMMdd>_<HHmmss>.docx`.
//! The two digit groups become the note's creation time in the canonical
//! ENEX form `yyyyMMddTHHmmssZ`. The extension is matched case-insensitively.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Canonical ENEX timestamp format.
pub const ENEX_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Date format used for titles of notes without text.
pub const DATE_TITLE_FORMAT: &str = "%d-%m-%Y";

/// Title used when nothing better can be derived.
pub const UNTITLED: &str = "Untitled";

/// Document extension assumed by [`parse_filename_datetime`].
pub const DEFAULT_EXTENSION: &str = "docx";

fn build_filename_regex(extension: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"(?i)^(.+)_(\d{{6}})_(\d{{6}}).*\.{}",
        regex::escape(extension)
    ))
}

fn default_filename_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| build_filename_regex(DEFAULT_EXTENSION).unwrap())
}

/// Parse the timestamp embedded in a filename.
///
/// The two-digit year is always read as `2000 + yy`. Returns `None` when the
/// filename does not match or the digits do not form a valid date and time.
///
/// # Example
///
/// ```
/// use enexport::timestamp::parse_filename_datetime;
///
/// let dt = parse_filename_datetime("Notes_240518_195459.docx").unwrap();
/// assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-18 19:54:59");
/// ```
pub fn parse_filename_datetime(filename: &str) -> Option<NaiveDateTime> {
    parse_filename_datetime_with(filename, DEFAULT_EXTENSION)
}

/// Parse the timestamp embedded in a filename with the given extension.
///
/// `extension` is given without the leading dot.
pub fn parse_filename_datetime_with(filename: &str, extension: &str) -> Option<NaiveDateTime> {
    let custom;
    let re = if extension.eq_ignore_ascii_case(DEFAULT_EXTENSION) {
        default_filename_regex()
    } else {
        custom = build_filename_regex(extension).ok()?;
        &custom
    };
    let caps = re.captures(filename)?;
    let (d, t) = (&caps[2], &caps[3]);

    let field = |s: &str, range: std::ops::Range<usize>| s[range].parse::<u32>().ok();

    let year = 2000 + field(d, 0..2)? as i32;
    let date = NaiveDate::from_ymd_opt(year, field(d, 2..4)?, field(d, 4..6)?)?;
    let time = NaiveTime::from_hms_opt(field(t, 0..2)?, field(t, 2..4)?, field(t, 4..6)?)?;

    Some(NaiveDateTime::new(date, time))
}

/// Extract the canonical ENEX timestamp from a filename.
///
/// # Example
///
/// ```
/// use enexport::timestamp::extract_timestamp;
///
/// assert_eq!(
///     extract_timestamp("Notes_240518_195459.docx").as_deref(),
///     Some("20240518T195459Z")
/// );
/// assert_eq!(extract_timestamp("Notes.docx"), None);
/// ```
pub fn extract_timestamp(filename: &str) -> Option<String> {
    extract_timestamp_with(filename, DEFAULT_EXTENSION)
}

/// Extract the canonical ENEX timestamp from a filename with the given
/// extension.
pub fn extract_timestamp_with(filename: &str, extension: &str) -> Option<String> {
    match parse_filename_datetime_with(filename, extension) {
        Some(dt) => Some(dt.format(ENEX_FORMAT).to_string()),
        None => {
            log::warn!("No timestamp in filename {}, using the current time", filename);
            None
        }
    }
}

/// Render a canonical timestamp as a `dd-MM-yyyy` title.
///
/// Returns `"Untitled"` when the timestamp is absent or malformed.
pub fn date_title(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(|ts| NaiveDateTime::parse_from_str(ts, ENEX_FORMAT).ok())
        .map(|dt| dt.format(DATE_TITLE_FORMAT).to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// The current UTC time in canonical ENEX form.
pub fn now() -> String {
    Utc::now().format(ENEX_FORMAT).to_string()
}
