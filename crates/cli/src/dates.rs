use chrono::NaiveDate;

const FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Parse `YYYY-MM-DD` or `DD.MM.YYYY`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| format!("'{}' is not a date (expected YYYY-MM-DD or DD.MM.YYYY)", raw))
}
