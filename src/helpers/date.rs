//! Date helper functions

use chrono::{DateTime, FixedOffset, Locale};
use chrono_tz::Tz;

/// Localized date formatting for rendered pages
#[derive(Debug, Clone)]
pub struct DateFormatter {
    format: String,
    locale: Locale,
    timezone: Option<Tz>,
}

impl DateFormatter {
    /// Create a formatter from a Moment.js format, a language tag and an
    /// IANA timezone name (empty keeps the timestamp's own offset)
    pub fn new(format: &str, language: &str, timezone: &str) -> Self {
        let timezone = if timezone.is_empty() {
            None
        } else {
            match timezone.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::warn!("Unknown timezone {:?}, keeping document offsets", timezone);
                    None
                }
            }
        };

        Self {
            format: moment_to_chrono_format(format),
            locale: parse_locale(language),
            timezone,
        }
    }

    /// Format a publication date; a missing date renders as an empty string
    pub fn format(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        let Some(date) = date else {
            return String::new();
        };
        match self.timezone {
            Some(tz) => date
                .with_timezone(&tz)
                .format_localized(&self.format, self.locale)
                .to_string(),
            None => date.format_localized(&self.format, self.locale).to_string(),
        }
    }
}

/// Map a language tag such as `pt-BR` to a chrono locale
pub fn parse_locale(language: &str) -> Locale {
    let normalized = language.replace('-', "_");
    Locale::try_from(normalized.as_str()).unwrap_or_else(|_| {
        tracing::debug!("Unknown locale {:?}, falling back to en_US", language);
        Locale::en_US
    })
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml(date: &DateTime<FixedOffset>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each category
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month (uppercase M)
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month (uppercase D)
        ("DDDD", "%j"),
        ("DD", "%d"),
        // Hour
        ("HH", "%H"),
        ("hh", "%I"),
        // Minute, after MM is gone
        ("mm", "%M"),
        // Second
        ("ss", "%S"),
        // Day of week
        ("dddd", "%A"),
        ("ddd", "%a"),
        // Timezone
        ("ZZ", "%z"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::document::parse_timestamp;

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("DD MMM YYYY"), "%d %b %Y");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
    }

    #[test]
    fn test_format_pt_br() {
        let formatter = DateFormatter::new("DD MMM YYYY", "pt-BR", "");
        let date = parse_timestamp("2021-03-25T19:25:28+0000").unwrap();
        assert_eq!(formatter.format(Some(&date)), "25 mar 2021");
    }

    #[test]
    fn test_format_in_timezone() {
        let formatter = DateFormatter::new("YYYY-MM-DD HH:mm", "en-US", "America/Sao_Paulo");
        let date = parse_timestamp("2021-03-26T01:30:00+0000").unwrap();
        assert_eq!(formatter.format(Some(&date)), "2021-03-25 22:30");
    }

    #[test]
    fn test_missing_date() {
        let formatter = DateFormatter::new("DD MMM YYYY", "pt-BR", "");
        assert_eq!(formatter.format(None), "");
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        assert_eq!(parse_locale("xx-YY"), Locale::en_US);
        assert_eq!(parse_locale("pt-BR"), Locale::pt_BR);
    }

    #[test]
    fn test_date_xml() {
        let date = parse_timestamp("2021-03-25T19:25:28+0000").unwrap();
        assert_eq!(date_xml(&date), "2021-03-25T19:25:28.000+00:00");
    }
}
