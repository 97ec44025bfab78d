//! Display helpers for the weather card: date labels, casing and icon URLs.

use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const ICON_URL_PREFIX: &str = "http://openweathermap.org/img/wn/";
const DEFAULT_ICON: &str = "01d";

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

pub fn day_name_full(date: NaiveDate) -> &'static str {
    DAY_NAMES[date.weekday().num_days_from_sunday() as usize]
}

/// Three-letter weekday, e.g. `Mon`.
pub fn day_name_short(date: NaiveDate) -> &'static str {
    &day_name_full(date)[..3]
}

/// `"Mon D, YYYY"`, e.g. `Mar 7, 2024`.
pub fn format_day_text(date: NaiveDate) -> String {
    format!("{} {}, {}", month_name(date), date.day(), date.year())
}

/// Lower-cases the input, then upper-cases the first character of every
/// whitespace-delimited token.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut token_start = true;

    for c in s.chars() {
        if token_start && !c.is_whitespace() {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        token_start = c.is_whitespace();
    }

    out
}

/// Icon image URL for an OpenWeather icon code; `01d` when absent.
pub fn icon_url(icon: Option<&str>) -> String {
    format!("{ICON_URL_PREFIX}{}@2x.png", icon.unwrap_or(DEFAULT_ICON))
}

pub fn location_text(city: &str, country: &str) -> String {
    format!("{city}, {country}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_day_text() {
        assert_eq!(format_day_text(date(2024, 3, 7)), "Mar 7, 2024");
        assert_eq!(format_day_text(date(2023, 12, 25)), "Dec 25, 2023");
    }

    #[test]
    fn day_names_follow_weekday() {
        // 2024-03-03 was a Sunday.
        assert_eq!(day_name_full(date(2024, 3, 3)), "Sunday");
        assert_eq!(day_name_full(date(2024, 3, 9)), "Saturday");
        assert_eq!(day_name_short(date(2024, 3, 6)), "Wed");
    }

    #[test]
    fn title_case_tokens() {
        assert_eq!(title_case("broken CLOUDS"), "Broken Clouds");
        assert_eq!(title_case("san  francisco"), "San  Francisco");
        assert_eq!(title_case("o'neill"), "O'neill");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn icon_url_defaults_to_clear_sky() {
        assert_eq!(icon_url(Some("10n")), "http://openweathermap.org/img/wn/10n@2x.png");
        assert_eq!(icon_url(None), "http://openweathermap.org/img/wn/01d@2x.png");
    }
}
