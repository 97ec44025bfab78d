//! Rendering port and the day-selector state it is driven by.

use chrono::NaiveDate;

/// Weather and info panel contents for the active day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyWeatherView {
    pub icon_url: String,
    /// Already carries its unit, e.g. `72 °F`.
    pub temperature: String,
    pub description: String,
    pub day_name: String,
    pub date_text: String,
    pub date: NaiveDate,
    pub location: String,
    pub cloudiness_pct: u32,
    pub humidity_pct: u32,
    pub wind_speed: String,
}

/// One entry in the day selector.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub day: usize,
    pub icon_url: String,
    pub temperature: String,
    pub day_name: String,
    /// Read out by assistive tech, e.g. `Monday 72 °F`.
    pub label: String,
}

/// Everything the controller needs from a UI.
pub trait RenderPort: Send {
    fn render_weather_panel(&mut self, view: &DailyWeatherView);

    fn render_day_list(&mut self, days: &[DaySummary], active: usize);

    /// Visible and announced "invalid form" feedback.
    fn show_error(&mut self, message: &str);

    fn hide_error(&mut self);

    fn hide_cards(&mut self);

    /// Screen-reader confirmation; an empty string clears it.
    fn announce(&mut self, text: &str);

    /// Empty the city, state and country inputs.
    fn clear_location_input(&mut self);

    fn focus_location_input(&mut self);
}

/// Tracks which day is active. Exactly one day is active at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySelector {
    active: usize,
}

impl DaySelector {
    pub fn active(&self) -> usize {
        self.active
    }

    /// Makes `day` active if it is one of `available` days.
    pub fn select(&mut self, day: usize, available: usize) -> bool {
        if day >= available {
            return false;
        }
        self.active = day;
        true
    }

    pub fn reset(&mut self) {
        self.active = 0;
    }
}

/// A key pressed while a day entry has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Space,
    Other(u32),
}

impl KeyPress {
    pub fn from_code(code: u32) -> Self {
        match code {
            13 => KeyPress::Enter,
            32 => KeyPress::Space,
            other => KeyPress::Other(other),
        }
    }

    /// Enter and Space act like a click.
    pub fn activates(&self) -> bool {
        matches!(self, KeyPress::Enter | KeyPress::Space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_starts_on_first_day() {
        assert_eq!(DaySelector::default().active(), 0);
    }

    #[test]
    fn selector_ignores_unavailable_days() {
        let mut sel = DaySelector::default();
        assert!(sel.select(3, 5));
        assert_eq!(sel.active(), 3);

        assert!(!sel.select(5, 5));
        assert!(!sel.select(0, 0));
        assert_eq!(sel.active(), 3);

        sel.reset();
        assert_eq!(sel.active(), 0);
    }

    #[test]
    fn only_enter_and_space_activate() {
        assert!(KeyPress::from_code(13).activates());
        assert!(KeyPress::from_code(32).activates());
        assert!(!KeyPress::from_code(97).activates());
        assert_eq!(KeyPress::from_code(9), KeyPress::Other(9));
    }
}
