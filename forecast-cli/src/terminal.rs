use forecast_core::{DailyWeatherView, DaySummary, RenderPort};

/// Prints the weather card and day strip to stdout, feedback to stderr.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    error_visible: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderPort for TerminalRenderer {
    fn render_weather_panel(&mut self, view: &DailyWeatherView) {
        println!();
        println!("  {}  {}", view.day_name, view.date_text);
        println!("  {}", view.location);
        println!();
        println!("  {}  {}", view.temperature, view.description);
        println!("  {}", view.icon_url);
        println!();
        println!(
            "  Cloudiness {} %   Humidity {} %   Wind {}",
            view.cloudiness_pct, view.humidity_pct, view.wind_speed
        );
    }

    fn render_day_list(&mut self, days: &[DaySummary], active: usize) {
        let strip: Vec<String> = days
            .iter()
            .map(|d| {
                if d.day == active {
                    format!("[{} {}]", d.day_name, d.temperature)
                } else {
                    format!(" {} {} ", d.day_name, d.temperature)
                }
            })
            .collect();

        println!();
        println!("  {}", strip.join(" "));
        println!();
    }

    fn show_error(&mut self, message: &str) {
        self.error_visible = true;
        eprintln!("! {message}");
    }

    fn hide_error(&mut self) {
        self.error_visible = false;
    }

    fn hide_cards(&mut self) {
        tracing::debug!("cards hidden");
    }

    fn announce(&mut self, text: &str) {
        if !text.is_empty() {
            eprintln!("{text}...");
        }
    }

    fn clear_location_input(&mut self) {
        tracing::debug!("location input cleared");
    }

    fn focus_location_input(&mut self) {
        tracing::debug!(error_visible = self.error_visible, "location input focused");
    }
}
