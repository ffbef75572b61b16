use weather_core::CurrentConditions;

use crate::view::ViewState;

/// Round to the nearest integer, halves towards positive infinity.
fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    // `value - floor` is exact; adding 0.5 first is not.
    if value - floor >= 0.5 { floor as i64 + 1 } else { floor as i64 }
}

/// One decimal place, with exact ties rounded away from zero.
fn one_decimal(value: f64) -> String {
    // Only odd multiples of 0.25 sit exactly halfway between two tenths.
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        let up = (value.abs() * 10.0 + 0.5).floor() / 10.0;
        return format!("{:.1}", up.copysign(value));
    }
    format!("{value:.1}")
}

/// The weather card shown after a successful search.
pub fn weather_card(c: &CurrentConditions) -> String {
    let rows = [
        ("Humidity", format!("{}%", c.humidity)),
        ("Wind", format!("{} m/s", c.wind_speed_meters_per_second)),
        ("Feels Like", format!("{}°C", round_half_up(c.feels_like))),
        ("Visibility", format!("{} km", one_decimal(c.visibility_meters / 1000.0))),
    ];

    let mut out = format!(
        "{}, {}\n{}°C\n{}\n\n",
        c.name,
        c.country,
        round_half_up(c.temperature),
        c.condition_text
    );
    for (label, value) in rows {
        out.push_str(&format!("{label:<12}{value}\n"));
    }
    out
}

/// Text for any view state; empty while idle.
pub fn render(state: &ViewState) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading { .. } => "Loading...".to_string(),
        ViewState::Success(conditions) => weather_card(conditions),
        ViewState::Error(message) => format!("Error: {message}\n"),
    }
}
