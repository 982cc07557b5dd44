//! Presentation helpers: small pure formatters shared by anything that
//! renders weather values for humans.

/// "25°" (rounded).
pub fn temperature(temp_c: f64) -> String {
    format!("{}°", temp_c.round() as i64)
}

/// m/s to a whole-number "km/h" string.
pub fn wind_speed(mps: f64) -> String {
    format!("{} km/h", (mps * 3.6).round() as i64)
}

/// Degrees to an 8-point compass direction.
pub fn wind_direction(degrees: u16) -> &'static str {
    const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = ((f64::from(degrees) / 45.0).round() as usize) % 8;
    DIRECTIONS[index]
}

/// "65%".
pub fn humidity(pct: u8) -> String {
    format!("{pct}%")
}

/// "1013 hPa".
pub fn pressure(hpa: u32) -> String {
    format!("{hpa} hPa")
}

/// Uppercase the first letter of each whitespace-separated word, as the
/// OpenWeather lowercase descriptions ("scattered clouds") want for display.
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// OpenWeather icon code ("01d", "10n", ...) to a terminal glyph.
pub fn condition_symbol(icon_code: &str) -> &'static str {
    match icon_code {
        "01d" => "☀",
        "01n" => "🌙",
        "02d" => "🌤",
        "02n" => "☁",
        "03d" | "03n" => "☁",
        "04d" | "04n" => "🌥",
        "09d" | "09n" => "🌧",
        "10d" | "10n" => "🌦",
        "11d" | "11n" => "⛈",
        "13d" | "13n" => "❄",
        "50d" | "50n" => "🌫",
        _ => "🌤",
    }
}

/// Named presentation theme per condition group, the terminal counterpart of
/// a per-condition background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionTheme {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
}

/// Pick a theme from the condition's `main` value. Unknown conditions fall
/// back to `Clear`.
pub fn condition_theme(main: &str) -> ConditionTheme {
    let condition = main.to_lowercase();

    if condition.contains("thunderstorm") {
        ConditionTheme::Thunderstorm
    } else if condition.contains("drizzle") {
        ConditionTheme::Drizzle
    } else if condition.contains("rain") {
        ConditionTheme::Rain
    } else if condition.contains("snow") {
        ConditionTheme::Snow
    } else if condition.contains("cloud") {
        ConditionTheme::Clouds
    } else if condition.contains("mist")
        || condition.contains("fog")
        || condition.contains("haze")
    {
        ConditionTheme::Mist
    } else {
        ConditionTheme::Clear
    }
}
