/*
 *  icons.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Forecast icon link classification
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fmt;

/// Name of an icon asset (an svg file under the icon folder).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconRef(String);

impl IconRef {
    pub fn new(file: impl Into<String>) -> Self {
        IconRef(file.into())
    }

    pub fn file_name(&self) -> &str {
        &self.0
    }

    pub fn no_data() -> Self {
        IconRef::new("no_data.svg")
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a forecast icon link to the regional icon asset.
///
/// Links look like `https://api.weather.gov/icons/land/night/tsra_hi,40/rain?size=medium`.
/// The day/night segment and the first condition code decide the icon; any
/// probability suffix and secondary condition are ignored.
pub fn classify_icon_link(link: &str) -> IconRef {
    let path = link.split('?').next().unwrap_or("");
    let mut segments = path.split('/').skip_while(|s| *s != "icons").skip(1);

    let _surface = segments.next(); // land | marine
    let night = match segments.next() {
        Some("night") => true,
        Some("day") => false,
        _ => return IconRef::no_data(),
    };
    let code = match segments.next() {
        Some(c) => c.split(',').next().unwrap_or(""),
        None => return IconRef::no_data(),
    };

    IconRef::new(icon_for_code(code, night))
}

fn icon_for_code(code: &str, night: bool) -> &'static str {
    match code {
        "skc" | "hot" | "cold" => if night { "clear_night.svg" } else { "clear_day.svg" },
        "few" => if night { "mostly_clear_night.svg" } else { "mostly_clear_day.svg" },
        "sct" => if night { "partly_cloudy_night.svg" } else { "partly_cloudy_day.svg" },
        "bkn" => if night { "mostly_cloudy_night.svg" } else { "mostly_cloudy_day.svg" },
        "ovc" => "cloudy.svg",
        "wind_skc" | "wind_few" | "wind_sct" | "wind_bkn" | "wind_ovc" => "windy.svg",
        "snow" | "blizzard" => "snow.svg",
        "rain_snow" | "snow_sleet" | "rain_sleet" => "sleet_rain.svg",
        "fzra" | "rain_fzra" | "snow_fzra" | "sleet" => "icy.svg",
        "rain" => "rain.svg",
        "rain_showers" | "rain_showers_hi" => "showers_rain.svg",
        "tsra" | "tsra_sct" | "tsra_hi" => "tstorm.svg",
        "tornado" | "hurricane" | "tropical_storm" => "severe.svg",
        "fog" | "haze" | "smoke" | "dust" => "fog.svg",
        _ => "no_data.svg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_and_night_variants() {
        assert_eq!(
            classify_icon_link("https://api.weather.gov/icons/land/day/skc?size=medium").file_name(),
            "clear_day.svg"
        );
        assert_eq!(
            classify_icon_link("https://api.weather.gov/icons/land/night/bkn?size=medium").file_name(),
            "mostly_cloudy_night.svg"
        );
    }

    #[test]
    fn test_probability_and_secondary_condition_ignored() {
        let icon = classify_icon_link("https://api.weather.gov/icons/land/day/tsra_hi,40/rain,60?size=medium");
        assert_eq!(icon.file_name(), "tstorm.svg");
    }

    #[test]
    fn test_unrecognised_links_fall_back() {
        assert_eq!(classify_icon_link(""), IconRef::no_data());
        assert_eq!(classify_icon_link("https://example.com/foo.png"), IconRef::no_data());
        assert_eq!(
            classify_icon_link("https://api.weather.gov/icons/land/day/volcano"),
            IconRef::no_data()
        );
    }
}
