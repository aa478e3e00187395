/*
 *  units.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Temperature unit mode and conversion
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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display unit mode. Forecast temperatures arrive in Fahrenheit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnits {
    #[default]
    Imperial,
    Metric,
}

impl TemperatureUnits {
    /// Convert a source (Fahrenheit) reading into this unit mode, rounded
    /// to the nearest whole degree.
    pub fn present(&self, fahrenheit: i32) -> i32 {
        match self {
            TemperatureUnits::Imperial => fahrenheit,
            TemperatureUnits::Metric => fahrenheit_to_celsius(fahrenheit as f64).round() as i32,
        }
    }
}

impl FromStr for TemperatureUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // same aliases the weather config has always accepted
        match s.to_lowercase().as_str() {
            "f" | "fahrenheit" | "imperial" => Ok(TemperatureUnits::Imperial),
            "c" | "celsius" | "metric" => Ok(TemperatureUnits::Metric),
            other => Err(format!("unknown units '{}'", other)),
        }
    }
}

impl fmt::Display for TemperatureUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnits::Imperial => write!(f, "imperial"),
            TemperatureUnits::Metric => write!(f, "metric"),
        }
    }
}

#[inline]
pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_rounds_to_whole_degrees() {
        assert_eq!(TemperatureUnits::Metric.present(70), 21);
        assert_eq!(TemperatureUnits::Metric.present(32), 0);
        assert_eq!(TemperatureUnits::Metric.present(-40), -40);
        assert_eq!(TemperatureUnits::Metric.present(65), 18);
    }

    #[test]
    fn test_imperial_passes_through() {
        assert_eq!(TemperatureUnits::Imperial.present(70), 70);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("C".parse::<TemperatureUnits>().unwrap(), TemperatureUnits::Metric);
        assert_eq!("imperial".parse::<TemperatureUnits>().unwrap(), TemperatureUnits::Imperial);
        assert!("kelvin".parse::<TemperatureUnits>().is_err());
    }
}
