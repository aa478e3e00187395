/*
 *  mock.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock forecast source for testing without network
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

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

use crate::cities::CityRef;
use crate::forecast::{ForecastError, ForecastPeriod, ForecastSource};

/// Canned answer for one point.
#[derive(Debug, Clone)]
pub enum MockPoint {
    Periods(Vec<ForecastPeriod>),
    FailResolve,
    FailFetch,
}

/// Shared state, kept behind a mutex so tests can inspect call counts.
#[derive(Debug, Default)]
pub struct MockSourceState {
    pub points: HashMap<String, MockPoint>,
    pub delays: HashMap<String, Duration>,
    pub resolve_calls: usize,
    pub fetch_calls: usize,
}

/// Mock forecast source
///
/// Answers from an in-memory table keyed by coordinate. Useful for:
/// - Unit and integration tests
/// - Running the board offline (`--demo`)
///
/// Coordinates not in the table fail to resolve.
#[derive(Debug, Clone, Default)]
pub struct MockForecastSource {
    state: Arc<Mutex<MockSourceState>>,
    rendezvous: Option<Arc<Barrier>>,
}

fn point_key(latitude: f64, longitude: f64) -> String {
    format!("mock://{:.4},{:.4}", latitude, longitude)
}

fn icon_link(daytime: bool) -> String {
    format!(
        "https://api.weather.gov/icons/land/{}/few?size=medium",
        if daytime { "day" } else { "night" }
    )
}

impl MockForecastSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic forecasts for a whole catalog, derived from coordinates.
    pub fn demo(catalog: &[CityRef]) -> Self {
        catalog.iter().fold(Self::new(), |source, city| {
            let high = 55 + (city.latitude.abs() as i32 * 7 + city.longitude.abs() as i32) % 35;
            source.with_day(city.latitude, city.longitude, high, high - 12 - (high % 9))
        })
    }

    pub fn with_periods(self, latitude: f64, longitude: f64, periods: Vec<ForecastPeriod>) -> Self {
        self.insert(latitude, longitude, MockPoint::Periods(periods))
    }

    /// Forecast opening on a daytime period.
    pub fn with_day(self, latitude: f64, longitude: f64, high: i32, low: i32) -> Self {
        let periods = vec![
            ForecastPeriod { is_daytime: true, temperature: high, icon: icon_link(true) },
            ForecastPeriod { is_daytime: false, temperature: low, icon: icon_link(false) },
            ForecastPeriod { is_daytime: true, temperature: high + 1, icon: icon_link(true) },
        ];
        self.with_periods(latitude, longitude, periods)
    }

    /// Forecast opening on a night period; `high`/`low` are tomorrow's pair.
    pub fn with_night(self, latitude: f64, longitude: f64, high: i32, low: i32) -> Self {
        let periods = vec![
            ForecastPeriod { is_daytime: false, temperature: low - 2, icon: icon_link(false) },
            ForecastPeriod { is_daytime: true, temperature: high, icon: icon_link(true) },
            ForecastPeriod { is_daytime: false, temperature: low, icon: icon_link(false) },
        ];
        self.with_periods(latitude, longitude, periods)
    }

    pub fn with_resolve_failure(self, latitude: f64, longitude: f64) -> Self {
        self.insert(latitude, longitude, MockPoint::FailResolve)
    }

    pub fn with_fetch_failure(self, latitude: f64, longitude: f64) -> Self {
        self.insert(latitude, longitude, MockPoint::FailFetch)
    }

    pub fn with_delay(self, latitude: f64, longitude: f64, delay: Duration) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.delays.insert(point_key(latitude, longitude), delay);
        }
        self
    }

    /// Make every fetch wait until `parties` fetches are in flight together.
    pub fn with_rendezvous(mut self, parties: usize) -> Self {
        self.rendezvous = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn state(&self) -> Arc<Mutex<MockSourceState>> {
        Arc::clone(&self.state)
    }

    fn insert(self, latitude: f64, longitude: f64, point: MockPoint) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.points.insert(point_key(latitude, longitude), point);
        }
        self
    }

    fn lookup(&self, key: &str) -> Option<(MockPoint, Option<Duration>)> {
        let state = self.state.lock().ok()?;
        let point = state.points.get(key)?.clone();
        Some((point, state.delays.get(key).copied()))
    }
}

impl ForecastSource for MockForecastSource {
    async fn resolve_endpoint(&self, latitude: f64, longitude: f64) -> Result<String, ForecastError> {
        let key = point_key(latitude, longitude);
        if let Ok(mut state) = self.state.lock() {
            state.resolve_calls += 1;
        }
        match self.lookup(&key) {
            Some((MockPoint::FailResolve, _)) | None => {
                Err(ForecastError::MissingData(format!("no point for {}", key)))
            }
            Some(_) => Ok(key),
        }
    }

    async fn fetch_periods(&self, endpoint: &str) -> Result<Vec<ForecastPeriod>, ForecastError> {
        if let Ok(mut state) = self.state.lock() {
            state.fetch_calls += 1;
        }
        if let Some(barrier) = self.rendezvous.as_ref() {
            barrier.wait().await;
        }
        let (point, delay) = self
            .lookup(endpoint)
            .ok_or_else(|| ForecastError::MissingData(format!("no forecast at {}", endpoint)))?;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match point {
            MockPoint::Periods(periods) => Ok(periods),
            _ => Err(ForecastError::MissingData(format!("forecast unavailable at {}", endpoint))),
        }
    }
}
