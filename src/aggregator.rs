/*
 *  aggregator.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Concurrent per-city forecast aggregation
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

use log::{debug, error, info};
use std::sync::Arc;

use crate::cities::CityRef;
use crate::forecast::{ForecastError, ForecastPeriod, ForecastSource};
use crate::icons::{classify_icon_link, IconRef};

/// High/low pair for one city. Only exists when the fetch succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Outlook {
    /// false when the first period was night and the pair was shifted to tomorrow
    pub today: bool,
    pub high: i32,
    pub low: i32,
    pub icon: IconRef,
}

/// One row of the board. A failed city keeps its name so rows stay aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct CityForecast {
    pub name: String,
    pub outlook: Option<Outlook>,
}

impl CityForecast {
    pub fn available(name: impl Into<String>, outlook: Outlook) -> Self {
        Self { name: name.into(), outlook: Some(outlook) }
    }

    pub fn unavailable(name: impl Into<String>) -> Self {
        Self { name: name.into(), outlook: None }
    }

    pub fn high(&self) -> Option<i32> {
        self.outlook.as_ref().map(|o| o.high)
    }

    pub fn low(&self) -> Option<i32> {
        self.outlook.as_ref().map(|o| o.low)
    }

    pub fn today(&self) -> Option<bool> {
        self.outlook.as_ref().map(|o| o.today)
    }
}

/// Outcome of one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateStatus {
    Loaded,
    NoData,
}

/// Loaded as soon as any city has a high.
pub fn summarize(forecasts: &[CityForecast]) -> AggregateStatus {
    if forecasts.iter().any(|f| f.high().is_some()) {
        AggregateStatus::Loaded
    } else {
        AggregateStatus::NoData
    }
}

/// Pick today's pair, or tomorrow's when the forecast opens on a night period.
pub fn outlook_from_periods(periods: &[ForecastPeriod]) -> Result<Outlook, ForecastError> {
    let shift = match periods.first() {
        Some(first) if first.is_daytime => 0,
        Some(_) => 1,
        None => return Err(ForecastError::MissingPeriods { found: 0, needed: 2 }),
    };
    let (high, low) = match (periods.get(shift), periods.get(shift + 1)) {
        (Some(high), Some(low)) => (high, low),
        _ => {
            return Err(ForecastError::MissingPeriods {
                found: periods.len(),
                needed: shift + 2,
            })
        }
    };
    Ok(Outlook {
        today: shift == 0,
        high: high.temperature,
        low: low.temperature,
        icon: classify_icon_link(&high.icon),
    })
}

async fn fetch_city<S: ForecastSource>(source: &S, city: &CityRef) -> Result<Outlook, ForecastError> {
    let endpoint = source.resolve_endpoint(city.latitude, city.longitude).await?;
    let periods = source.fetch_periods(&endpoint).await?;
    outlook_from_periods(&periods)
}

/// Fans out one task per city and joins them back in catalog order.
pub struct ForecastAggregator<S> {
    source: Arc<S>,
}

impl<S> Clone for ForecastAggregator<S> {
    fn clone(&self) -> Self {
        Self { source: Arc::clone(&self.source) }
    }
}

impl<S: ForecastSource> ForecastAggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source: Arc::new(source) }
    }

    /// Always returns exactly one record per catalog entry, in catalog order.
    pub async fn fetch_all(&self, catalog: &[CityRef]) -> Vec<CityForecast> {
        debug!("Fetching travel forecasts for {} cities", catalog.len());

        let handles: Vec<_> = catalog
            .iter()
            .cloned()
            .map(|city| {
                let source = Arc::clone(&self.source);
                tokio::spawn(async move { fetch_city(source.as_ref(), &city).await })
            })
            .collect();

        let mut forecasts = Vec::with_capacity(catalog.len());
        for (city, handle) in catalog.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ForecastError::Task(e.to_string())),
            };
            match result {
                Ok(outlook) => forecasts.push(CityForecast::available(&city.name, outlook)),
                Err(e) => {
                    error!("Travel forecast for {} failed: {}", city.name, e);
                    forecasts.push(CityForecast::unavailable(&city.name));
                }
            }
        }

        let loaded = forecasts.iter().filter(|f| f.outlook.is_some()).count();
        info!("Travel forecasts loaded for {}/{} cities", loaded, catalog.len());
        forecasts
    }
}
