/*
 *  display/travel.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Travel forecast panel: fetch, composite, header and scrolling viewport
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

use chrono::{Local, NaiveDate};
use embedded_graphics::{prelude::*, primitives::Rectangle};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::aggregator::{summarize, AggregateStatus, CityForecast, ForecastAggregator};
use crate::cities::CityRef;
use crate::constants::*;
use crate::display::composite::{CompositeRenderer, CompositeSurface};
use crate::display::error::PanelError;
use crate::display::overlay::IconSource;
use crate::display::projector::ScrollProjector;
use crate::display::traits::{BoxFuture, Panel, PanelState};
use crate::display::Canvas;
use crate::draw;
use crate::forecast::ForecastSource;
use crate::schedule::DwellSchedule;
use crate::units::TemperatureUnits;

/// Ties a refresh to the activation cycle it was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    cycle: u64,
}

/// What happened to a set of fetched forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied(PanelState),
    /// The cycle ended or restarted while the fetch was in flight
    Stale,
}

/// Weekday shown under the title.
///
/// The first record decides: today when it opened on a daytime period,
/// otherwise tomorrow. A failed first record reads as tomorrow.
pub fn travel_day_name(forecasts: &[CityForecast], today: NaiveDate) -> String {
    let Some(first) = forecasts.first() else {
        return String::new();
    };
    let date = if first.today() == Some(true) {
        today
    } else {
        today.succ_opt().unwrap_or(today)
    };
    date.format("%A").to_string()
}

pub struct TravelForecastPanel<S> {
    name: String,
    catalog: Vec<CityRef>,
    aggregator: ForecastAggregator<S>,
    icons: Arc<dyn IconSource>,
    units: TemperatureUnits,
    schedule: DwellSchedule,
    renderer: CompositeRenderer,
    projector: ScrollProjector,
    composite: CompositeSurface,
    canvas: Canvas,
    forecasts: Vec<CityForecast>,
    state: PanelState,
    cycle: u64,
    screen_index: usize,
    base_count: i64,
    offset: u32,
    date: Option<NaiveDate>,
}

impl<S: ForecastSource> TravelForecastPanel<S> {
    pub fn new(catalog: Vec<CityRef>, source: S, icons: Arc<dyn IconSource>) -> Self {
        Self::from_aggregator(catalog, ForecastAggregator::new(source), icons)
    }

    pub fn from_aggregator(catalog: Vec<CityRef>, aggregator: ForecastAggregator<S>, icons: Arc<dyn IconSource>) -> Self {
        let rows = catalog.len();
        Self {
            name: "Travel Forecast".to_string(),
            schedule: DwellSchedule::build(rows),
            composite: CompositeSurface::new(rows),
            canvas: Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT, draw::BACKGROUND),
            catalog,
            aggregator,
            icons,
            units: TemperatureUnits::default(),
            renderer: CompositeRenderer::new(),
            projector: ScrollProjector::new(),
            forecasts: Vec::new(),
            state: PanelState::Inactive,
            cycle: 0,
            screen_index: 0,
            base_count: 0,
            offset: 0,
            date: None,
        }
    }

    pub fn with_units(mut self, units: TemperatureUnits) -> Self {
        self.units = units;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.schedule = DwellSchedule::build_with_base(self.catalog.len(), base_delay);
        self
    }

    /// Pin the date used for the weekday label instead of the local clock.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn catalog(&self) -> &[CityRef] {
        &self.catalog
    }

    pub fn forecasts(&self) -> &[CityForecast] {
        &self.forecasts
    }

    pub fn composite(&self) -> &CompositeSurface {
        &self.composite
    }

    pub fn units(&self) -> TemperatureUnits {
        self.units
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn screen_index(&self) -> usize {
        self.screen_index
    }

    pub fn day_name(&self) -> String {
        let today = self.date.unwrap_or_else(|| Local::now().date_naive());
        travel_day_name(&self.forecasts, today)
    }

    /// Switch units; an existing composite is repainted and reprojected.
    pub fn set_units(&mut self, units: TemperatureUnits) -> Result<(), PanelError> {
        if self.units == units {
            return Ok(());
        }
        self.units = units;
        if self.state.has_composite() {
            self.renderer.render(&mut self.composite, &self.forecasts, self.units, self.icons.as_ref())?;
            if self.state == PanelState::Visible {
                self.projector.blit(self.composite.canvas(), &mut self.canvas, self.offset);
            }
        }
        Ok(())
    }

    /// Start a refresh; `None` when the panel is not active.
    pub fn begin_refresh(&self) -> Option<RefreshTicket> {
        self.state.is_active().then_some(RefreshTicket { cycle: self.cycle })
    }

    pub fn aggregator(&self) -> &ForecastAggregator<S> {
        &self.aggregator
    }

    /// Apply fetched forecasts if the ticket still belongs to the current cycle.
    pub fn commit(&mut self, ticket: RefreshTicket, forecasts: Vec<CityForecast>) -> Result<CommitOutcome, PanelError> {
        if !self.state.is_active() || ticket.cycle != self.cycle {
            debug!("{}: discarding forecasts from cycle {} (now {})", self.name, ticket.cycle, self.cycle);
            return Ok(CommitOutcome::Stale);
        }

        self.forecasts = forecasts;
        match summarize(&self.forecasts) {
            AggregateStatus::NoData => {
                warn!("{}: no city returned a forecast", self.name);
                self.composite.release_overlays();
                self.state = PanelState::NoData;
            }
            AggregateStatus::Loaded => {
                self.renderer.render(&mut self.composite, &self.forecasts, self.units, self.icons.as_ref())?;
                if self.state == PanelState::Visible {
                    self.offset = self.projector.project(self.composite.canvas(), &mut self.canvas, self.base_count);
                } else {
                    self.state = PanelState::Ready;
                }
            }
        }
        Ok(CommitOutcome::Applied(self.state))
    }

    /// Fetch every city and commit the result.
    pub async fn refresh(&mut self) -> PanelState {
        let Some(ticket) = self.begin_refresh() else {
            debug!("{}: not active, skipping refresh", self.name);
            return self.state;
        };
        let aggregator = self.aggregator.clone();
        let catalog = self.catalog.clone();
        let forecasts = aggregator.fetch_all(&catalog).await;
        if let Err(e) = self.commit(ticket, forecasts) {
            error!("{}: failed to render forecasts: {}", self.name, e);
        }
        self.state
    }

    fn draw_header(&mut self) -> Result<(), PanelError> {
        let day = self.day_name();
        let canvas = &mut self.canvas;

        draw::horizontal_gradient(canvas, 0, 0, CANVAS_WIDTH as i32, CANVAS_HEIGHT as i32, draw::PAGE_TOP, draw::BACKGROUND)?;

        let bar_right = TITLE_BAR_WIDTH as i32;
        let bar_bottom = TITLE_BAR_Y + TITLE_BAR_HEIGHT as i32;
        draw::horizontal_gradient_single(canvas, 0, TITLE_BAR_Y, bar_right, bar_bottom, draw::TITLE_TOP, draw::TITLE_BOTTOM)?;
        draw::fill_triangle(
            canvas,
            Point::new(bar_right, TITLE_BAR_Y),
            Point::new(bar_right - 50, bar_bottom),
            Point::new(bar_right, bar_bottom),
            draw::TITLE_TRIANGLE,
        )?;
        draw::draw_title_text(
            canvas,
            "Travel Forecast",
            &format!("For {}", day),
            Rectangle::new(Point::new(170, TITLE_BAR_Y), Size::new(300, TITLE_BAR_HEIGHT)),
        )?;

        draw::draw_text(canvas, "LOW", LOW_LABEL_X, COLUMN_LABEL_Y, draw::SMALL_FONT, draw::YELLOW)?;
        draw::draw_text(canvas, "HIGH", HIGH_LABEL_X, COLUMN_LABEL_Y, draw::SMALL_FONT, draw::YELLOW)?;
        Ok(())
    }
}

impl<S: ForecastSource> Panel for TravelForecastPanel<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> PanelState {
        self.state
    }

    fn timing(&self) -> &DwellSchedule {
        &self.schedule
    }

    fn activate(&mut self) {
        self.cycle = self.cycle.wrapping_add(1);
        self.state = PanelState::AwaitingData;
        self.screen_index = 0;
        self.base_count = 0;
        self.offset = 0;
        debug!("{}: activated, cycle {}", self.name, self.cycle);
    }

    fn deactivate(&mut self) {
        self.cycle = self.cycle.wrapping_add(1);
        self.state = PanelState::Inactive;
        self.composite.release_overlays();
        debug!("{}: deactivated", self.name);
    }

    fn get_data(&mut self) -> BoxFuture<'_, PanelState> {
        Box::pin(self.refresh())
    }

    fn draw_canvas(&mut self) -> Result<(), PanelError> {
        if !self.state.has_composite() {
            return Err(PanelError::InvalidState { expected: "ready or visible", actual: self.state });
        }
        if self.composite.rows() == 0 {
            return Err(PanelError::EmptyComposite);
        }
        self.draw_header()?;
        self.offset = 0;
        self.projector.blit(self.composite.canvas(), &mut self.canvas, 0);
        Ok(())
    }

    fn show_canvas(&mut self) -> Result<(), PanelError> {
        self.draw_canvas()?;
        self.state = PanelState::Visible;
        info!("{}: showing {} cities for {}", self.name, self.forecasts.len(), self.day_name());
        Ok(())
    }

    fn screen_index_change(&mut self, screen_index: usize) {
        self.screen_index = screen_index;
        debug!("{}: screen index {}", self.name, screen_index);
        self.base_count_change(self.base_count);
    }

    fn base_count_change(&mut self, count: i64) {
        self.base_count = count;
        if self.state != PanelState::Visible {
            return;
        }
        self.offset = self.projector.project(self.composite.canvas(), &mut self.canvas, count);
    }

    fn tick(&mut self) {
        if self.composite.tick_overlays() > 0 && self.state == PanelState::Visible {
            self.projector.blit(self.composite.canvas(), &mut self.canvas, self.offset);
        }
    }

    fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Outlook;
    use crate::icons::IconRef;
    use crate::mock::MockForecastSource;
    use crate::svgimage::{IconError, IconFrame};
    use embedded_graphics::pixelcolor::Rgb888;

    struct SolidIcons;

    impl IconSource for SolidIcons {
        fn frames(&self, _icon: &IconRef, max_width: u32) -> Result<Arc<Vec<IconFrame>>, IconError> {
            Ok(Arc::new(vec![
                IconFrame::solid(max_width, 30, Rgb888::CYAN),
                IconFrame::solid(max_width, 30, Rgb888::MAGENTA),
            ]))
        }
    }

    fn saturday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn three_cities() -> Vec<CityRef> {
        vec![
            CityRef::new("Atlanta", 33.75, -84.39),
            CityRef::new("Boston", 42.36, -71.06),
            CityRef::new("Chicago", 41.84, -87.68),
        ]
    }

    fn panel(source: MockForecastSource, catalog: Vec<CityRef>) -> TravelForecastPanel<MockForecastSource> {
        TravelForecastPanel::new(catalog, source, Arc::new(SolidIcons)).with_date(saturday())
    }

    fn big_catalog(n: usize) -> (Vec<CityRef>, MockForecastSource) {
        let catalog: Vec<_> = (0..n).map(|i| CityRef::new(format!("City {}", i), 30.0 + i as f64, -90.0)).collect();
        let source = catalog
            .iter()
            .fold(MockForecastSource::new(), |s, c| s.with_day(c.latitude, c.longitude, 70, 50));
        (catalog, source)
    }

    #[tokio::test]
    async fn test_first_city_failure_still_loads() {
        let source = MockForecastSource::new()
            .with_resolve_failure(33.75, -84.39)
            .with_day(42.36, -71.06, 70, 50)
            .with_day(41.84, -87.68, 65, 45);
        let mut p = panel(source, three_cities());
        p.activate();
        assert_eq!(p.get_data().await, PanelState::Ready);

        assert_eq!(p.forecasts().len(), 3);
        assert!(p.forecasts()[0].outlook.is_none());
        assert_eq!(p.forecasts()[1].high(), Some(70));
        assert_eq!(p.forecasts()[2].high(), Some(65));
        assert_eq!(p.composite().height(), 216);
        assert_eq!(p.composite().overlays().len(), 2);
        // failed first record reads as tomorrow
        assert_eq!(p.day_name(), "Sunday");
    }

    #[tokio::test]
    async fn test_all_failures_are_no_data() {
        let mut p = panel(MockForecastSource::new(), three_cities());
        p.activate();
        assert_eq!(p.get_data().await, PanelState::NoData);
        assert!(matches!(p.draw_canvas(), Err(PanelError::InvalidState { .. })));
        assert!(p.composite().overlays().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_panel_does_not_fetch() {
        let source = MockForecastSource::new().with_day(42.36, -71.06, 70, 50);
        let state = source.state();
        let mut p = panel(source, three_cities());
        assert_eq!(p.get_data().await, PanelState::Inactive);
        assert_eq!(state.lock().unwrap().resolve_calls, 0);
    }

    #[tokio::test]
    async fn test_stale_results_are_discarded() {
        let source = MockForecastSource::new().with_day(42.36, -71.06, 70, 50);
        let mut p = panel(source, three_cities());
        p.activate();
        let ticket = p.begin_refresh().unwrap();
        let forecasts = p.aggregator().clone().fetch_all(p.catalog()).await;

        // cycle restarts while the fetch is in flight
        p.deactivate();
        p.activate();
        assert_eq!(p.commit(ticket, forecasts.clone()).unwrap(), CommitOutcome::Stale);
        assert!(p.forecasts().is_empty());
        assert_eq!(p.state(), PanelState::AwaitingData);

        let fresh = p.begin_refresh().unwrap();
        assert_eq!(p.commit(fresh, forecasts).unwrap(), CommitOutcome::Applied(PanelState::Ready));
    }

    #[tokio::test]
    async fn test_deactivated_panel_ignores_commit() {
        let mut p = panel(MockForecastSource::new(), three_cities());
        p.activate();
        let ticket = p.begin_refresh().unwrap();
        p.deactivate();
        assert!(p.begin_refresh().is_none());
        let outcome = p.commit(ticket, vec![CityForecast::unavailable("Atlanta")]).unwrap();
        assert_eq!(outcome, CommitOutcome::Stale);
    }

    #[tokio::test]
    async fn test_show_then_scroll() {
        let (catalog, source) = big_catalog(20);
        let mut p = panel(source, catalog);
        p.activate();
        p.get_data().await;
        p.show_canvas().unwrap();
        assert_eq!(p.state(), PanelState::Visible);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.day_name(), "Saturday");

        // viewport at counter 0 is the top of the composite
        let top = VIEWPORT_Y as usize;
        assert_eq!(p.canvas().row(top), p.composite().canvas().row(0));

        p.base_count_change(400);
        assert_eq!(p.offset(), 250);
        let snapshot = p.canvas().clone();
        p.base_count_change(400);
        assert_eq!(p.canvas(), &snapshot);

        p.base_count_change(1_000_000);
        assert_eq!(p.offset(), 20 * ROW_HEIGHT - VIEWPORT_HEIGHT);
    }

    #[tokio::test]
    async fn test_counter_ignored_until_visible() {
        let (catalog, source) = big_catalog(8);
        let mut p = panel(source, catalog);
        p.activate();
        p.get_data().await;
        let before = p.canvas().clone();
        p.base_count_change(300);
        assert_eq!(p.canvas(), &before);
        assert_eq!(p.offset(), 0);
    }

    #[tokio::test]
    async fn test_screen_index_reprojects_current_count() {
        let (catalog, source) = big_catalog(12);
        let mut p = panel(source, catalog);
        p.activate();
        p.get_data().await;
        p.show_canvas().unwrap();
        p.base_count_change(200);
        p.screen_index_change(1);
        assert_eq!(p.screen_index(), 1);
        assert_eq!(p.offset(), 50);
    }

    #[tokio::test]
    async fn test_tick_animates_visible_icons() {
        let (catalog, source) = big_catalog(4);
        let mut p = panel(source, catalog);
        p.activate();
        p.get_data().await;
        p.show_canvas().unwrap();
        let before = p.canvas().clone();
        p.tick();
        assert_ne!(p.canvas(), &before);
        assert!(p.canvas().as_slice().contains(&Rgb888::MAGENTA));
    }

    #[tokio::test]
    async fn test_set_units_repaints_composite() {
        let (catalog, source) = big_catalog(4);
        let mut p = panel(source, catalog);
        p.activate();
        p.get_data().await;
        let imperial = p.composite().canvas().clone();
        p.set_units(TemperatureUnits::Metric).unwrap();
        assert_ne!(p.composite().canvas(), &imperial);
        assert_eq!(p.units(), TemperatureUnits::Metric);
    }

    #[test]
    fn test_day_name_follows_first_record() {
        let outlook = |today| Outlook { today, high: 70, low: 50, icon: IconRef::no_data() };
        let today = vec![CityForecast::available("A", outlook(true)), CityForecast::unavailable("B")];
        let tomorrow = vec![CityForecast::available("A", outlook(false)), CityForecast::available("B", outlook(true))];
        assert_eq!(travel_day_name(&today, saturday()), "Saturday");
        assert_eq!(travel_day_name(&tomorrow, saturday()), "Sunday");
        assert_eq!(travel_day_name(&[], saturday()), "");
    }

    #[test]
    fn test_schedule_matches_catalog() {
        let (catalog, _) = big_catalog(20);
        let p = panel(MockForecastSource::new(), catalog);
        assert_eq!(p.timing().delays(), &[438, 288, 288, 288, 150]);
        assert_eq!(p.composite().height(), 20 * ROW_HEIGHT);
    }
}
