/*
 *  schedule.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Dwell schedule for the scrolling travel board
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

use std::time::Duration;

use crate::constants::{BASE_DELAY_MS, ROWS_PER_PAGE, ROW_HEIGHT, SCROLL_LEAD, TRAILING_HOLD};

/// Hold durations, in counter units, handed to the pacing engine.
///
/// The first entry covers the lead-in hold plus the first page already on
/// screen, each middle entry one further page, the last a fixed trailing hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwellSchedule {
    base_delay: Duration,
    delays: Vec<u32>,
}

impl DwellSchedule {
    pub fn build(catalog_len: usize) -> Self {
        Self::build_with_base(catalog_len, Duration::from_millis(BASE_DELAY_MS))
    }

    pub fn build_with_base(catalog_len: usize, base_delay: Duration) -> Self {
        let page_step = ROW_HEIGHT * ROWS_PER_PAGE;
        // first page is already up on activation, the trailing hold covers the last partial page
        let pages = (catalog_len / ROWS_PER_PAGE as usize).saturating_sub(2);

        let mut delays = Vec::with_capacity(pages + 2);
        delays.push(SCROLL_LEAD as u32 + page_step);
        delays.extend(std::iter::repeat(page_step).take(pages));
        delays.push(TRAILING_HOLD);

        Self { base_delay, delays }
    }

    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    /// Time per counter unit.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Counter units the whole panel stays up for.
    pub fn total_units(&self) -> u64 {
        self.delays.iter().map(|d| *d as u64).sum()
    }

    pub fn total_duration(&self) -> Duration {
        self.base_delay * self.total_units() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_cities() {
        let schedule = DwellSchedule::build(20);
        assert_eq!(schedule.delays(), &[438, 288, 288, 288, 150]);
        assert_eq!(schedule.total_units(), 438 + 3 * 288 + 150);
    }

    #[test]
    fn test_small_catalogs_get_minimal_schedule() {
        for n in 0..12 {
            assert_eq!(DwellSchedule::build(n).delays(), &[438, 150], "catalog of {}", n);
        }
        assert_eq!(DwellSchedule::build(12).delays(), &[438, 288, 150]);
    }

    #[test]
    fn test_partial_last_page_adds_nothing() {
        assert_eq!(DwellSchedule::build(23), DwellSchedule::build(20));
        assert_eq!(DwellSchedule::build(24).delays().len(), 6);
    }

    #[test]
    fn test_duration_uses_base_delay() {
        let schedule = DwellSchedule::build_with_base(4, Duration::from_millis(10));
        assert_eq!(schedule.total_duration(), Duration::from_millis(5880));
        assert_eq!(DwellSchedule::build(4).base_delay(), Duration::from_millis(BASE_DELAY_MS));
    }
}
