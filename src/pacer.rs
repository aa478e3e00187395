/*
 *  pacer.rs
 *
 *  travelboard - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	Walks a dwell schedule one counter unit at a time
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use std::time::Duration;

use crate::display::Panel;
use crate::schedule::DwellSchedule;

/// One counter unit worth of progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacerStep {
    pub count: i64,
    /// Set when this unit crossed into the next schedule segment
    pub screen_index: Option<usize>,
}

/// Host side pacing for a panel's dwell schedule.
///
/// The counter starts at zero when the panel is shown and advances one unit
/// per `base_delay`. Each schedule entry is a segment; crossing its end moves
/// the screen index on, and the last segment ending finishes the panel.
#[derive(Debug, Clone)]
pub struct DwellPacer {
    boundaries: Vec<i64>,
    base_delay: Duration,
    counter: i64,
    segment: usize,
}

impl DwellPacer {
    pub fn new(schedule: &DwellSchedule) -> Self {
        let boundaries = schedule
            .delays()
            .iter()
            .scan(0i64, |acc, d| {
                *acc += *d as i64;
                Some(*acc)
            })
            .collect();
        Self { boundaries, base_delay: schedule.base_delay(), counter: 0, segment: 0 }
    }

    #[inline]
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn screen_index(&self) -> usize {
        self.segment
    }

    pub fn is_finished(&self) -> bool {
        self.segment >= self.boundaries.len()
    }

    /// Advance one unit; `None` once the schedule is used up.
    pub fn step(&mut self) -> Option<PacerStep> {
        if self.is_finished() {
            return None;
        }
        self.counter += 1;
        let mut screen_index = None;
        if self.counter >= self.boundaries[self.segment] {
            self.segment += 1;
            if !self.is_finished() {
                screen_index = Some(self.segment);
            }
        }
        Some(PacerStep { count: self.counter, screen_index })
    }

    /// Step and forward the result to `panel`. Returns false when finished.
    pub fn drive(&mut self, panel: &mut dyn Panel) -> bool {
        let Some(step) = self.step() else {
            return false;
        };
        panel.base_count_change(step.count);
        if let Some(index) = step.screen_index {
            panel.screen_index_change(index);
        }
        !self.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_whole_schedule() {
        let schedule = DwellSchedule::build(20);
        let mut pacer = DwellPacer::new(&schedule);
        let mut changes = Vec::new();
        let mut units = 0u64;
        while let Some(step) = pacer.step() {
            units += 1;
            if let Some(index) = step.screen_index {
                changes.push((index, step.count));
            }
        }
        assert_eq!(units, schedule.total_units());
        assert_eq!(changes, vec![(1, 438), (2, 726), (3, 1014), (4, 1302)]);
        assert!(pacer.is_finished());
        assert_eq!(pacer.step(), None);
    }

    #[test]
    fn test_minimal_schedule() {
        let mut pacer = DwellPacer::new(&DwellSchedule::build(3));
        assert_eq!(pacer.screen_index(), 0);
        let steps: Vec<_> = std::iter::from_fn(|| pacer.step()).collect();
        assert_eq!(steps.len(), 588);
        assert_eq!(steps[437].screen_index, Some(1));
        assert_eq!(steps.last().map(|s| s.count), Some(588));
    }

    #[test]
    fn test_carries_base_delay() {
        let schedule = DwellSchedule::build_with_base(4, Duration::from_millis(5));
        assert_eq!(DwellPacer::new(&schedule).base_delay(), Duration::from_millis(5));
    }
}
