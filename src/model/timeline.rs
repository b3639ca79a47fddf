//! Date window and bar geometry.
//!
//! Everything here is a pure function of its inputs: the same tasks,
//! override, `today` and config always produce the same window and the same
//! positions.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::config::ChartConfig;

use super::calendar::{calculate_working_days, end_of_week, start_of_week};
use super::task::Task;

/// A user-chosen chart period that replaces the automatic window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOverride {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WindowOverride {
    /// `months` calendar months starting at `start`.
    pub fn months_from(start: NaiveDate, months: u32) -> Self {
        let end = start
            .checked_add_months(Months::new(months))
            .unwrap_or(start);
        Self { start, end }
    }
}

/// Horizontal placement of one task bar, relative to the window's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskPosition {
    pub offset: f32,
    pub width: f32,
    /// Working days in the task's own range, shown on the bar.
    pub working_days: u32,
}

/// Consecutive days of one month inside the window, for the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    pub first_day: NaiveDate,
    pub days: usize,
}

/// The visible range of the chart and its horizontal scale.
#[derive(Debug, Clone, PartialEq)]
pub struct DateWindow {
    /// The leftmost visible date.
    pub start: NaiveDate,
    /// The rightmost visible date.
    pub end: NaiveDate,
    /// Every day from `start` to `end`, inclusive.
    pub days: Vec<NaiveDate>,
    /// Pixels per day.
    pub day_width: f32,
}

impl DateWindow {
    /// Pick the window for a task set.
    ///
    /// An override wins; otherwise an empty task set shows the weeks around
    /// `today`, and a non-empty one spans every task plus padding. The result
    /// is always snapped outwards to whole weeks.
    pub fn derive(
        tasks: &[Task],
        window_override: Option<WindowOverride>,
        today: NaiveDate,
        config: &ChartConfig,
    ) -> Self {
        if let Some(o) = window_override {
            return Self::from_bounds(o.start.min(o.end), o.start.max(o.end), config);
        }

        let bounds = tasks
            .iter()
            .flat_map(|t| [t.start_date, t.end_date])
            .fold(None, |acc: Option<(NaiveDate, NaiveDate)>, date| match acc {
                None => Some((date, date)),
                Some((lo, hi)) => Some((lo.min(date), hi.max(date))),
            });

        match bounds {
            None => {
                let end = today
                    .checked_add_months(Months::new(config.empty_window_months))
                    .unwrap_or(today);
                Self::from_bounds(today, end, config)
            }
            Some((min, max)) => Self::from_bounds(
                shift(min, -config.padding_days),
                shift(max, config.padding_days),
                config,
            ),
        }
    }

    fn from_bounds(start: NaiveDate, end: NaiveDate, config: &ChartConfig) -> Self {
        let start = start_of_week(start, config.week_start);
        let end = end_of_week(end, config.week_start);
        let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();
        let day_width = day_width_for(days.len(), config);
        Self {
            start,
            end,
            days,
            day_width,
        }
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Total width in pixels of all day columns.
    pub fn total_width(&self) -> f32 {
        self.days.len() as f32 * self.day_width
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Convert a date to an x-pixel offset from the window start.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        (date - self.start).num_days() as f32 * self.day_width
    }

    /// Nearest whole day for an x-pixel offset from the window start.
    pub fn day_index_at(&self, x: f32) -> i64 {
        (x / self.day_width).round() as i64
    }

    pub fn date_at_index(&self, index: i64) -> NaiveDate {
        shift(self.start, index)
    }

    /// Geometry and working-day label for one task bar.
    ///
    /// Bars never start left of the window and are always at least one day
    /// wide, even for inverted ranges. Days before the window are cut off
    /// the bar.
    pub fn position(&self, task: &Task) -> TaskPosition {
        let days_from_start = (task.start_date - self.start).num_days();
        let clipped = (-days_from_start).max(0);
        let span = (task.end_date - task.start_date).num_days() + 1;
        TaskPosition {
            offset: days_from_start.max(0) as f32 * self.day_width,
            width: (span - clipped).max(1) as f32 * self.day_width,
            working_days: calculate_working_days(task.start_date, task.end_date),
        }
    }

    /// Month groups for the upper header row.
    pub fn month_spans(&self) -> Vec<MonthSpan> {
        let mut spans: Vec<MonthSpan> = Vec::new();
        for day in &self.days {
            match spans.last_mut() {
                Some(span)
                    if span.first_day.month() == day.month()
                        && span.first_day.year() == day.year() =>
                {
                    span.days += 1
                }
                _ => spans.push(MonthSpan {
                    first_day: *day,
                    days: 1,
                }),
            }
        }
        spans
    }
}

/// Pixels per day for a window of `day_count` days.
pub fn day_width_for(day_count: usize, config: &ChartConfig) -> f32 {
    let lo = config.min_day_width.min(config.max_day_width).max(1.0);
    let hi = config.min_day_width.max(config.max_day_width).max(lo);
    if day_count == 0 {
        return hi;
    }
    (config.target_width / day_count as f32).clamp(lo, hi)
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days)).unwrap_or(date)
}
