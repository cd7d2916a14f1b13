//! Date-range picker state for the complaints views.
//!
//! Presets are always derived from an explicit `today` so the result does not
//! depend on the time of day; callers pass `chrono::Local::now().date_naive()`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    Yesterday,
    LastDays(u32),
}

impl DatePreset {
    /// The presets offered by the range picker, in display order.
    pub const STANDARD: [DatePreset; 5] = [
        DatePreset::Today,
        DatePreset::Yesterday,
        DatePreset::LastDays(7),
        DatePreset::LastDays(30),
        DatePreset::LastDays(60),
    ];

    #[must_use]
    pub fn label(self) -> String {
        match self {
            DatePreset::Today => "Today".to_string(),
            DatePreset::Yesterday => "Yesterday".to_string(),
            DatePreset::LastDays(n) => format!("Last {n} Days"),
        }
    }

    /// `(start, end)` for this preset relative to `today`.
    #[must_use]
    pub fn resolve(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            DatePreset::Today => (today, today),
            DatePreset::Yesterday => {
                let yesterday = days_before(today, 1);
                (yesterday, yesterday)
            }
            DatePreset::LastDays(n) => (days_before(today, u64::from(n)), today),
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for DatePreset {
    type Err = CoreError;

    /// Accepts `today`, `yesterday` and `lastNdays` (also `last-N-days`,
    /// `last_N_days`, or the display label).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match compact.as_str() {
            "today" => Ok(DatePreset::Today),
            "yesterday" => Ok(DatePreset::Yesterday),
            other => other
                .strip_prefix("last")
                .and_then(|rest| rest.strip_suffix("days"))
                .and_then(|n| n.parse::<u32>().ok())
                .map(DatePreset::LastDays)
                .ok_or_else(|| CoreError::UnknownDatePreset(s.to_string())),
        }
    }
}

fn days_before(today: NaiveDate, n: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

/// What the user picked in the range picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelection {
    Preset(DatePreset),
    Custom(NaiveDate, NaiveDate),
}

/// Resolves a preset or a custom pair into `(start, end)` with `start <= end`.
#[must_use]
pub fn resolve_date_range(selection: RangeSelection, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match selection {
        RangeSelection::Preset(preset) => preset.resolve(today),
        RangeSelection::Custom(a, b) => ordered(a, b),
    }
}

fn ordered(a: NaiveDate, b: NaiveDate) -> (NaiveDate, NaiveDate) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    Preset(DatePreset),
    Custom,
}

/// The active date filter. Both dates are set for presets; a custom range
/// fills in as the user picks dates. `start <= end` whenever both are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    mode: RangeMode,
}

impl DateRange {
    /// The default range: today only.
    #[must_use]
    pub fn today(today: NaiveDate) -> Self {
        Self::preset(DatePreset::Today, today)
    }

    #[must_use]
    pub fn preset(preset: DatePreset, today: NaiveDate) -> Self {
        let (start, end) = preset.resolve(today);
        Self {
            start: Some(start),
            end: Some(end),
            mode: RangeMode::Preset(preset),
        }
    }

    #[must_use]
    pub fn custom(a: NaiveDate, b: NaiveDate) -> Self {
        let (start, end) = ordered(a, b);
        Self {
            start: Some(start),
            end: Some(end),
            mode: RangeMode::Custom,
        }
    }

    #[must_use]
    pub fn from_selection(selection: RangeSelection, today: NaiveDate) -> Self {
        match selection {
            RangeSelection::Preset(preset) => Self::preset(preset, today),
            RangeSelection::Custom(a, b) => Self::custom(a, b),
        }
    }

    /// Switches to custom mode with both dates cleared, waiting for picks.
    #[must_use]
    pub fn begin_custom() -> Self {
        Self {
            start: None,
            end: None,
            mode: RangeMode::Custom,
        }
    }

    /// Records one date click in custom mode: the first pick is the start,
    /// the second the end (swapped if it precedes the start). Returns `true`
    /// once the range is complete. Ignored outside custom mode or when both
    /// dates are already set.
    pub fn pick_custom_date(&mut self, date: NaiveDate) -> bool {
        if self.mode != RangeMode::Custom {
            return false;
        }
        match (self.start, self.end) {
            (None, _) => {
                self.start = Some(date);
                false
            }
            (Some(start), None) => {
                let (start, end) = ordered(start, date);
                self.start = Some(start);
                self.end = Some(end);
                true
            }
            (Some(_), Some(_)) => true,
        }
    }

    #[must_use]
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    #[must_use]
    pub fn mode(&self) -> RangeMode {
        self.mode
    }

    #[must_use]
    pub fn preset_label(&self) -> Option<String> {
        match self.mode {
            RangeMode::Preset(preset) => Some(preset.label()),
            RangeMode::Custom => None,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Text shown on the picker button.
    #[must_use]
    pub fn display_text(&self) -> String {
        match (self.mode, self.start, self.end) {
            (RangeMode::Preset(preset), _, _) => preset.label(),
            (RangeMode::Custom, Some(start), Some(end)) => {
                format!("{} - {}", short_date(start), short_date(end))
            }
            (RangeMode::Custom, Some(start), None) => {
                format!("{} - Select End Date", short_date(start))
            }
            (RangeMode::Custom, None, _) => "Custom".to_string(),
        }
    }
}

fn short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}
