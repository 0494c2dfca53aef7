use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::util::format_with_commas;

pub const DEFAULT_TICK_COUNT: usize = 10;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Upper bound on generated ticks for pathological domains.
const MAX_TICKS: usize = 10_000;

/// A scale that can feed an axis.
pub trait AxisScale {
    fn range(&self) -> (f32, f32);

    /// Tick positions in range space, paired with their labels.
    fn axis_ticks(&self, count: usize) -> Vec<(f32, String)>;
}

/// Ticks are `i * inc` for `i1..=i2`, or `i / -inc` when `inc` is negative
/// (keeps fractional steps free of accumulated error).
#[derive(Debug, Clone, Copy)]
struct TickLayout {
    i1: i64,
    i2: i64,
    inc: f64,
}

impl TickLayout {
    fn value(&self, i: i64) -> f64 {
        if self.inc < 0.0 {
            i as f64 / -self.inc
        } else {
            i as f64 * self.inc
        }
    }

    fn step(&self) -> f64 {
        if self.inc < 0.0 {
            1.0 / -self.inc
        } else {
            self.inc
        }
    }
}

fn tick_layout(start: f64, stop: f64, count: f64) -> Option<TickLayout> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }

    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let s = 10f64.powf(power) * factor;
        i1 = (start / s).round();
        i2 = (stop / s).round();
        if i1 * s < start {
            i1 += 1.0;
        }
        if i2 * s > stop {
            i2 -= 1.0;
        }
        inc = s;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_layout(start, stop, count * 2.0);
    }

    Some(TickLayout {
        i1: i1 as i64,
        i2: i2 as i64,
        inc,
    })
}

/// Round-numbered values (1, 2 or 5 times a power of ten apart) inside
/// `[start, stop]`, roughly `count` of them.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    let Some(layout) = tick_layout(lo, hi, count as f64) else {
        return Vec::new();
    };
    if layout.i2 < layout.i1 {
        return Vec::new();
    }

    let mut out: Vec<f64> = (layout.i1..=layout.i2)
        .take(MAX_TICKS)
        .map(|i| layout.value(i))
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Distance between adjacent values of [`ticks`]; zero for an empty domain.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    match tick_layout(lo, hi, count as f64) {
        Some(layout) if reverse => -layout.step(),
        Some(layout) => layout.step(),
        None => 0.0,
    }
}

/// Decimals needed to tell apart values `step` apart.
fn precision_fixed(step: f64) -> usize {
    let step = step.abs();
    if step == 0.0 || !step.is_finite() {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    /// Degenerate domains map every value to the middle of the range.
    pub fn map(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span != 0.0 {
            (value - d0) / span
        } else {
            0.5
        };
        r0 + (r1 - r0) * t as f32
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    pub fn format_tick(&self, value: f64, count: usize) -> String {
        let step = tick_step(self.domain.0, self.domain.1, count);
        format_with_commas(value, precision_fixed(step))
    }
}

impl AxisScale for LinearScale {
    fn range(&self) -> (f32, f32) {
        self.range
    }

    fn axis_ticks(&self, count: usize) -> Vec<(f32, String)> {
        self.ticks(count)
            .into_iter()
            .map(|v| (self.map(v), self.format_tick(v, count)))
            .collect()
    }
}

const SECOND_MS: i64 = 1_000;
const MINUTE_MS: i64 = 60 * SECOND_MS;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Weeks start on Sunday.
    Week,
    Month,
    Year,
}

const TICK_INTERVALS: [(TimeUnit, i64, i64); 18] = [
    (TimeUnit::Second, 1, SECOND_MS),
    (TimeUnit::Second, 5, 5 * SECOND_MS),
    (TimeUnit::Second, 15, 15 * SECOND_MS),
    (TimeUnit::Second, 30, 30 * SECOND_MS),
    (TimeUnit::Minute, 1, MINUTE_MS),
    (TimeUnit::Minute, 5, 5 * MINUTE_MS),
    (TimeUnit::Minute, 15, 15 * MINUTE_MS),
    (TimeUnit::Minute, 30, 30 * MINUTE_MS),
    (TimeUnit::Hour, 1, HOUR_MS),
    (TimeUnit::Hour, 3, 3 * HOUR_MS),
    (TimeUnit::Hour, 6, 6 * HOUR_MS),
    (TimeUnit::Hour, 12, 12 * HOUR_MS),
    (TimeUnit::Day, 1, DAY_MS),
    (TimeUnit::Day, 2, 2 * DAY_MS),
    (TimeUnit::Week, 1, WEEK_MS),
    (TimeUnit::Month, 1, MONTH_MS),
    (TimeUnit::Month, 3, 3 * MONTH_MS),
    (TimeUnit::Year, 1, YEAR_MS),
];

fn to_millis(t: NaiveDateTime) -> i64 {
    t.and_utc().timestamp_millis()
}

fn from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

impl TimeUnit {
    pub fn floor(self, t: NaiveDateTime) -> NaiveDateTime {
        let date = t.date();
        let floored = match self {
            TimeUnit::Millisecond => {
                let nanos = t.nanosecond() - t.nanosecond() % 1_000_000;
                t.with_nanosecond(nanos)
            }
            TimeUnit::Second => t.with_nanosecond(0),
            TimeUnit::Minute => date.and_hms_opt(t.hour(), t.minute(), 0),
            TimeUnit::Hour => date.and_hms_opt(t.hour(), 0, 0),
            TimeUnit::Day => Some(date.and_time(NaiveTime::MIN)),
            TimeUnit::Week => {
                let back = i64::from(date.weekday().num_days_from_sunday());
                date.checked_sub_signed(TimeDelta::days(back))
                    .map(|d| d.and_time(NaiveTime::MIN))
            }
            TimeUnit::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .map(|d| d.and_time(NaiveTime::MIN)),
            TimeUnit::Year => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).map(|d| d.and_time(NaiveTime::MIN))
            }
        };
        floored.unwrap_or(t)
    }

    pub fn offset(self, t: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
        let months = |m: i64| -> Option<NaiveDateTime> {
            let m = u32::try_from(m.unsigned_abs()).ok()?;
            if n >= 0 {
                t.checked_add_months(Months::new(m))
            } else {
                t.checked_sub_months(Months::new(m))
            }
        };

        match self {
            TimeUnit::Millisecond => t.checked_add_signed(TimeDelta::milliseconds(n)),
            TimeUnit::Second => t.checked_add_signed(TimeDelta::seconds(n)),
            TimeUnit::Minute => t.checked_add_signed(TimeDelta::minutes(n)),
            TimeUnit::Hour => t.checked_add_signed(TimeDelta::hours(n)),
            TimeUnit::Day => t.checked_add_signed(TimeDelta::days(n)),
            TimeUnit::Week => t.checked_add_signed(TimeDelta::weeks(n)),
            TimeUnit::Month => months(n),
            TimeUnit::Year => months(n.checked_mul(12)?),
        }
    }

    pub fn ceil(self, t: NaiveDateTime) -> Option<NaiveDateTime> {
        let floored = self.floor(t);
        if floored == t {
            Some(t)
        } else {
            self.offset(floored, 1)
        }
    }

    /// The calendar field that sparse intervals are aligned on.
    fn field(self, t: NaiveDateTime) -> i64 {
        match self {
            TimeUnit::Millisecond => to_millis(t),
            TimeUnit::Second => i64::from(t.second()),
            TimeUnit::Minute => i64::from(t.minute()),
            TimeUnit::Hour => i64::from(t.hour()),
            TimeUnit::Day => i64::from(t.day0()),
            TimeUnit::Week => 0,
            TimeUnit::Month => i64::from(t.month0()),
            TimeUnit::Year => i64::from(t.year()),
        }
    }
}

/// Every `every`-th boundary of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub every: i64,
}

impl TimeInterval {
    pub fn new(unit: TimeUnit, every: i64) -> Self {
        Self {
            unit,
            every: every.max(1),
        }
    }

    /// Interval boundaries in `[start, stop)`.
    pub fn range(&self, start: NaiveDateTime, stop: NaiveDateTime) -> Vec<NaiveDateTime> {
        let mut out = Vec::new();

        if self.unit == TimeUnit::Millisecond {
            let (from, to) = (to_millis(start), to_millis(stop));
            let mut ms = from.div_euclid(self.every) * self.every;
            if ms < from {
                ms += self.every;
            }
            while ms < to && out.len() < MAX_TICKS {
                if let Some(t) = from_millis(ms) {
                    out.push(t);
                }
                ms += self.every;
            }
            return out;
        }

        let Some(mut t) = self.unit.ceil(start) else {
            return out;
        };
        let mut steps = 0;
        while t < stop && steps < MAX_TICKS * 4 {
            if self.unit.field(t).rem_euclid(self.every) == 0 {
                out.push(t);
            }
            match self.unit.offset(t, 1) {
                Some(next) => t = next,
                None => break,
            }
            steps += 1;
        }
        out
    }
}

/// Picks the interval whose spacing is closest to `span / count`.
pub fn time_tick_interval(start: NaiveDateTime, stop: NaiveDateTime, count: usize) -> TimeInterval {
    let (from, to) = (to_millis(start), to_millis(stop));
    let target = (to - from).abs() as f64 / count.max(1) as f64;

    let i = TICK_INTERVALS.partition_point(|(_, _, ms)| (*ms as f64) <= target);

    if i == TICK_INTERVALS.len() {
        let years = tick_step(
            from as f64 / YEAR_MS as f64,
            to as f64 / YEAR_MS as f64,
            count,
        );
        return TimeInterval::new(TimeUnit::Year, years.abs().floor() as i64);
    }
    if i == 0 {
        let ms = tick_step(from as f64, to as f64, count).abs().max(1.0);
        return TimeInterval::new(TimeUnit::Millisecond, ms.floor() as i64);
    }

    let (_, _, prev_ms) = TICK_INTERVALS[i - 1];
    let (_, _, next_ms) = TICK_INTERVALS[i];
    let (unit, every, _) = if target / (prev_ms as f64) < (next_ms as f64) / target {
        TICK_INTERVALS[i - 1]
    } else {
        TICK_INTERVALS[i]
    };
    TimeInterval::new(unit, every)
}

/// Labels a tick by the coarsest calendar boundary it sits on.
pub fn format_time_tick(t: NaiveDateTime) -> String {
    let fmt = if TimeUnit::Second.floor(t) < t {
        "%.3f"
    } else if TimeUnit::Minute.floor(t) < t {
        ":%S"
    } else if TimeUnit::Hour.floor(t) < t {
        "%I:%M"
    } else if TimeUnit::Day.floor(t) < t {
        "%I %p"
    } else if TimeUnit::Month.floor(t) < t {
        if TimeUnit::Week.floor(t) < t {
            "%a %d"
        } else {
            "%b %d"
        }
    } else if TimeUnit::Year.floor(t) < t {
        "%B"
    } else {
        "%Y"
    };
    t.format(fmt).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDateTime, NaiveDateTime),
    range: (f32, f32),
}

impl TimeScale {
    pub fn new(domain: (NaiveDateTime, NaiveDateTime), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, t: NaiveDateTime) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = (d1 - d0).num_milliseconds();
        let t = if span != 0 {
            (t - d0).num_milliseconds() as f64 / span as f64
        } else {
            0.5
        };
        r0 + (r1 - r0) * t as f32
    }

    /// A zero-length domain yields its single date as the only tick.
    pub fn ticks(&self, count: usize) -> Vec<NaiveDateTime> {
        let (start, stop) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if count == 0 {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }

        let Some(end) = stop.checked_add_signed(TimeDelta::milliseconds(1)) else {
            return Vec::new();
        };
        time_tick_interval(start, stop, count).range(start, end)
    }
}

impl AxisScale for TimeScale {
    fn range(&self) -> (f32, f32) {
        self.range
    }

    fn axis_ticks(&self, count: usize) -> Vec<(f32, String)> {
        self.ticks(count)
            .into_iter()
            .map(|t| (self.map(t), format_time_tick(t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn unit_interval_ticks() {
        let t = ticks(0.0, 1.0, 10);
        assert_eq!(t.len(), 11);
        assert_eq!(t[0], 0.0);
        assert_eq!(t[3], 0.3);
        assert_eq!(t[10], 1.0);
    }

    #[test]
    fn price_ticks_stay_inside_domain() {
        let t = ticks(145.0, 157.5, 10);
        assert_eq!(t.first(), Some(&145.0));
        assert_eq!(t.last(), Some(&157.0));
        assert!(t.windows(2).all(|w| (w[1] - w[0] - 1.0).abs() < 1e-9));

        let t = ticks(149.75, 152.75, 10);
        assert!(t.iter().all(|v| (149.75..=152.75).contains(v)));
        assert!(t.iter().all(|v| ((v * 10.0).round() - v * 10.0).abs() < 1e-9));
    }

    #[test]
    fn ticks_handle_edge_domains() {
        assert_eq!(ticks(5.0, 5.0, 10), vec![5.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
        assert!(ticks(f64::NAN, 1.0, 10).is_empty());

        let t = ticks(1.0, 0.0, 5);
        assert_eq!(t.first(), Some(&1.0));
        assert_eq!(t.last(), Some(&0.0));
    }

    #[test]
    fn step_follows_one_two_five() {
        assert_eq!(tick_step(0.0, 1.0, 10), 0.1);
        assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_step(0.0, 40.0, 10), 5.0);
        assert_eq!(tick_step(0.0, 30.0, 10), 2.0);
        assert_eq!(tick_step(0.0, 17.0, 10), 2.0);
        assert_eq!(tick_step(1.0, 0.0, 10), -0.1);
        assert_eq!(tick_step(3.0, 3.0, 10), 0.0);
    }

    #[test]
    fn linear_map_inverts_range() {
        let scale = LinearScale::new((100.0, 200.0), (340.0, 0.0));
        assert_eq!(scale.map(100.0), 340.0);
        assert_eq!(scale.map(200.0), 0.0);
        assert_eq!(scale.map(150.0), 170.0);
    }

    #[test]
    fn linear_map_degenerate_domain_hits_midpoint() {
        let scale = LinearScale::new((7.0, 7.0), (0.0, 100.0));
        assert_eq!(scale.map(7.0), 50.0);
    }

    #[test]
    fn linear_labels_use_step_precision() {
        let coarse = LinearScale::new((140.0, 160.0), (0.0, 1.0));
        assert_eq!(coarse.format_tick(150.0, 10), "150");

        let fine = LinearScale::new((150.0, 152.0), (0.0, 1.0));
        assert_eq!(fine.format_tick(150.2, 10), "150.2");

        let big = LinearScale::new((0.0, 5000.0), (0.0, 1.0));
        assert_eq!(big.format_tick(2500.0, 10), "2,500");
    }

    #[test]
    fn month_of_daily_data_ticks_every_other_day() {
        let scale = TimeScale::new((at(2023, 11, 1, 0, 0), at(2023, 11, 30, 0, 0)), (0.0, 560.0));
        let ticks = scale.ticks(10);

        assert_eq!(ticks.len(), 15);
        assert_eq!(ticks[0], at(2023, 11, 1, 0, 0));
        assert_eq!(ticks[1], at(2023, 11, 3, 0, 0));
        assert!(ticks.iter().all(|t| TimeUnit::Day.floor(*t) == *t));
    }

    #[test]
    fn short_ranges_use_daily_ticks() {
        let scale = TimeScale::new((at(2023, 11, 1, 0, 0), at(2023, 11, 3, 0, 0)), (0.0, 560.0));
        let ticks = scale.ticks(10);

        assert!(ticks.len() >= 3);
        assert_eq!(ticks[0], at(2023, 11, 1, 0, 0));
        assert_eq!(ticks.last(), Some(&at(2023, 11, 3, 0, 0)));
    }

    #[test]
    fn multi_year_ranges_use_years() {
        let interval = time_tick_interval(at(2000, 1, 1, 0, 0), at(2040, 1, 1, 0, 0), 10);
        assert_eq!(interval.unit, TimeUnit::Year);
        assert_eq!(interval.every, 5);

        let ticks = interval.range(at(2000, 1, 1, 0, 0), at(2040, 1, 1, 0, 1));
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks[1], at(2005, 1, 1, 0, 0));
    }

    #[test]
    fn time_map_degenerate_domain_hits_midpoint() {
        let day = at(2023, 11, 3, 0, 0);
        let scale = TimeScale::new((day, day), (0.0, 560.0));

        assert_eq!(scale.map(day), 280.0);
        assert_eq!(scale.ticks(10), vec![day]);
    }

    #[test]
    fn time_labels_pick_the_coarsest_boundary() {
        // 2023-11-01 is a Wednesday, 2023-11-05 a Sunday
        assert_eq!(format_time_tick(at(2023, 11, 1, 0, 0)), "November");
        assert_eq!(format_time_tick(at(2023, 11, 2, 0, 0)), "Thu 02");
        assert_eq!(format_time_tick(at(2023, 11, 5, 0, 0)), "Nov 05");
        assert_eq!(format_time_tick(at(2023, 1, 1, 0, 0)), "2023");
        assert_eq!(format_time_tick(at(2023, 11, 2, 12, 0)), "12 PM");
        assert_eq!(format_time_tick(at(2023, 11, 2, 9, 30)), "09:30");
    }

    #[test]
    fn week_floor_lands_on_sunday() {
        let wed = at(2023, 11, 8, 15, 0);
        assert_eq!(TimeUnit::Week.floor(wed), at(2023, 11, 5, 0, 0));
        assert_eq!(TimeUnit::Month.ceil(wed), Some(at(2023, 12, 1, 0, 0)));
    }
}
