//! Bounded range randomizers.
//!
//! One algorithm serves every bounded type. A type opts in by
//! implementing RangeValue: its default bounds plus a way to pick a
//! uniform value in [min, max]. Integer and calendar types pick by
//! counting steps from `min` (see Ordinal); floats interpolate.
//!
//! RULES:
//!   - Bounds are validated and defaulted once, at construction.
//!   - Both ends are inclusive.
//!   - A zero-width range returns `min` without touching the source.

use crate::{
    error::{RandomizerError, RandomizerResult},
    randomizer::Randomizer,
    rng::SharedSource,
};
use chrono::{Days, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroU64;

/// A type with default bounds and a uniform pick over an inclusive range.
pub trait RangeValue: Copy + PartialOrd + fmt::Debug {
    fn default_min() -> Self;
    fn default_max() -> Self;

    /// Whether a value may serve as a bound at all.
    fn is_valid_bound(&self) -> bool {
        true
    }

    /// Pick uniformly in [min, max]. Callers guarantee `min <= max`.
    fn pick(min: Self, max: Self, source: &SharedSource) -> Self;
}

/// A type whose values can be counted off one step at a time.
pub trait Ordinal: Copy + PartialOrd {
    /// Steps from `lo` to `hi`, with `lo <= hi`.
    fn steps_between(lo: Self, hi: Self) -> u64;

    /// The value `n` steps after `self`. Only called with `n` inside the range.
    fn nth_after(self, n: u64) -> Self;
}

/// Uniform pick over an ordinal range, free of modulo bias.
///
/// A span of `u64::MAX` steps covers the whole u64 draw space, so the raw
/// draw is used directly.
pub fn pick_ordinal<T: Ordinal>(min: T, max: T, source: &SharedSource) -> T {
    let span = T::steps_between(min, max);
    if span == 0 {
        return min;
    }
    let offset = match NonZeroU64::new(span.wrapping_add(1)) {
        Some(width) => source.next_below(width),
        None        => source.next_u64(),
    };
    min.nth_after(offset)
}

macro_rules! integer_range_value {
    ($($t:ty),* $(,)?) => {$(
        impl Ordinal for $t {
            fn steps_between(lo: Self, hi: Self) -> u64 {
                (hi as i128 - lo as i128) as u64
            }

            fn nth_after(self, n: u64) -> Self {
                (self as i128 + n as i128) as $t
            }
        }

        impl RangeValue for $t {
            fn default_min() -> Self { <$t>::MIN }
            fn default_max() -> Self { <$t>::MAX }

            fn pick(min: Self, max: Self, source: &SharedSource) -> Self {
                pick_ordinal(min, max, source)
            }
        }
    )*};
}

integer_range_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// Floats interpolate between the bounds; `min * (1 - u) + max * u` stays
// finite even when `max - min` would overflow.
macro_rules! float_range_value {
    ($($t:ty),* $(,)?) => {$(
        impl RangeValue for $t {
            fn default_min() -> Self { <$t>::MIN }
            fn default_max() -> Self { <$t>::MAX }

            fn is_valid_bound(&self) -> bool {
                self.is_finite()
            }

            fn pick(min: Self, max: Self, source: &SharedSource) -> Self {
                if min == max {
                    return min;
                }
                let u = source.next_f64() as $t;
                (min * (1.0 - u) + max * u).clamp(min, max)
            }
        }
    )*};
}

float_range_value!(f32, f64);

// ── Calendar ordinals ──────────────────────────────────────────────
//
// Default window: ten years either side of 2020-01-01. A fixed anchor
// keeps seeded runs reproducible from one day to the next.

const DEFAULT_DATE_FLOOR:   (i32, u32, u32) = (2010, 1, 1);
const DEFAULT_DATE_CEILING: (i32, u32, u32) = (2030, 1, 1);

fn calendar_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("hard-coded calendar date is valid")
}

impl Ordinal for NaiveDate {
    fn steps_between(lo: Self, hi: Self) -> u64 {
        (hi - lo).num_days() as u64
    }

    fn nth_after(self, n: u64) -> Self {
        self.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
    }
}

impl RangeValue for NaiveDate {
    fn default_min() -> Self { calendar_date(DEFAULT_DATE_FLOOR) }
    fn default_max() -> Self { calendar_date(DEFAULT_DATE_CEILING) }

    fn pick(min: Self, max: Self, source: &SharedSource) -> Self {
        pick_ordinal(min, max, source)
    }
}

/// Date-times step in whole seconds.
impl Ordinal for NaiveDateTime {
    fn steps_between(lo: Self, hi: Self) -> u64 {
        (hi - lo).num_seconds() as u64
    }

    fn nth_after(self, n: u64) -> Self {
        self.checked_add_signed(chrono::Duration::seconds(n as i64))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

impl RangeValue for NaiveDateTime {
    fn default_min() -> Self { NaiveDate::default_min().and_time(chrono::NaiveTime::MIN) }
    fn default_max() -> Self { NaiveDate::default_max().and_time(chrono::NaiveTime::MIN) }

    fn pick(min: Self, max: Self, source: &SharedSource) -> Self {
        pick_ordinal(min, max, source)
    }
}

// ── Range randomizer ───────────────────────────────────────────────

/// Uniform values of `T` in an inclusive `[min, max]`.
pub struct RangeRandomizer<T> {
    source: SharedSource,
    min:    T,
    max:    T,
}

impl<T: RangeValue> RangeRandomizer<T> {
    /// Validate and freeze the bounds.
    ///
    /// - both given and `min > max`: `InvalidArgument`
    /// - bounds that cannot be ordered or are not finite: `InvalidArgument`
    /// - an absent bound takes `T`'s default. If the given bound lies
    ///   beyond that default, the defaulted side collapses onto it.
    pub fn new(source: &SharedSource, min: Option<T>, max: Option<T>) -> RandomizerResult<Self> {
        let (min, max) = resolve_bounds(min, max)?;
        Ok(Self {
            source: source.clone(),
            min,
            max,
        })
    }

    pub fn between(source: &SharedSource, min: T, max: T) -> RandomizerResult<Self> {
        Self::new(source, Some(min), Some(max))
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }
}

impl<T: RangeValue> Randomizer<T> for RangeRandomizer<T> {
    fn random_value(&self) -> T {
        T::pick(self.min, self.max, &self.source)
    }
}

impl<T: fmt::Debug> fmt::Debug for RangeRandomizer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeRandomizer")
            .field("min", &self.min)
            .field("max", &self.max)
            .finish_non_exhaustive()
    }
}

fn resolve_bounds<T: RangeValue>(min: Option<T>, max: Option<T>) -> RandomizerResult<(T, T)> {
    if let Some(bad) = [min, max].into_iter().flatten().find(|b| !b.is_valid_bound()) {
        return Err(RandomizerError::invalid_argument(format!("{bad:?} cannot be used as a bound")));
    }
    let resolved = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => {
            let max = T::default_max();
            (min, if min > max { min } else { max })
        }
        (None, Some(max)) => {
            let min = T::default_min();
            (if min > max { max } else { min }, max)
        }
        (None, None) => (T::default_min(), T::default_max()),
    };

    match resolved.0.partial_cmp(&resolved.1) {
        Some(Ordering::Greater) => Err(RandomizerError::invalid_argument(format!(
            "min must be before or equal to max (min={:?}, max={:?})",
            resolved.0, resolved.1
        ))),
        None => Err(RandomizerError::invalid_argument(format!(
            "bounds are not comparable (min={:?}, max={:?})",
            resolved.0, resolved.1
        ))),
        Some(_) => {
            if min.is_none() || max.is_none() {
                log::debug!("Range bounds defaulted to [{:?}, {:?}]", resolved.0, resolved.1);
            }
            Ok(resolved)
        }
    }
}
