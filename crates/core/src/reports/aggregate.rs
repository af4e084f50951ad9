//! Pure aggregation folds over fetched rows.
//!
//! Every percentage in the crate goes through [`safe_ratio`], so no
//! aggregator can divide by zero or produce a non-finite value.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// One hundred, as a `Decimal`.
pub const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Returns `numerator / denominator`, or zero when the denominator is not
/// positive.
#[must_use]
pub fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator
    } else {
        Decimal::ZERO
    }
}

/// Returns `matching / total × 100`; zero for an empty set.
#[must_use]
pub fn rate(matching: u64, total: u64) -> Decimal {
    safe_ratio(Decimal::from(matching), Decimal::from(total)) * HUNDRED
}

/// Returns `part / whole × 100`; zero when the whole is not positive.
#[must_use]
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    safe_ratio(part, whole) * HUNDRED
}

/// Counts rows per category. The sum of counts always equals the row count.
///
/// Keys are ordered so the resulting map serializes deterministically.
pub fn count_by<T, F>(rows: &[T], key: F) -> BTreeMap<String, u64>
where
    F: Fn(&T) -> String,
{
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    counts
}

/// Sums a decimal value per category.
pub fn sum_by<T, K, V>(rows: &[T], key: K, value: V) -> BTreeMap<String, Decimal>
where
    K: Fn(&T) -> String,
    V: Fn(&T) -> Decimal,
{
    let mut sums = BTreeMap::new();
    for row in rows {
        *sums.entry(key(row)).or_insert(Decimal::ZERO) += value(row);
    }
    sums
}

/// A value with a weight, for weighted means.
#[derive(Debug, Clone, Copy)]
pub struct WeightedEntry {
    /// The weight (e.g. section length in metres).
    pub weight: Decimal,
    /// The value (e.g. progress percentage).
    pub value: Decimal,
}

/// Weighted mean `Σ(value × weight) / Σ(weight)`; zero when the total
/// weight is not positive.
#[must_use]
pub fn weighted_mean(entries: &[WeightedEntry]) -> Decimal {
    let total_weight: Decimal = entries.iter().map(|e| e.weight).sum();
    let weighted_sum: Decimal = entries.iter().map(|e| e.value * e.weight).sum();
    safe_ratio(weighted_sum, total_weight)
}

/// Geographic bounding box over a set of GPS points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Maximum latitude.
    pub north: Decimal,
    /// Minimum latitude.
    pub south: Decimal,
    /// Maximum longitude.
    pub east: Decimal,
    /// Minimum longitude.
    pub west: Decimal,
}

/// Returns the bounding box of `(latitude, longitude)` pairs, or `None`
/// for an empty set.
#[must_use]
pub fn bounding_box(coordinates: &[(Decimal, Decimal)]) -> Option<BoundingBox> {
    let (&(first_lat, first_lng), rest) = coordinates.split_first()?;

    let mut bbox = BoundingBox {
        north: first_lat,
        south: first_lat,
        east: first_lng,
        west: first_lng,
    };

    for &(lat, lng) in rest {
        bbox.north = bbox.north.max(lat);
        bbox.south = bbox.south.min(lat);
        bbox.east = bbox.east.max(lng);
        bbox.west = bbox.west.min(lng);
    }

    Some(bbox)
}

/// Groups timestamps by UTC calendar day, counting entries per day.
///
/// Keys are ordered dates, serialized as ISO-8601 strings.
pub fn daily_activity(timestamps: &[DateTime<Utc>]) -> BTreeMap<NaiveDate, u64> {
    let mut days = BTreeMap::new();
    for ts in timestamps {
        *days.entry(ts.date_naive()).or_insert(0) += 1;
    }
    days
}
