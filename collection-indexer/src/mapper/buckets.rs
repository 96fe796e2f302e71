//! Numeric range buckets of the measurement facets.
//!
//! Bucket lists are ordered; the first bucket containing a value wins, so an
//! open-ended bucket whose lower bound equals the upper bound of its
//! predecessor never sees that bound.

/// Lower bound of a bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Lower {
    Inclusive(f64),
    Exclusive(f64),
}

/// One labelled value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    lower: Lower,
    /// Inclusive upper bound; `None` is unbounded.
    upper: Option<f64>,
    pub label: &'static str,
}

impl Bucket {
    /// `[min, max]`
    const fn between(min: f64, max: f64, label: &'static str) -> Self {
        Self {
            lower: Lower::Inclusive(min),
            upper: Some(max),
            label,
        }
    }

    /// `[min, ∞)`
    const fn at_least(min: f64, label: &'static str) -> Self {
        Self {
            lower: Lower::Inclusive(min),
            upper: None,
            label,
        }
    }

    /// `(min, ∞)`
    const fn above(min: f64, label: &'static str) -> Self {
        Self {
            lower: Lower::Exclusive(min),
            upper: None,
            label,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_lower = match self.lower {
            Lower::Inclusive(min) => value >= min,
            Lower::Exclusive(min) => value > min,
        };
        above_lower && self.upper.map_or(true, |max| value <= max)
    }
}

pub const HEIGHT_BUCKETS: &[Bucket] = &[
    Bucket::between(0.0, 9.0, "1-9 mm"),
    Bucket::between(10.0, 19.0, "10-19 mm"),
    Bucket::between(20.0, 29.0, "20-29 mm"),
    Bucket::between(30.0, 49.0, "30-49 mm"),
    Bucket::between(50.0, 55.0, "50-55 mm"),
    Bucket::at_least(55.0, "> 55mm"),
];

pub const WIDTH_BUCKETS: &[Bucket] = &[
    Bucket::between(4.0, 9.0, "4-9 mm"),
    Bucket::between(10.0, 14.0, "10-14 mm"),
    Bucket::between(15.0, 19.0, "15-19 mm"),
    Bucket::between(20.0, 24.0, "20-24 mm"),
    Bucket::between(25.0, 29.0, "25-29 mm"),
    Bucket::between(30.0, 34.0, "30-34 mm"),
    Bucket::at_least(34.0, "> 34mm"),
];

pub const WEIGHT_BUCKETS: &[Bucket] = &[
    Bucket::between(1.0, 9.0, "1-9 g"),
    Bucket::between(10.0, 19.0, "10-19 g"),
    Bucket::between(20.0, 29.0, "20-29 g"),
    Bucket::between(30.0, 39.0, "30-39 g"),
    Bucket::between(40.0, 49.0, "40-49 g"),
    Bucket::between(50.0, 59.0, "50-59 g"),
    Bucket::between(60.0, 80.0, "60-80 g"),
    Bucket::at_least(81.0, "> 80 g"),
];

pub const THICKNESS_BUCKETS: &[Bucket] = &[
    Bucket::between(2.0, 4.0, "2-4 mm"),
    Bucket::between(5.0, 6.0, "5-6 mm"),
    Bucket::between(7.0, 9.0, "7-9 mm"),
    Bucket::above(10.0, "> 9 mm"),
];

/// Label of the first bucket containing `value`.
pub fn bucket_label(buckets: &[Bucket], value: f64) -> Option<&'static str> {
    buckets
        .iter()
        .find(|bucket| bucket.contains(value))
        .map(|bucket| bucket.label)
}
