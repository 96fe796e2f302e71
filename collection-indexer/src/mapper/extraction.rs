//! Domain facet rules of item metadata.
//!
//! Every rule is a pure function from the values of one Dublin Core field to
//! a list of [`Assignment`]s. Field names are unprefixed; the item mapper
//! places them in the configured facet namespace.

use collection_indexer_shared::{Record, DUBLIN_CORE};

use crate::mapper::buckets::{
    bucket_label, Bucket, HEIGHT_BUCKETS, THICKNESS_BUCKETS, WEIGHT_BUCKETS, WIDTH_BUCKETS,
};

pub const COLLECTION: &str = "collection";
pub const SUBCOLLECTION: &str = "subcollection";
pub const PERIOD: &str = "period";
pub const AREA: &str = "area";
pub const MATERIAL: &str = "material";
pub const HEIGHT: &str = "height";
pub const DIAMETER: &str = "diameter";
pub const WEIGHT: &str = "weight";
pub const PERFORATED_DIAMETER: &str = "perforated-diameter";
pub const ICONOGRAPHY: &str = "iconography";
pub const KEYWORDS: &str = "keywords";

const ACQUISITION_PREFIX: &str = "Acquisition history :";
const PERIOD_PREFIX: &str = "Period remarks :";
const PROVENIENCE_PREFIX: &str = "Provenience remarks :";
const SUBGENRE_PREFIX: &str = "Subgenre remarks :";

/// One write into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// Set a single-valued facet; `None` unsets it.
    Facet {
        field: &'static str,
        value: Option<String>,
    },
    /// Append to a multi-valued field.
    Multi { field: &'static str, value: String },
}

impl Assignment {
    fn facet(field: &'static str, value: impl Into<String>) -> Self {
        Self::Facet {
            field,
            value: Some(value.into()),
        }
    }

    fn unset(field: &'static str) -> Self {
        Self::Facet { field, value: None }
    }
}

/// A measurement encoded in a Dublin Core Format value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Height,
    Width,
    Weight,
    Thickness,
}

impl Measurement {
    pub const ALL: [Measurement; 4] = [Self::Height, Self::Width, Self::Weight, Self::Thickness];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Height => "Height",
            Self::Width => "Width",
            Self::Weight => "Weight",
            Self::Thickness => "Thickness",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Height => "Height :",
            Self::Width => "Width :",
            Self::Weight => "Weight :",
            Self::Thickness => "Thickness :",
        }
    }

    fn buckets(&self) -> &'static [Bucket] {
        match self {
            Self::Height => HEIGHT_BUCKETS,
            Self::Width => WIDTH_BUCKETS,
            Self::Weight => WEIGHT_BUCKETS,
            Self::Thickness => THICKNESS_BUCKETS,
        }
    }

    /// Facets written by this measurement.
    ///
    /// Thickness also lands in `weight`; existing indexes facet on it.
    pub fn targets(&self) -> &'static [&'static str] {
        match self {
            Self::Height => &[HEIGHT],
            Self::Width => &[DIAMETER],
            Self::Weight => &[WEIGHT],
            Self::Thickness => &[WEIGHT, PERFORATED_DIAMETER],
        }
    }

    fn strip_units(&self, value: &str) -> String {
        match self {
            Self::Height | Self::Width => value.replace(" mm", ""),
            Self::Weight => value.replace('g', ""),
            Self::Thickness => value.replace(" mm", "").replace(" m", ""),
        }
    }

    /// Parse the number of a value stripped of its prefix.
    ///
    /// Returns the stripped text as the error when it is not a finite number.
    pub fn parse(&self, value: &str) -> Result<f64, String> {
        let stripped = self.strip_units(value.trim()).trim().to_string();
        match stripped.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(number),
            _ => Err(stripped),
        }
    }
}

/// A Format value whose measurement is not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMeasurement {
    pub measurement: Measurement,
    pub raw_value: String,
}

/// Result of applying every rule to one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub assignments: Vec<Assignment>,
    pub invalid: Vec<InvalidMeasurement>,
}

/// Apply every domain rule to the Dublin Core metadata of `record`, in
/// field order: Publisher, Provenance, Temporal Coverage, Spatial Coverage,
/// Medium, Format, Subject.
pub fn extract(record: &Record) -> Extraction {
    let dc = |field: &str| record.metadata_all(DUBLIN_CORE, field);

    let mut assignments = Vec::new();
    assignments.extend(collection(&dc("Publisher")));
    assignments.extend(subcollection(&dc("Provenance")));
    assignments.extend(period(&dc("Temporal Coverage")));
    assignments.extend(area(&dc("Spatial Coverage")));
    assignments.extend(material(&dc("Medium")));

    let (format_assignments, invalid) = measurements(&dc("Format"));
    assignments.extend(format_assignments);
    assignments.extend(subjects(&dc("Subject")));

    Extraction {
        assignments,
        invalid,
    }
}

/// First Publisher value, unset when there is none.
pub fn collection(values: &[&str]) -> Vec<Assignment> {
    match values.first() {
        Some(value) => vec![Assignment::facet(COLLECTION, *value)],
        None => vec![Assignment::unset(COLLECTION)],
    }
}

/// Provenance values other than acquisition history; the last one wins.
pub fn subcollection(values: &[&str]) -> Vec<Assignment> {
    values
        .iter()
        .filter(|value| !value.starts_with(ACQUISITION_PREFIX))
        .map(|value| Assignment::facet(SUBCOLLECTION, capitalize(value).trim()))
        .collect()
}

/// Period remarks, cut before any parenthesised qualifier.
pub fn period(values: &[&str]) -> Vec<Assignment> {
    values
        .iter()
        .filter_map(|value| value.strip_prefix(PERIOD_PREFIX))
        .map(|rest| {
            let value = capitalize(rest.trim());
            let value = match value.find('(') {
                Some(index) if index > 0 => value[..index].trim().to_string(),
                _ => value,
            };
            Assignment::facet(PERIOD, value)
        })
        .collect()
}

pub fn area(values: &[&str]) -> Vec<Assignment> {
    values
        .iter()
        .filter_map(|value| value.strip_prefix(PROVENIENCE_PREFIX))
        .map(|rest| Assignment::facet(AREA, capitalize(rest.trim())))
        .collect()
}

/// First Medium value, ignored when blank.
pub fn material(values: &[&str]) -> Vec<Assignment> {
    values
        .first()
        .filter(|value| !value.trim().is_empty())
        .map(|value| vec![Assignment::facet(MATERIAL, capitalize(value.trim()))])
        .unwrap_or_default()
}

/// Bucketed measurements of the Format values.
///
/// A number outside every bucket unsets the targets; text that is not a
/// number leaves them untouched and is reported.
pub fn measurements(values: &[&str]) -> (Vec<Assignment>, Vec<InvalidMeasurement>) {
    let mut assignments = Vec::new();
    let mut invalid = Vec::new();

    for value in values {
        for measurement in Measurement::ALL {
            let Some(rest) = value.strip_prefix(measurement.prefix()) else {
                continue;
            };
            match measurement.parse(rest) {
                Ok(number) => {
                    let label = bucket_label(measurement.buckets(), number);
                    for field in measurement.targets() {
                        assignments.push(Assignment::Facet {
                            field: *field,
                            value: label.map(str::to_string),
                        });
                    }
                }
                Err(raw_value) => invalid.push(InvalidMeasurement {
                    measurement,
                    raw_value,
                }),
            }
        }
    }

    (assignments, invalid)
}

/// Subgenre remarks become the iconography facet, every other subject a keyword.
pub fn subjects(values: &[&str]) -> Vec<Assignment> {
    values
        .iter()
        .map(|value| match value.strip_prefix(SUBGENRE_PREFIX) {
            Some(rest) => Assignment::facet(ICONOGRAPHY, capitalize(rest.trim())),
            None => Assignment::Multi {
                field: KEYWORDS,
                value: capitalize(value.trim()),
            },
        })
        .collect()
}

/// Uppercase the first character.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
