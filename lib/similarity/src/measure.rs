//! Catalogue of the measures understood by the built-in engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of property values a measure compares
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    String,
    Date,
    PointSet,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Cosine,
    Jaccard,
    Jaro,
    QGrams,
    Trigrams,
    ExactMatch,
    Levenshtein,
    DateSim,
    DaySim,
    YearSim,
    Hausdorff,
    SymmetricHausdorff,
    Frechet,
    GeoLink,
    GeoMean,
    Surjection,
    FairSurjection,
}

impl Measure {
    pub const ALL: [Measure; 17] = [
        Measure::Cosine,
        Measure::Jaccard,
        Measure::Jaro,
        Measure::QGrams,
        Measure::Trigrams,
        Measure::ExactMatch,
        Measure::Levenshtein,
        Measure::DateSim,
        Measure::DaySim,
        Measure::YearSim,
        Measure::Hausdorff,
        Measure::SymmetricHausdorff,
        Measure::Frechet,
        Measure::GeoLink,
        Measure::GeoMean,
        Measure::Surjection,
        Measure::FairSurjection,
    ];

    /// Case-insensitive lookup by measure name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Measure::Cosine => "cosine",
            Measure::Jaccard => "jaccard",
            Measure::Jaro => "jaro",
            Measure::QGrams => "qgrams",
            Measure::Trigrams => "trigrams",
            Measure::ExactMatch => "exactmatch",
            Measure::Levenshtein => "levenshtein",
            Measure::DateSim => "datesim",
            Measure::DaySim => "daysim",
            Measure::YearSim => "yearsim",
            Measure::Hausdorff => "hausdorff",
            Measure::SymmetricHausdorff => "symmetrichausdorff",
            Measure::Frechet => "frechet",
            Measure::GeoLink => "geolink",
            Measure::GeoMean => "geomean",
            Measure::Surjection => "surjection",
            Measure::FairSurjection => "fairsurjection",
        }
    }

    pub fn kind(&self) -> MeasureKind {
        match self {
            Measure::Cosine
            | Measure::Jaccard
            | Measure::Jaro
            | Measure::QGrams
            | Measure::Trigrams
            | Measure::ExactMatch
            | Measure::Levenshtein => MeasureKind::String,
            Measure::DateSim | Measure::DaySim | Measure::YearSim => MeasureKind::Date,
            _ => MeasureKind::PointSet,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
