//! Yearly quotation series
//!
//! The store only holds rows for years in which a verse was measured. A trend
//! response always covers the whole corpus window, so missing years are filled
//! with zeros before smoothing.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;
use crate::models::VerseTrend;

/// Newspaper corpora with precomputed quotation rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Corpus {
    /// Chronicling America
    #[default]
    Chronam,
    /// Nineteenth Century Newspapers
    Ncnp,
}

impl Corpus {
    /// Value stored in the `corpus` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Corpus::Chronam => "chronam",
            Corpus::Ncnp => "ncnp",
        }
    }

    /// First year covered, inclusive
    pub fn min_year(&self) -> i32 {
        match self {
            Corpus::Chronam => 1789,
            Corpus::Ncnp => 1800,
        }
    }

    /// Last year covered, inclusive
    pub fn max_year(&self) -> i32 {
        match self {
            Corpus::Chronam => 1963,
            Corpus::Ncnp => 1899,
        }
    }

    /// Number of years in the window
    pub fn span(&self) -> usize {
        (self.max_year() - self.min_year() + 1) as usize
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corpus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chronam" => Ok(Corpus::Chronam),
            "ncnp" => Ok(Corpus::Ncnp),
            other => Err(ApiError::InvalidCorpus(other.to_string())),
        }
    }
}

/// A precomputed rate row as stored
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct YearRate {
    /// Calendar year
    pub year: i32,
    /// Quotations observed
    pub n: i32,
    /// Quotations per million words
    pub rate: f64,
}

/// Build the gap-filled, smoothed series for `[min_year, max_year]`
///
/// Rows outside the window are ignored. When a year appears more than once the
/// last row wins.
pub fn build_series(min_year: i32, max_year: i32, rows: &[YearRate]) -> Vec<VerseTrend> {
    if max_year < min_year {
        return Vec::new();
    }

    let mut series: Vec<VerseTrend> = (min_year..=max_year)
        .map(|year| VerseTrend {
            year,
            n: 0,
            rate: 0.0,
            smoothed: 0.0,
        })
        .collect();

    for row in rows {
        if row.year < min_year || row.year > max_year {
            continue;
        }
        let slot = &mut series[(row.year - min_year) as usize];
        slot.n = row.n;
        slot.rate = row.rate;
    }

    let rates: Vec<f64> = series.iter().map(|t| t.rate).collect();
    for (i, entry) in series.iter_mut().enumerate() {
        entry.smoothed = centered_mean(&rates, i);
    }

    series
}

/// Series for a corpus's full window
pub fn corpus_series(corpus: Corpus, rows: &[YearRate]) -> Vec<VerseTrend> {
    build_series(corpus.min_year(), corpus.max_year(), rows)
}

/// Mean of `values[i-1..=i+1]`, clipped to the slice bounds
fn centered_mean(values: &[f64], i: usize) -> f64 {
    let lo = i.saturating_sub(1);
    let hi = (i + 1).min(values.len() - 1);
    let window = &values[lo..=hi];
    window.iter().sum::<f64>() / window.len() as f64
}
