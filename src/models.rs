//! Response records
//!
//! Each record is a flat view of one result row, built per request and dropped
//! once the response is serialized. Field names on the wire follow the
//! published API, not the column names.

use serde::{Deserialize, Serialize};

/// A single dated quotation of a verse in a newspaper page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VerseQuotation {
    /// Reference identifier, e.g. `John 3:16`
    pub reference: String,
    /// Bible version the quotation matched
    pub version: String,
    /// Source page identifier
    #[serde(rename = "document")]
    pub doc_id: String,
    /// Publication date as `YYYY-MM-DD`
    pub date: String,
    /// Classifier probability that this is a genuine quotation
    pub probability: f32,
    /// Newspaper title, absent when the page has no catalog entry
    pub title: Option<String>,
}

/// Quotation rate of one verse in one year
///
/// Rates are quotations per million words; `smoothed` is the centered
/// three-year mean of `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerseTrend {
    /// Calendar year
    pub year: i32,
    /// Number of quotations observed
    pub n: i32,
    /// Quotations per million words
    pub rate: f64,
    /// Centered three-year moving average of `rate`
    pub smoothed: f64,
}

/// Verse trend plus the parameters that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseTrendResponse {
    /// Reference that was requested
    pub reference: String,
    /// Corpus the series covers
    pub corpus: String,
    /// One entry per year of the corpus window
    pub trend: Vec<VerseTrend>,
}

/// Christenings of one description in one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChristeningsByYear {
    /// Christening description
    pub christenings_desc: String,
    /// Recorded count, null where the bill is illegible
    pub count: Option<i64>,
    /// Week number within the year
    pub week_no: i32,
    /// Week identifier
    pub week_id: String,
    /// Year
    pub year: i32,
}

/// A distinct christening description label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Christenings {
    /// Description label
    pub name: String,
}

/// A parish with its canonical spelling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Parish {
    /// Numeric parish identifier
    pub id: i32,
    /// Name as transcribed
    pub name: String,
    /// Canonical name used for sorting and matching
    pub canonical_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_quotation_wire_names() {
        let quotation = VerseQuotation {
            reference: "John 3:16".to_string(),
            version: "KJV".to_string(),
            doc_id: "sn84026749/1905-03-02/ed-1/seq-4/".to_string(),
            date: "1905-03-02".to_string(),
            probability: 0.5,
            title: Some("The Washington Times".to_string()),
        };

        let json = serde_json::to_value(&quotation).unwrap();
        assert_eq!(json["document"], "sn84026749/1905-03-02/ed-1/seq-4/");
        assert_eq!(json["probability"], 0.5);
        assert!(json.get("doc_id").is_none());
    }

    #[test]
    fn test_christenings_null_count() {
        let row = ChristeningsByYear {
            christenings_desc: "Christened in the 97 parishes within the walls".to_string(),
            count: None,
            week_no: 3,
            week_id: "1700-03".to_string(),
            year: 1700,
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"count\":null"));
        assert!(json.contains("\"week_no\":3"));
    }

    #[test]
    fn test_trend_response_shape() {
        let response = VerseTrendResponse {
            reference: "Luke 2:14".to_string(),
            corpus: "ncnp".to_string(),
            trend: vec![VerseTrend {
                year: 1800,
                n: 0,
                rate: 0.0,
                smoothed: 0.0,
            }],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["trend"][0]["year"], 1800);
        assert_eq!(json["trend"][0]["smoothed"], 0.0);
    }
}
