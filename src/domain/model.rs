use serde::{Deserialize, Serialize, Serializer};

/// One travel package from the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: i64,
    pub title: String,
    pub location: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    pub tags: Vec<String>,
}

/// Whole prices go out as JSON integers so `899` in the catalogue stays `899`.
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if price.fract() == 0.0 && price.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

/// An id the model proposed, with its justification. Not trusted until reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchClaim {
    pub id: i64,
    pub reasoning: String,
}

/// Schema-valid model output for a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub matches: Vec<MatchClaim>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A grounded result: every field except `reasoning` comes from the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    pub title: String,
    pub location: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
    pub tags: Vec<String>,
    pub reasoning: String,
}

impl SearchResult {
    pub fn from_record(record: PackageRecord, reasoning: String) -> Self {
        Self {
            id: record.id,
            title: record.title,
            location: record.location,
            price: record.price,
            tags: record.tags,
            reasoning,
        }
    }
}

/// The two instruction blocks sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
