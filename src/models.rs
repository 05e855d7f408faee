use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One ranked entry as returned by the trends service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrendItem {
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub subreddit: String,
    pub score: u64,
    pub comments: u64,
    // Unix seconds of the underlying post; older service builds omit it
    #[serde(default)]
    pub created: Option<f64>,
}

impl TrendItem {
    /// Posting time of the underlying item, if the service sent one.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let created = self.created?;
        if !created.is_finite() || created < 0.0 {
            return None;
        }
        let secs = created.trunc() as i64;
        let nanos = (created.fract() * 1_000_000_000.0) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// Top-level body of `GET /api/trends`.
#[derive(Debug, Deserialize)]
pub struct TrendsResponse {
    pub trends: Vec<TrendItem>,
}

// Ids are opaque to the dashboard. Reddit sends base36 strings, but plain
// numbers are accepted too and kept in their textual form.
#[derive(Deserialize)]
#[serde(untagged)]
enum OpaqueId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

fn deserialize_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OpaqueId::deserialize(deserializer)? {
        OpaqueId::Text(id) => id,
        OpaqueId::Unsigned(id) => id.to_string(),
        OpaqueId::Signed(id) => id.to_string(),
    })
}
