use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored band record as returned by the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Band {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
    pub albums: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The creation payload for `POST /bands`. Field-level rules are enforced
/// by `bands::validate` before the record reaches a store.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateBand {
    pub name: String,
    pub members: Vec<String>,
    pub albums: i64,
}
