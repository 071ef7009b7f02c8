//! `suites/json` wire format

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::state::{ParseStateError, StateBucket};
use crate::domain::summary::{InstanceSummary, StatusCounts};

/// Relative path of the summary endpoint, appended to an instance base URL
pub const SUITES_JSON_PATH: &str = "suites/json";

/// Reasons a `suites/json` document cannot become a summary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuitesDecodeError {
    #[error(transparent)]
    UnknownState(#[from] ParseStateError),

    /// Several keys fold into one bucket whose count exceeds `u64`
    #[error("count for state {0:?} overflows")]
    CountOverflow(String),
}

/// Body of `GET {base}/suites/json`
///
/// ```json
/// { "name": "prod-1", "total": 3, "statuses": { "RUNNING": 2, "COMPLETED": 1 } }
/// ```
///
/// An empty `statuses` key counts roots whose state could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitesJson {
    pub name: String,
    pub total: u64,
    pub statuses: BTreeMap<String, u64>,
}

impl SuitesJson {
    /// Decodes the response of the instance at `url` into a summary
    ///
    /// Fails as a whole if any key names an unknown state or a bucket
    /// overflows; nothing is partially decoded.
    pub fn into_summary(
        self,
        url: impl Into<String>,
    ) -> Result<InstanceSummary, SuitesDecodeError> {
        let mut counts = StatusCounts::new();
        for (key, count) in self.statuses {
            let bucket = StateBucket::from_wire_key(&key)?;
            // Blank keys differing only by whitespace share a bucket.
            let total = counts
                .get(bucket)
                .checked_add(count)
                .ok_or(SuitesDecodeError::CountOverflow(key))?;
            counts.insert(bucket, total);
        }
        Ok(InstanceSummary::remote(url, self.name, self.total, counts))
    }
}

impl InstanceSummary {
    /// Encodes this summary the way an instance serves it on `suites/json`
    pub fn to_wire(&self) -> SuitesJson {
        SuitesJson {
            name: self.name().to_string(),
            total: self.total_roots(),
            statuses: self
                .counts()
                .iter()
                .map(|(bucket, count)| (bucket.wire_key().to_string(), count))
                .collect(),
        }
    }
}
