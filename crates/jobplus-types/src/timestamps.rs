//! Creation and modification times shared by every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `created_at` / `updated_at` column pair.
///
/// Both are assigned by the store: `created_at` once on insert, `updated_at`
/// on insert and again on every update of the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Returns `true` if the row has been updated since it was inserted.
    pub fn was_modified(&self) -> bool {
        self.updated_at > self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fresh_row_is_not_modified() {
        let now = Utc::now();
        let ts = Timestamps {
            created_at: now,
            updated_at: now,
        };
        assert!(!ts.was_modified());
    }

    #[test]
    fn later_update_marks_modified() {
        let now = Utc::now();
        let ts = Timestamps {
            created_at: now,
            updated_at: now + Duration::milliseconds(5),
        };
        assert!(ts.was_modified());
    }
}
