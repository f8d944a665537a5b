use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A retention point that should hold exactly one backup.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub date: NaiveDateTime,
    pub backup: Option<NaiveDateTime>,
}

impl Bucket {
    pub fn new(date: NaiveDateTime) -> Self {
        Self { date, backup: None }
    }

    pub fn is_filled(&self) -> bool {
        self.backup.is_some()
    }
}
