/// All integer primary keys are SQLite INTEGER PRIMARY KEY rowids.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
