/// Item primary keys are UUIDv7, generated by the application at insert time.
pub type ItemId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
