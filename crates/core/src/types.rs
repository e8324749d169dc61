/// Backend document identifiers are opaque strings.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (start dates, pickup/delivery dates) carry no time zone.
pub type Date = chrono::NaiveDate;

/// Prefix given to ids minted locally for optimistic creates.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Mint a temporary id for an entity that the server has not created yet.
pub fn temp_id() -> EntityId {
    format!("{TEMP_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

/// Returns `true` if the id was minted by [`temp_id`].
pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

/// Returns `true` if the optional string is present and non-empty after trimming.
pub fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
