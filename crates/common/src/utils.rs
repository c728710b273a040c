/// Get current timestamp in milliseconds since Unix epoch
/// Used as both the signed timestamp and the public id of an upload
pub fn get_current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
