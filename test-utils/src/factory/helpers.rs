//! Shared helper utilities for factory methods.

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// Used to generate unique Discord ids, nation names and town ids across factories.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Normalizes a nation name the same way the mapping store does.
///
/// # Arguments
/// - `name` - Nation name as displayed
///
/// # Returns
/// - `String` - Trimmed, lowercased name
pub fn normalize_nation(name: &str) -> String {
    name.trim().to_lowercase()
}
