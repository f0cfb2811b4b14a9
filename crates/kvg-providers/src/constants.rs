//! Provider Constants
//!
//! Constants specific to provider implementations. Domain defaults live in
//! `kvg-domain`.

// ============================================================================
// REDIS STORE CONSTANTS
// ============================================================================

/// Redis URL used when none is configured
pub const REDIS_DEFAULT_URL: &str = "redis://127.0.0.1:6379";

/// Upper bound for a single Redis round-trip, in milliseconds
pub const REDIS_OPERATION_TIMEOUT_MS: u64 = 2000;

/// Delete the key only while it holds ARGV[1]
pub const REDIS_COMPARE_AND_DELETE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// Reset the key's TTL to ARGV[2] milliseconds only while it holds ARGV[1]
pub const REDIS_REFRESH_IF_EQUALS_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("PEXPIRE", KEYS[1], ARGV[2])
else
    return 0
end
"#;

// ============================================================================
// IN-MEMORY REPOSITORY CONSTANTS
// ============================================================================

/// Users preloaded by `InMemoryUserRepository::with_sample_users`
pub const SAMPLE_USERS: &[(i64, &str, &str)] = &[
    (1, "alice", "Alice"),
    (2, "bob", "Bob"),
    (3, "carol", "Carol"),
];
