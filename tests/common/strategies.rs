use proptest::prelude::*;

/// Strategy for cache keys
pub fn cache_key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}(:[0-9]{1,4})?"
}

/// Strategy for tag names
pub fn tag_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Strategy for domain names
pub fn domain_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("users".to_string()),
        Just("challenges".to_string()),
        Just("sessions".to_string()),
        Just("leaderboard".to_string()),
        Just("badges".to_string()),
    ]
}

/// Strategy for cached JSON values
pub fn cached_value_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<i64>().prop_map(serde_json::Value::from),
        any::<bool>().prop_map(serde_json::Value::from),
        "[a-zA-Z0-9 ]{0,32}".prop_map(serde_json::Value::from),
        prop::collection::vec(any::<u32>(), 0..8).prop_map(|items| serde_json::json!(items)),
        ("[a-z]{1,8}", any::<u16>())
            .prop_map(|(name, points)| serde_json::json!({"name": name, "points": points})),
    ]
}

/// Strategy for a batch of `(key, tags)` writes
pub fn tagged_writes_strategy() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec(
        (
            cache_key_strategy(),
            prop::collection::vec(tag_strategy(), 0..3),
        ),
        1..20,
    )
}
