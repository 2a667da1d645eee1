//! Property-Based Tests for sessions
//!
//! Serializer round-trips and size enforcement on save.

use std::sync::Arc;

use axum::http::HeaderMap;
use proptest::prelude::*;
use serde_json::Value;

use crate::cache::{CacheClient, MemoryCache};
use crate::error::SessionError;
use crate::session::serializer::{JsonSerializer, MsgpackSerializer, SessionSerializer};
use crate::session::{Session, SessionKey, SessionOptions, SessionStore};

const HASH_KEY: &[u8] = b"property-test-hash-key";

// == Strategies ==
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,24}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn string_key_strategy() -> impl Strategy<Value = SessionKey> {
    "[a-z_]{1,12}".prop_map(SessionKey::Str)
}

fn any_key_strategy() -> impl Strategy<Value = SessionKey> {
    prop_oneof![string_key_strategy(), any::<i64>().prop_map(SessionKey::Int)]
}

fn session_with(entries: Vec<(SessionKey, Value)>) -> Session {
    let mut session = Session::new("sid", SessionOptions::default());
    session.values.extend(entries);
    session
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // String-keyed values survive the JSON serializer.
    #[test]
    fn prop_json_roundtrip(
        entries in prop::collection::vec((string_key_strategy(), value_strategy()), 0..8)
    ) {
        let original = session_with(entries);

        let bytes = JsonSerializer.serialize(&original).unwrap();
        let mut restored = Session::new("sid", SessionOptions::default());
        JsonSerializer.deserialize(&bytes, &mut restored).unwrap();

        prop_assert_eq!(restored.values, original.values);
    }

    // Any key type survives the MessagePack serializer.
    #[test]
    fn prop_msgpack_roundtrip(
        entries in prop::collection::vec((any_key_strategy(), value_strategy()), 0..8)
    ) {
        let original = session_with(entries);

        let bytes = MsgpackSerializer.serialize(&original).unwrap();
        let mut restored = Session::new("sid", SessionOptions::default());
        MsgpackSerializer.deserialize(&bytes, &mut restored).unwrap();

        prop_assert_eq!(restored.values, original.values);
    }

    // A payload over the limit is rejected before anything reaches the cache.
    #[test]
    fn prop_oversized_payload_never_written(
        max_length in 1usize..256,
        extra in 1usize..64,
    ) {
        let cache = MemoryCache::new();
        let (result, stored) = tokio_test::block_on(async {
            let mut store = SessionStore::with_client(Arc::new(cache.clone()), &[HASH_KEY])
                .await
                .unwrap();
            store.set_serializer(JsonSerializer);
            store.set_max_length(max_length);

            // {"k":"..."} adds 8 bytes around the string.
            let mut session = Session::new("sid", SessionOptions::default());
            session.insert("k", "x".repeat(max_length + extra));

            let result = store.save(&mut session, &mut HeaderMap::new()).await;
            let stored = cache.get(&format!("session_{}", session.id)).await.unwrap();
            (result, stored)
        });

        let is_too_large = matches!(result, Err(SessionError::PayloadTooLarge { .. }));
        prop_assert!(is_too_large);
        prop_assert!(stored.is_none());
    }
}
