// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn uuid_gen_creates_unique_tokens() {
    let tokens = UuidTokenGen;
    let t1 = tokens.next();
    let t2 = tokens.next();
    assert_ne!(t1, t2);
    assert_eq!(t1.as_str().len(), 36);
}

#[test]
fn sequential_gen_is_shared_across_clones() {
    let gen1 = SequentialTokenGen::new("acq");
    let gen2 = gen1.clone();
    assert_eq!(gen1.next(), Token::new("acq-1"));
    assert_eq!(gen2.next(), Token::new("acq-2"));
    assert_eq!(gen1.next(), Token::new("acq-3"));
}

#[test]
fn ids_serialize_as_plain_strings() {
    let json = serde_json::to_string(&ResourceId::new("db-pool")).unwrap();
    assert_eq!(json, "\"db-pool\"");

    let back: RequesterId = serde_json::from_str("\"wf-7\"").unwrap();
    assert_eq!(back, RequesterId::new("wf-7"));
    assert_eq!(back.to_string(), "wf-7");
}
