// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use yare::parameterized;

#[test]
fn decode_acquire_with_lease_timeout() {
    let signal = Signal::decode(
        "RequestAcquire",
        json!({ "requester": "wf-1", "token": "t-1", "lease_timeout": "30s" }),
    )
    .unwrap();

    assert_eq!(
        signal,
        Signal::RequestAcquire {
            requester: RequesterId::new("wf-1"),
            token: Token::new("t-1"),
            lease_timeout: Some(Duration::from_secs(30)),
        }
    );
}

#[test]
fn decode_acquire_without_lease_timeout() {
    let signal =
        Signal::decode("RequestAcquire", json!({ "requester": "wf-1", "token": "t-1" })).unwrap();
    assert!(matches!(
        signal,
        Signal::RequestAcquire {
            lease_timeout: None,
            ..
        }
    ));
}

#[parameterized(
    release = { "RequestRelease", SignalName::RequestRelease },
    cancel = { "RequestCancel", SignalName::RequestCancel },
)]
fn decode_release_and_cancel(name: &str, expected: SignalName) {
    let payload = if expected == SignalName::RequestRelease {
        json!({ "holder": "wf-1", "token": "t-1" })
    } else {
        json!({ "requester": "wf-1", "token": "t-1" })
    };
    let signal = Signal::decode(name, payload).unwrap();

    assert_eq!(signal.name(), expected);
    assert_eq!(signal.requester(), &RequesterId::new("wf-1"));
    assert_eq!(signal.token(), &Token::new("t-1"));
}

#[test]
fn decode_rejects_unknown_signal() {
    let err = Signal::decode("RequestPriority", json!({})).unwrap_err();
    assert_eq!(
        err,
        CoordinationError::UnknownSignal("RequestPriority".to_string())
    );
}

#[test]
fn decode_rejects_malformed_payload() {
    let err = Signal::decode("RequestRelease", json!({ "token": "t-1" })).unwrap_err();
    assert!(matches!(
        err,
        CoordinationError::MalformedSignal { ref signal, .. } if signal == "RequestRelease"
    ));
}

#[test]
fn signal_json_shape_is_tagged() {
    let signal = Signal::RequestRelease {
        holder: RequesterId::new("wf-1"),
        token: Token::new("t-1"),
    };
    let value = serde_json::to_value(&signal).unwrap();
    assert_eq!(
        value,
        json!({ "signal": "RequestRelease", "payload": { "holder": "wf-1", "token": "t-1" } })
    );
}

#[test]
fn input_roundtrips_through_json() {
    let inputs = vec![
        Input::from(Signal::RequestAcquire {
            requester: RequesterId::new("wf-1"),
            token: Token::new("t-1"),
            lease_timeout: Some(Duration::from_millis(1500)),
        }),
        Input::TimerFired {
            id: "reclaim-1".to_string(),
        },
    ];
    for input in inputs {
        let json = serde_json::to_string(&input).unwrap();
        let back: Input = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
    }
}
