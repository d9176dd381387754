//! Integration tests for station-mode association.
//!
//! The fake clock advances simulated time inside `delay_ns`, so even the
//! sixty-second timeout scenarios run in microseconds of wall time.

use fancontrol::app::events::NetEvent;
use fancontrol::app::manager::{
    ConnectivityManager, LinkState, NetError, STA_POLL_INTERVAL_MS,
};
use fancontrol::app::ports::{RadioError, TimePort};

use crate::mock_radio::{home_identity, FakeClock, FakeRadio, RadioCall, RecordingSink, CONNECTED_IP};

#[test]
fn sta_success_reports_full_event_chain() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::connects_after(2);
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 10_000)
        .unwrap();

    assert_eq!(mgr.link_state(), LinkState::StaConnected);
    assert!(matches!(
        sink.events.as_slice(),
        [
            NetEvent::StaConnecting { ssid },
            NetEvent::StaConnected { ip, elapsed_ms: 500 },
        ] if ssid.as_str() == "HomeNet" && *ip == CONNECTED_IP
    ));
    // A success leaves the radio associated: no shutdown.
    assert_eq!(radio.shut_downs(), 0);
}

#[test]
fn sta_zero_timeout_fails_immediately_when_not_associated() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::new();
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    let err = mgr
        .start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 0)
        .unwrap_err();

    assert_eq!(err, NetError::ConnectionTimeout);
    assert_eq!(mgr.link_state(), LinkState::StaFailed);
    // One status check, zero sleeps: never blocks.
    assert_eq!(radio.status_polls, 1);
    assert_eq!(clock.delay_calls(), 0);
    assert_eq!(clock.now_ms(), 0);
}

#[test]
fn sta_zero_timeout_succeeds_when_already_associated() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::connects_after(0);
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 0)
        .unwrap();

    assert_eq!(mgr.link_state(), LinkState::StaConnected);
    assert_eq!(clock.delay_calls(), 0);
}

#[test]
fn sta_rejection_is_auth_error_not_timeout() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::rejects_after(3);
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    let err = mgr
        .start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 60_000)
        .unwrap_err();

    assert_eq!(err, NetError::AuthenticationRejected);
    assert_eq!(mgr.link_state(), LinkState::StaFailed);
    // Rejection resolves well before the deadline.
    assert!(clock.now_ms() < 60_000);
    assert!(matches!(
        sink.events.last(),
        Some(NetEvent::StaFailed {
            reason: NetError::AuthenticationRejected,
            ..
        })
    ));
}

#[test]
fn sta_timeout_returns_within_one_interval_slack() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::new(); // never resolves
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();
    let timeout: u32 = 2_000;

    let err = mgr
        .start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), timeout)
        .unwrap_err();

    assert_eq!(err, NetError::ConnectionTimeout);
    assert!(clock.now_ms() >= u64::from(timeout));
    assert!(clock.now_ms() <= u64::from(timeout + STA_POLL_INTERVAL_MS));
}

#[test]
fn sta_makes_exactly_one_association_attempt() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::new();
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    let _ = mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 5_000);

    let attempts = radio
        .calls
        .iter()
        .filter(|c| matches!(c, RadioCall::BeginAssociation { .. }))
        .count();
    assert_eq!(attempts, 1);
}

#[test]
fn sta_radio_is_silenced_on_every_failure_path() {
    // Timeout.
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::new();
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();
    let _ = mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 1_000);
    assert_eq!(radio.last_call(), Some(&RadioCall::ShutDown));

    // Explicit rejection.
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::rejects_after(0);
    let mut clock = FakeClock::new();
    let _ = mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 1_000);
    assert_eq!(radio.last_call(), Some(&RadioCall::ShutDown));

    // Driver refuses to even start the attempt.
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::new();
    radio.begin_result = Err(RadioError::Driver(-42));
    let mut clock = FakeClock::new();
    let err = mgr
        .start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 1_000)
        .unwrap_err();
    assert_eq!(err, NetError::RadioConfiguration(RadioError::Driver(-42)));
    assert_eq!(radio.last_call(), Some(&RadioCall::ShutDown));
    assert_eq!(radio.status_polls, 0);
}

#[test]
fn sta_failure_event_carries_elapsed_time() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::rejects_after(2);
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    let _ = mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 10_000);

    // Two pending polls before the rejection: two poll intervals elapsed.
    assert!(matches!(
        sink.events.last(),
        Some(NetEvent::StaFailed { elapsed_ms: 500, .. })
    ));
}
