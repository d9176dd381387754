//! Mode exclusivity: the radio carries one role at a time.
//!
//! Whatever sequence of AP and station requests the caller makes, the
//! previous mode must be shut down before the next one comes up, and at
//! no point may an AP and a station association both be live.

use fancontrol::app::events::NetEvent;
use fancontrol::app::manager::{ConnectivityManager, LinkState};

use crate::mock_radio::{home_identity, setup_ap_config, FakeRadio, RadioCall, FakeClock, RecordingSink};

#[test]
fn ap_then_sta_tears_down_ap_first() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::connects_after(0);
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    mgr.start_ap_mode(&mut radio, &mut sink, &setup_ap_config())
        .unwrap();
    mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 5_000)
        .unwrap();

    assert!(matches!(
        radio.calls.as_slice(),
        [
            RadioCall::StartAccessPoint { .. },
            RadioCall::ShutDown,
            RadioCall::BeginAssociation { .. },
        ]
    ));
    assert!(!radio.both_roles_observed);

    // Teardown event precedes the new attempt's events.
    let teardown_idx = sink
        .events
        .iter()
        .position(|e| matches!(e, NetEvent::ModeTornDown { from: LinkState::ApActive }))
        .unwrap();
    let connecting_idx = sink
        .events
        .iter()
        .position(|e| matches!(e, NetEvent::StaConnecting { .. }))
        .unwrap();
    assert!(teardown_idx < connecting_idx);
}

#[test]
fn sta_then_ap_tears_down_association_first() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::connects_after(0);
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 5_000)
        .unwrap();
    mgr.start_ap_mode(&mut radio, &mut sink, &setup_ap_config())
        .unwrap();

    assert_eq!(mgr.link_state(), LinkState::ApActive);
    assert!(matches!(
        radio.calls.as_slice(),
        [
            RadioCall::BeginAssociation { .. },
            RadioCall::ShutDown,
            RadioCall::StartAccessPoint { .. },
        ]
    ));
    assert!(sink.events.contains(&NetEvent::ModeTornDown {
        from: LinkState::StaConnected
    }));
    assert!(!radio.both_roles_observed);
}

#[test]
fn failed_station_needs_no_teardown() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::new(); // association never resolves
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    let _ = mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 500);
    assert_eq!(mgr.link_state(), LinkState::StaFailed);

    mgr.start_ap_mode(&mut radio, &mut sink, &setup_ap_config())
        .unwrap();

    // The failure path already silenced the radio; no second shutdown
    // and no teardown event for a dead mode.
    assert_eq!(radio.shut_downs(), 1);
    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, NetEvent::ModeTornDown { .. })));
}

#[test]
fn repeated_mode_flips_never_overlap_roles() {
    let mut mgr = ConnectivityManager::new();
    let mut radio = FakeRadio::connects_after(0);
    let mut clock = FakeClock::new();
    let mut sink = RecordingSink::new();

    for _ in 0..4 {
        mgr.start_ap_mode(&mut radio, &mut sink, &setup_ap_config())
            .unwrap();
        mgr.start_sta_mode(&mut radio, &mut clock, &mut sink, &home_identity(), 5_000)
            .unwrap();
    }

    assert!(!radio.both_roles_observed);
    assert_eq!(mgr.link_state(), LinkState::StaConnected);
}
