use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use dingdong::{
    ConnectionState, ConnectionStatus, Court, ManualClock, OnlineSession, PeerRole, Received,
    ReplicationEngine, SendOutcome, SessionConfig, SessionError, SessionEvent, Side, SystemClock,
    TransportSession, decode,
};

static PORT_COUNTER: AtomicU16 = AtomicU16::new(41000);

fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(10, Ordering::SeqCst)
}

fn test_config(port: u16) -> SessionConfig {
    SessionConfig {
        port,
        host_timeout_secs: 5,
        join_timeout_secs: 5,
        poll_interval_ms: 1,
        ..SessionConfig::default()
    }
}

fn connected_pair() -> (TransportSession, TransportSession, SessionConfig) {
    let config = test_config(next_port());

    let host_config = config.clone();
    let host = thread::spawn(move || {
        let mut transport = TransportSession::default();
        transport.host(&host_config, &SystemClock).map(|_| transport)
    });

    thread::sleep(Duration::from_millis(50));

    let mut join = TransportSession::default();
    join.join("127.0.0.1", &config, &SystemClock).unwrap();
    let host = host.join().unwrap().unwrap();

    (host, join, config)
}

fn wait_for_payload(transport: &mut TransportSession, timeout_ms: u64) -> Option<String> {
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(timeout_ms) {
        if let Received::Latest(payload) = transport.receive() {
            return Some(payload);
        }
        thread::sleep(Duration::from_millis(1));
    }
    None
}

fn drain(transport: &mut TransportSession) {
    thread::sleep(Duration::from_millis(20));
    while let Received::Latest(_) = transport.receive() {}
}

#[test]
fn handshake_confirms_both_sides() {
    let (host, join, config) = connected_pair();

    assert_eq!(host.state(), ConnectionState::Confirmed);
    assert_eq!(join.state(), ConnectionState::Confirmed);

    let expected: SocketAddr = format!("127.0.0.1:{}", config.port).parse().unwrap();
    assert_eq!(join.peer_addr(), Some(expected));

    let join_port = join.local_addr().unwrap().port();
    assert_eq!(host.peer_addr().unwrap().port(), join_port);
}

#[test]
fn host_times_out_on_simulated_clock() {
    let config = SessionConfig {
        port: next_port(),
        host_timeout_secs: 60,
        poll_interval_ms: 1,
        ..SessionConfig::default()
    };
    let clock = ManualClock::with_step(Duration::from_secs(1));
    let mut host = TransportSession::default();

    let result = host.host(&config, &clock);

    assert!(matches!(result, Err(SessionError::HostTimeout)));
    assert_eq!(host.state(), ConnectionState::Unbound);
    assert!(host.peer_addr().is_none());
}

#[test]
fn join_times_out_without_host() {
    let config = SessionConfig {
        port: next_port(),
        join_timeout_secs: 10,
        poll_interval_ms: 1,
        ..SessionConfig::default()
    };
    let clock = ManualClock::with_step(Duration::from_secs(1));
    let mut join = TransportSession::default();

    let result = join.join("127.0.0.1", &config, &clock);

    assert!(matches!(result, Err(SessionError::JoinTimeout)));
    assert_eq!(join.state(), ConnectionState::Unbound);
}

#[test]
fn second_handshake_is_rejected() {
    let (mut host, _join, config) = connected_pair();

    let result = host.host(&config, &SystemClock);

    assert!(matches!(result, Err(SessionError::Transport(_))));
    assert_eq!(host.state(), ConnectionState::Confirmed);
}

#[test]
fn receive_returns_only_latest_datagram() {
    let (mut host, mut join, _) = connected_pair();
    drain(&mut host);

    for y in [100, 200, 300] {
        assert_eq!(join.send(&format!("p2:{}", y)), SendOutcome::Sent);
    }
    thread::sleep(Duration::from_millis(20));

    assert_eq!(host.receive(), Received::Latest("p2:300".to_string()));
    assert_eq!(host.receive(), Received::Empty);
    assert_eq!(host.stats().datagrams_discarded, 2);
}

#[test]
fn reset_marks_session_lost() {
    let (mut host, mut join, _) = connected_pair();
    drain(&mut host);

    join.reset();
    assert_eq!(join.state(), ConnectionState::Unbound);

    let start = Instant::now();
    let mut outcome = Received::Empty;
    while start.elapsed() < Duration::from_millis(500) {
        host.send("bx:1");
        thread::sleep(Duration::from_millis(5));
        outcome = host.receive();
        if outcome != Received::Empty {
            break;
        }
    }

    assert_eq!(outcome, Received::Reset);
    assert!(!host.is_connected());
    assert_eq!(host.state(), ConnectionState::Lost);

    assert_eq!(host.receive(), Received::Empty);
    assert_eq!(host.send("bx:2"), SendOutcome::Failed);
    assert_eq!(host.state(), ConnectionState::Lost);
}

#[test]
fn broadcast_is_interval_gated() {
    let (mut host, mut join, _) = connected_pair();
    let mut engine = ReplicationEngine::new(PeerRole::Host, Duration::from_millis(50));
    engine.begin_round();
    let court = Court::default();
    let start = Instant::now();

    assert_eq!(
        engine.broadcast(&mut host, &court, start),
        Some(SendOutcome::Sent)
    );
    assert_eq!(
        engine.broadcast(&mut host, &court, start + Duration::from_millis(20)),
        None
    );
    assert_eq!(
        engine.broadcast(&mut host, &court, start + Duration::from_millis(50)),
        Some(SendOutcome::Sent)
    );
    assert_eq!(host.stats().datagrams_sent, 2);

    let payload = wait_for_payload(&mut join, 200).expect("no snapshot received");
    assert_eq!(decode(&payload), court.snapshot(PeerRole::Host));
}

fn online_pair() -> (OnlineSession, OnlineSession) {
    let config = test_config(next_port());

    let host_config = config.clone();
    let host = thread::spawn(move || {
        OnlineSession::begin_session(PeerRole::Host, None, &host_config, &SystemClock)
    });

    thread::sleep(Duration::from_millis(50));

    let join =
        OnlineSession::begin_session(PeerRole::Join, Some("127.0.0.1"), &config, &SystemClock)
            .unwrap();
    let host = host.join().unwrap().unwrap();

    (host, join)
}

#[test]
fn session_reports_status_changes() {
    let (mut host, mut join) = online_pair();

    assert_eq!(host.status(), ConnectionStatus::Confirmed);
    assert!(matches!(
        host.drain_events().collect::<Vec<_>>().as_slice(),
        [
            SessionEvent::StatusChanged(ConnectionStatus::Awaiting),
            SessionEvent::StatusChanged(ConnectionStatus::Confirmed)
        ]
    ));
    assert!(matches!(
        join.drain_events().collect::<Vec<_>>().as_slice(),
        [
            SessionEvent::StatusChanged(ConnectionStatus::Connecting),
            SessionEvent::StatusChanged(ConnectionStatus::Confirmed)
        ]
    ));

    join.close();
    join.close();
    assert_eq!(join.status(), ConnectionStatus::Idle);
    assert!(!join.is_connected());
}

#[test]
fn mirror_refreshes_changed_score_once() {
    let (mut host, mut join) = online_pair();
    host.drain_events().for_each(drop);
    join.drain_events().for_each(drop);

    let mut host_court = Court::default();
    host_court.set_score(Side::Left, 5);
    let mut join_court = Court::default();
    join_court.set_score(Side::Left, 3);

    host.begin_round();
    join.begin_round();
    host.tick(&mut host_court, Instant::now());

    let start = Instant::now();
    while join_court.score(Side::Left) != 5 && start.elapsed() < Duration::from_millis(500) {
        join.tick(&mut join_court, Instant::now());
        thread::sleep(Duration::from_millis(1));
    }

    let score_events: Vec<_> = join
        .drain_events()
        .filter(|event| matches!(event, SessionEvent::ScoreChanged { .. }))
        .collect();
    assert_eq!(join_court.score(Side::Left), 5);
    assert!(matches!(
        score_events.as_slice(),
        [SessionEvent::ScoreChanged {
            side: Side::Left,
            score: 5
        }]
    ));
}

#[test]
fn paddle_delta_reaches_authority() {
    let (mut host, mut join) = online_pair();
    host.begin_round();
    join.begin_round();

    let mut host_court = Court::default();
    let mut join_court = Court::default();
    join_court.set_paddle_y(Side::Right, 120);

    assert_eq!(
        join.on_local_paddle_move(&join_court),
        Some(SendOutcome::Sent)
    );

    let start = Instant::now();
    while host_court.paddle_y(Side::Right) != 120 && start.elapsed() < Duration::from_millis(500)
    {
        host.tick(&mut host_court, Instant::now());
        thread::sleep(Duration::from_millis(1));
    }

    assert_eq!(host_court.paddle_y(Side::Right), 120);
    join.tick(&mut join_court, Instant::now());
    assert!(join.stats().datagrams_sent >= 1);
}

#[test]
fn lost_peer_surfaces_disconnect() {
    let (mut host, mut join) = online_pair();
    host.begin_round();
    host.drain_events().for_each(drop);
    join.close();

    let mut court = Court::default();
    let start = Instant::now();
    while host.is_connected() && start.elapsed() < Duration::from_millis(500) {
        host.tick(&mut court, Instant::now() + start.elapsed() * 100);
        thread::sleep(Duration::from_millis(5));
    }

    assert!(!host.is_connected());
    assert_eq!(host.status(), ConnectionStatus::Lost);
    assert!(
        host.drain_events()
            .any(|event| matches!(event, SessionEvent::Failed(SessionError::Disconnected)))
    );
}
