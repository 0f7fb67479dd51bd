use std::thread;
use std::time::Instant;

use anyhow::bail;
use dingdong::{GameMode, OnlineSession, PeerRole, Side, SystemClock};

use crate::config::ClientConfig;
use crate::events::{AppEvent, MatchSetup};
use crate::game::{Input, Match};

/// Plays one online match without a terminal UI. The local paddle follows
/// the ball; progress goes to the log.
pub fn run(role: PeerRole, address: Option<String>, config: &ClientConfig) -> anyhow::Result<()> {
    let setup = MatchSetup {
        mode: GameMode::Online(role),
        end_score: config.end_score,
        address,
    };

    let session = OnlineSession::begin_session(
        role,
        setup.address.as_deref(),
        &config.session,
        &SystemClock,
    )?;
    if let Some(peer) = session.peer_addr() {
        log::info!("Playing against {}", peer);
    }

    let mut game = Match::new(
        &setup,
        Some(session),
        Input::new(config.key_hold()),
        config.session.countdown(),
        Instant::now(),
    )
    .with_autopilot();

    let frame = config.frame_duration();
    let mut finished_at = None;

    loop {
        let frame_start = Instant::now();

        if let Some(AppEvent::MenuError(message)) = game.update(frame_start) {
            bail!(message);
        }

        if game.is_over() {
            let finished = *finished_at.get_or_insert(frame_start);
            // Linger so the final score reaches the peer.
            if frame_start.duration_since(finished) >= config.session.countdown() {
                break;
            }
        }

        if let Some(remaining) = frame.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    let court = game.court();
    log::info!(
        "Match over: {:?} ({} - {})",
        game.outcome(),
        court.score(Side::Left),
        court.score(Side::Right)
    );
    if let Some(session) = game.session() {
        let stats = session.stats();
        log::info!(
            "Datagrams: {} sent, {} received, {} stale",
            stats.datagrams_sent,
            stats.datagrams_received,
            stats.datagrams_discarded
        );
    }

    Ok(())
}
