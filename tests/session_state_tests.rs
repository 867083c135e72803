// Unit tests for the recording session state machine
//
// These drive `RecordingSession` directly, without a device or timers.

use anyhow::Result;
use emotion_practice::session::{RecordingSession, SessionState, TransitionError};
use emotion_practice::CaptureError;
use std::time::Duration;
use tokio::time::Instant;

fn recording_session(start: Instant) -> Result<RecordingSession> {
    let mut session = RecordingSession::new();
    session.begin_request()?;
    session.begin_recording(start)?;
    Ok(session)
}

#[test]
fn test_session_walks_forward_to_complete() -> Result<()> {
    let start = Instant::now();
    let mut session = RecordingSession::new();
    assert_eq!(session.state(), SessionState::Idle);

    session.begin_request()?;
    assert_eq!(session.state(), SessionState::Requesting);

    session.begin_recording(start)?;
    assert_eq!(session.state(), SessionState::Recording);
    assert_eq!(session.started_at(), Some(start));

    assert!(session.on_data_available(vec![1, 2, 3]));
    assert!(session.on_data_available(vec![4, 5]));

    let duration = session.begin_stop(start + Duration::from_secs(5))?;
    assert_eq!(duration, Duration::from_secs(5));
    assert_eq!(session.state(), SessionState::Stopping);

    let artifact = session.begin_processing()?;
    assert_eq!(session.state(), SessionState::Processing);
    assert_eq!(artifact.bytes(), &[1, 2, 3, 4, 5]);
    assert_eq!(artifact.duration(), Duration::from_secs(5));
    assert_eq!(session.pending_chunks(), 0, "Chunks are cleared once finalized");

    session.complete()?;
    assert_eq!(session.state(), SessionState::Complete);

    let stats = session.stats();
    assert_eq!(stats.fragments_count, 2);
    assert_eq!(stats.bytes_collected, 5);
    assert_eq!(stats.duration_secs, Some(5.0));
    assert!(stats.started_at.is_some());

    Ok(())
}

#[test]
fn test_zero_length_fragments_are_dropped() -> Result<()> {
    let mut session = recording_session(Instant::now())?;

    assert!(!session.on_data_available(Vec::new()));
    assert!(session.on_data_available(vec![7]));
    assert!(!session.on_data_available(Vec::new()));

    assert_eq!(session.pending_chunks(), 1);
    assert_eq!(session.stats().fragments_count, 1);

    Ok(())
}

#[test]
fn test_fragments_outside_recording_are_ignored() -> Result<()> {
    let mut session = RecordingSession::new();
    assert!(!session.on_data_available(vec![1]));

    session.begin_request()?;
    assert!(!session.on_data_available(vec![1]));

    let start = Instant::now();
    session.begin_recording(start)?;
    session.begin_stop(start)?;
    assert!(!session.on_data_available(vec![1]));
    assert_eq!(session.pending_chunks(), 0);

    Ok(())
}

#[test]
fn test_tick_counts_only_while_recording() -> Result<()> {
    let mut session = RecordingSession::new();
    assert_eq!(session.tick(), None);

    session.begin_request()?;
    let start = Instant::now();
    session.begin_recording(start)?;

    assert_eq!(session.tick(), Some(1));
    assert_eq!(session.tick(), Some(2));
    assert_eq!(session.elapsed_secs(), 2);

    session.begin_stop(start)?;
    assert_eq!(session.tick(), None);
    assert_eq!(session.elapsed_secs(), 2);

    Ok(())
}

#[test]
fn test_empty_recording_fails_processing() -> Result<()> {
    let start = Instant::now();
    let mut session = recording_session(start)?;
    session.begin_stop(start + Duration::from_secs(12))?;

    let err = session.begin_processing().unwrap_err();
    assert_eq!(err, CaptureError::EmptyRecording);
    assert_eq!(session.state(), SessionState::Processing);

    session.fail()?;
    assert_eq!(session.state(), SessionState::Failed);

    Ok(())
}

#[test]
fn test_states_cannot_be_skipped_or_revisited() -> Result<()> {
    let mut session = RecordingSession::new();

    let err = session.begin_recording(Instant::now()).unwrap_err();
    assert_eq!(
        err,
        TransitionError {
            from: SessionState::Idle,
            to: SessionState::Recording,
        }
    );

    session.begin_request()?;
    assert!(session.begin_request().is_err(), "Requesting cannot be re-entered");
    assert!(session.complete().is_err());

    Ok(())
}

#[test]
fn test_idle_session_cannot_fail() {
    let mut session = RecordingSession::new();

    let err = session.fail().unwrap_err();
    assert_eq!(
        err,
        TransitionError {
            from: SessionState::Idle,
            to: SessionState::Failed,
        }
    );
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_stop_outside_recording_is_rejected() -> Result<()> {
    let mut session = RecordingSession::new();
    session.begin_request()?;

    assert!(session.begin_stop(Instant::now()).is_err());
    assert_eq!(session.state(), SessionState::Requesting);

    Ok(())
}

#[test]
fn test_terminal_states_stay_terminal() -> Result<()> {
    let mut failed = RecordingSession::new();
    failed.begin_request()?;
    failed.fail()?;
    assert!(failed.fail().is_err());
    assert!(failed.begin_request().is_err());
    assert_eq!(failed.state(), SessionState::Failed);

    let start = Instant::now();
    let mut complete = recording_session(start)?;
    complete.on_data_available(vec![1]);
    complete.begin_stop(start)?;
    complete.begin_processing()?;
    complete.complete()?;
    assert!(complete.fail().is_err());
    assert_eq!(complete.state(), SessionState::Complete);

    Ok(())
}

#[test]
fn test_transition_table() {
    use SessionState::*;

    let all = [Idle, Requesting, Recording, Stopping, Processing, Complete, Failed];
    let forward = [
        (Idle, Requesting),
        (Requesting, Recording),
        (Recording, Stopping),
        (Stopping, Processing),
        (Processing, Complete),
    ];

    for from in all {
        for to in all {
            let expected = forward.contains(&(from, to)) || (to == Failed && from.is_active());
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "{:?} -> {:?}",
                from,
                to
            );
        }
    }
}

#[test]
fn test_active_and_terminal_states() {
    use SessionState::*;

    assert!(!Idle.is_active());
    assert!(Requesting.is_active());
    assert!(Recording.is_active());
    assert!(Stopping.is_active());
    assert!(Processing.is_active());
    assert!(!Complete.is_active());
    assert!(!Failed.is_active());

    assert!(Complete.is_terminal());
    assert!(Failed.is_terminal());
    assert!(!Recording.is_terminal());
}

#[test]
fn test_each_session_gets_its_own_id() {
    let a = RecordingSession::new();
    let b = RecordingSession::new();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.stats().session_id, a.id());
}
