// Tests for the microphone backends and device error mapping

use anyhow::Result;
use emotion_practice::audio::{
    AccessOutcome, CaptureConstraints, DeviceError, DeviceEvent, DeviceGuard, MicrophoneDevice,
    SimulatedMicrophone, WavFileMicrophone,
};
use emotion_practice::CaptureError;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::{self, Instant};

#[test]
fn test_capture_constraints_default() {
    let constraints = CaptureConstraints::default();

    assert!(constraints.echo_cancellation);
    assert!(constraints.noise_suppression);
    assert_eq!(constraints.sample_rate, 44100);
}

#[tokio::test(start_paused = true)]
async fn test_simulated_fragments_arrive_in_sequence() -> Result<()> {
    let mic = SimulatedMicrophone::new(Duration::from_millis(250)).with_fragment_bytes(8);
    let started = Instant::now();

    let mut stream = mic.acquire(&CaptureConstraints::default()).await?;
    assert!(stream.is_live());
    assert!(mic.is_capturing());
    assert_eq!(mic.grants(), 1);

    for n in 0..4u8 {
        let event = stream.next_event().await;
        assert_eq!(event, Some(DeviceEvent::Data(vec![n; 8])));
    }
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1) && elapsed < Duration::from_millis(1250));

    stream.stop_tracks();
    assert!(!stream.is_live());
    assert!(!mic.is_capturing());

    // Stopping twice is harmless
    stream.stop_tracks();

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stop_tracks_ends_the_stream() -> Result<()> {
    let mic = SimulatedMicrophone::new(Duration::from_millis(100));
    let mut stream = mic.acquire(&CaptureConstraints::default()).await?;

    stream.stop_tracks();

    // Anything already buffered may still drain, then the stream ends
    let mut drained = 0;
    while stream.next_event().await.is_some() {
        drained += 1;
    }
    assert!(drained <= 1);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_second_acquire_while_live_is_busy() -> Result<()> {
    let mic = SimulatedMicrophone::new(Duration::from_millis(250));
    let mut first = mic.acquire(&CaptureConstraints::default()).await?;

    let err = mic.acquire(&CaptureConstraints::default()).await.err();
    assert_eq!(err, Some(DeviceError::Busy));
    assert_eq!(mic.grants(), 1);

    first.stop_tracks();
    let mut second = mic.acquire(&CaptureConstraints::default()).await?;
    assert!(mic.is_capturing());
    second.stop_tracks();

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_access_outcomes_map_to_device_errors() {
    let cases = [
        (AccessOutcome::Deny, DeviceError::PermissionDenied),
        (AccessOutcome::NoDevice, DeviceError::NotFound),
        (AccessOutcome::Busy, DeviceError::Busy),
    ];

    for (access, expected) in cases {
        let mic = SimulatedMicrophone::new(Duration::from_millis(250)).with_access(access);
        let err = mic.acquire(&CaptureConstraints::default()).await.err();
        assert_eq!(err, Some(expected));
        assert_eq!(mic.grants(), 0);
        assert!(!mic.is_capturing());
    }
}

#[tokio::test(start_paused = true)]
async fn test_simulated_fault_is_reported() -> Result<()> {
    let mic = SimulatedMicrophone::new(Duration::from_secs(1))
        .with_fragment_bytes(2)
        .failing_after(Duration::from_millis(1500));
    let mut stream = mic.acquire(&CaptureConstraints::default()).await?;

    assert_eq!(stream.next_event().await, Some(DeviceEvent::Data(vec![0; 2])));
    assert!(matches!(stream.next_event().await, Some(DeviceEvent::Error(_))));
    assert_eq!(stream.next_event().await, None);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_device_guard_releases_on_drop() -> Result<()> {
    let mic = SimulatedMicrophone::new(Duration::from_millis(250));

    {
        let stream = mic.acquire(&CaptureConstraints::default()).await?;
        let mut guard = DeviceGuard::new(stream);
        assert!(guard.is_live());
        assert!(guard.next_event().await.is_some());
        assert!(mic.is_capturing());
    }

    assert!(!mic.is_capturing(), "Dropping the guard stops the tracks");

    let stream = mic.acquire(&CaptureConstraints::default()).await?;
    let mut guard = DeviceGuard::new(stream);
    guard.release();
    assert!(!guard.is_live());
    assert!(!mic.is_capturing());

    Ok(())
}

#[test]
fn test_unsupported_simulated_microphone() {
    let mic = SimulatedMicrophone::unsupported();
    assert!(!mic.is_supported());
    assert!(!mic.name().is_empty());
}

fn write_wav(path: &std::path::Path, sample_rate: u32, samples: &[i16]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_wav_microphone_replays_file_in_fragments() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("voice.wav");

    // One second at 8kHz: four 250ms fragments of 2000 samples
    let samples: Vec<i16> = (0..8000).map(|i| (i % 100) as i16 - 50).collect();
    write_wav(&path, 8000, &samples)?;

    let mic = WavFileMicrophone::new(&path, Duration::from_millis(250));
    let constraints = CaptureConstraints {
        sample_rate: 8000,
        ..CaptureConstraints::default()
    };
    let mut stream = mic.acquire(&constraints).await?;
    assert!(mic.is_capturing());

    let mut collected = Vec::new();
    for _ in 0..4 {
        match stream.next_event().await {
            Some(DeviceEvent::Data(bytes)) => {
                assert_eq!(bytes.len(), 2000 * 2);
                collected.extend(bytes);
            }
            other => panic!("Expected a data fragment, got {:?}", other),
        }
    }

    let expected: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    assert_eq!(collected, expected);

    // The file is exhausted but the capture stays open until released
    let silent = time::timeout(Duration::from_secs(2), stream.next_event()).await;
    assert!(silent.is_err());
    assert!(stream.is_live());

    stream.stop_tracks();
    assert!(!mic.is_capturing());

    Ok(())
}

#[tokio::test]
async fn test_wav_microphone_missing_file_is_not_found() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mic = WavFileMicrophone::new(
        temp_dir.path().join("missing.wav"),
        Duration::from_millis(250),
    );

    let err = mic.acquire(&CaptureConstraints::default()).await.err();
    assert_eq!(err, Some(DeviceError::NotFound));
    assert!(!mic.is_capturing());

    Ok(())
}

#[test]
fn test_device_errors_convert_to_capture_errors() {
    assert_eq!(
        CaptureError::from(DeviceError::PermissionDenied),
        CaptureError::PermissionDenied
    );
    assert_eq!(
        CaptureError::from(DeviceError::NotFound),
        CaptureError::DeviceNotFound
    );
    assert_eq!(CaptureError::from(DeviceError::Busy), CaptureError::DeviceBusy);
    assert_eq!(
        CaptureError::from(DeviceError::Other("unplugged".to_string())),
        CaptureError::Acquisition("unplugged".to_string())
    );
}

#[test]
fn test_user_messages() {
    assert_eq!(
        CaptureError::PermissionDenied.user_message(),
        "Microphone permission denied. Please allow microphone access and try again."
    );
    assert_eq!(
        CaptureError::DeviceNotFound.user_message(),
        "No microphone found. Please connect a microphone and try again."
    );
    assert_eq!(
        CaptureError::DeviceBusy.user_message(),
        "Microphone is being used by another application."
    );
    assert_eq!(
        CaptureError::Acquisition("x".to_string()).user_message(),
        "Recording error occurred"
    );
    assert!(CaptureError::Acquisition("unplugged".to_string())
        .to_string()
        .contains("unplugged"));
}
