use anyhow::Result;
use clap::{Parser, Subcommand};
use emotion_practice::progress::{spawn_companion_decay, JsonFileStore, COMPANION_DECAY_INTERVAL};
use emotion_practice::{
    CaptureController, Config, MicrophoneDevice, PipelineEvent, ProgressTracker,
    SimulatedClassifier, SimulatedMicrophone, SystemClock, WavFileMicrophone,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "emotion-practice", about = "Practice recognizing emotions in your voice")]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, default_value = "config/emotion-practice")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record one session and show the detected emotion
    Record {
        /// Stop after this many seconds (otherwise Ctrl-C or the time limit)
        #[arg(long)]
        seconds: Option<u64>,

        /// Replay a WAV file instead of the simulated microphone
        #[arg(long)]
        wav: Option<PathBuf>,

        /// Save the result to today's progress
        #[arg(long)]
        save: bool,
    },
    /// Show today's progress
    Progress,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    let store = Arc::new(JsonFileStore::new(&cfg.progress.store_path));
    let tracker = Arc::new(ProgressTracker::new(store, Arc::new(SystemClock)));

    match cli.command {
        Command::Record { seconds, wav, save } => {
            let decay = spawn_companion_decay(Arc::clone(&tracker), COMPANION_DECAY_INTERVAL);
            let recorded = record(&cfg, Arc::clone(&tracker), seconds, wav, save).await;
            decay.abort();
            recorded?
        }
        Command::Progress => {}
    }

    let progress = tracker.load()?;
    println!("Today's progress:");
    println!("  Emotions identified: {}", progress.emotions_identified);
    println!("  Practice time: {} min", progress.practice_time_minutes);
    println!("  Accuracy: {}%", progress.accuracy_percent);

    let companion = tracker.companion()?;
    println!("Companion: {} ({}% happy)", companion.mood, companion.happiness);

    Ok(())
}

async fn record(
    cfg: &Config,
    tracker: Arc<ProgressTracker>,
    seconds: Option<u64>,
    wav: Option<PathBuf>,
    save: bool,
) -> Result<()> {
    let device: Arc<dyn MicrophoneDevice> = match wav {
        Some(path) => Arc::new(WavFileMicrophone::new(path, cfg.fragment_interval())),
        None => Arc::new(SimulatedMicrophone::new(cfg.fragment_interval())),
    };
    let classifier = Arc::new(SimulatedClassifier::new(cfg.analysis_latency()));

    let controller = CaptureController::new(cfg.session_config(), device, classifier, tracker);
    tokio::spawn(log_events(controller.subscribe()));
    let mut events = controller.subscribe();

    let pending = match controller.request_start().await {
        Ok(pending) => pending,
        Err(e) => {
            warn!("{}", e.user_message());
            return Err(e.into());
        }
    };
    println!("Recording! Speak now...");

    let requested = async {
        match seconds {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    let ended = async {
        loop {
            match events.recv().await {
                Ok(PipelineEvent::Stopped { .. }) | Ok(PipelineEvent::Failed { .. }) => break,
                Err(broadcast::error::RecvError::Closed) => break,
                _ => {}
            }
        }
    };

    tokio::select! {
        _ = requested => {}
        _ = tokio::signal::ctrl_c() => {}
        _ = ended => {}
    }
    // No-op if the time limit already stopped it
    controller.request_stop().await;

    println!("Analyzing emotion...");
    let analysis = match pending.outcome().await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("{}", e.user_message());
            return Err(e.into());
        }
    };

    let label = analysis.result.label;
    println!();
    println!("{}", analysis.result);
    println!("{}", label.description());
    println!(
        "Recorded {:.1}s in {} fragments",
        analysis.duration.as_secs_f64(),
        analysis.fragment_count
    );

    if save {
        controller.save_result(analysis);
        println!("Emotion \"{}\" saved successfully! 🎉", label);
    }

    Ok(())
}

async fn log_events(mut events: broadcast::Receiver<PipelineEvent>) {
    loop {
        match events.recv().await {
            Ok(PipelineEvent::Tick { elapsed_secs, .. }) => {
                info!("Recording... {}s", elapsed_secs)
            }
            Ok(PipelineEvent::Stopped { reason, .. }) => info!("Recording stopped ({:?})", reason),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => warn!("Missed {} events", n),
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
