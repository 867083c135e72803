pub mod analysis;
pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod progress;
pub mod session;

pub use analysis::{EmotionClassifier, EmotionLabel, EmotionResult, SimulatedClassifier};
pub use audio::{
    AudioArtifact, CaptureConstraints, ChunkCollector, MicrophoneDevice, SimulatedMicrophone,
    WavFileMicrophone,
};
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::{CaptureError, CaptureResult};
pub use progress::{DailyProgress, ProgressNotifier, ProgressTracker};
pub use session::{
    Analysis, CaptureController, PendingAnalysis, PipelineEvent, RecordingSession, SessionConfig,
    SessionState, SessionStats,
};
