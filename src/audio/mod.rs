pub mod backend;
pub mod chunk;
pub mod file;
pub mod simulated;

pub use backend::{
    CaptureConstraints, CaptureStream, ChannelStream, DeviceError, DeviceEvent, DeviceGuard,
    MicrophoneDevice,
};
pub use chunk::{AudioArtifact, ChunkCollector};
pub use file::WavFileMicrophone;
pub use simulated::{AccessOutcome, SimulatedMicrophone};
