use thiserror::Error;

/// Failures surfaced by the monitor outside the per-frame numeric path.
///
/// Too little data for a BPM estimate and a flat signal are ordinary frame
/// states and are never reported through this type.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("Illumination not supported on this device")]
    IlluminationUnsupported,
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config serialization error: {0}")]
    Config(#[from] serde_json::Error),
}
