use crate::config::ConfigError;

/// Terminal outcome of a failed generation.
///
/// Per-attempt contradictions never surface on their own; the retry loop
/// reports at most one of these.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("solver hit a contradiction on all {attempts} attempts")]
    Contradiction { attempts: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
