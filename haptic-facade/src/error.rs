//! Erros do facade háptico

use thiserror::Error;
use haptic_core::{DeviceError, PatternError};

pub type HapticResult<T> = Result<T, HapticError>;

#[derive(Debug, Error)]
pub enum HapticError {
    /// O dispositivo recusou ou falhou ao executar o comando
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operação fora do estado válido (somente com `StatePolicy::Error`)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
