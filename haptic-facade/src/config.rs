//! Configuração do facade
//!
//! Valores lidos do `.env` ou de variáveis de ambiente:
//!
//! - `HAPTIC_PARAMETER_POLICY`: `clamp` | `reject` (default: clamp)
//! - `HAPTIC_STATE_POLICY`: `ignore` | `error` (default: ignore)
//! - `HAPTIC_MAX_CONTINUOUS_SECS`: duração máxima de um evento contínuo (default: 30.0)
//! - `HAPTIC_PATTERN_DIR`: diretório dos arquivos `.ahap` (default: `.`)
//!
//! Valores inválidos caem no default.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{HapticError, HapticResult};

pub const ENV_PARAMETER_POLICY: &str = "HAPTIC_PARAMETER_POLICY";
pub const ENV_STATE_POLICY: &str = "HAPTIC_STATE_POLICY";
pub const ENV_MAX_CONTINUOUS_SECS: &str = "HAPTIC_MAX_CONTINUOUS_SECS";
pub const ENV_PATTERN_DIR: &str = "HAPTIC_PATTERN_DIR";

/// Limite de duração de um evento contínuo (s)
pub const DEFAULT_MAX_CONTINUOUS_SECS: f32 = 30.0;

// Carrega o .env na primeira leitura
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

/// Tratamento de intensidade/nitidez/duração fora do range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterPolicy {
    /// Satura no range válido
    #[default]
    Clamp,
    /// Retorna `HapticError::InvalidParameter`
    Reject,
}

impl FromStr for ParameterPolicy {
    type Err = HapticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(ParameterPolicy::Clamp),
            "reject" => Ok(ParameterPolicy::Reject),
            other => Err(HapticError::InvalidConfig(format!(
                "unknown parameter policy: {}",
                other
            ))),
        }
    }
}

/// Tratamento de `update_continuous` sem evento contínuo ativo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatePolicy {
    /// Não faz nada e reporta `Skipped(NotPlaying)`
    #[default]
    Ignore,
    /// Retorna `HapticError::InvalidState`
    Error,
}

impl FromStr for StatePolicy {
    type Err = HapticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(StatePolicy::Ignore),
            "error" => Ok(StatePolicy::Error),
            other => Err(HapticError::InvalidConfig(format!(
                "unknown state policy: {}",
                other
            ))),
        }
    }
}

/// Configuração do facade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacadeConfig {
    pub parameter_policy: ParameterPolicy,
    pub state_policy: StatePolicy,
    /// Duração máxima de um evento contínuo (s)
    pub max_continuous_secs: f32,
    /// Diretório onde `play_ahap_file` procura os padrões
    pub pattern_dir: PathBuf,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            parameter_policy: ParameterPolicy::Clamp,
            state_policy: StatePolicy::Ignore,
            max_continuous_secs: DEFAULT_MAX_CONTINUOUS_SECS,
            pattern_dir: PathBuf::from("."),
        }
    }
}

impl FacadeConfig {
    /// Configuração a partir do ambiente
    pub fn from_env() -> Self {
        Self {
            parameter_policy: parameter_policy(),
            state_policy: state_policy(),
            max_continuous_secs: max_continuous_secs(),
            pattern_dir: pattern_dir(),
        }
    }

    /// Rejeita parâmetros inválidos e chamadas fora de estado
    pub fn strict() -> Self {
        Self {
            parameter_policy: ParameterPolicy::Reject,
            state_policy: StatePolicy::Error,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> HapticResult<()> {
        if !self.max_continuous_secs.is_finite() || self.max_continuous_secs <= 0.0 {
            return Err(HapticError::InvalidConfig(
                "max_continuous_secs must be positive".into(),
            ));
        }
        if Duration::try_from_secs_f32(self.max_continuous_secs).is_err() {
            return Err(HapticError::InvalidConfig(format!(
                "max_continuous_secs {} does not fit in a Duration",
                self.max_continuous_secs
            )));
        }
        Ok(())
    }

    pub fn max_continuous(&self) -> Duration {
        Duration::try_from_secs_f32(self.max_continuous_secs).unwrap_or(Duration::ZERO)
    }
}

/// Load parameter policy from environment
/// Default: clamp
pub fn parameter_policy() -> ParameterPolicy {
    ensure_loaded();
    env::var(ENV_PARAMETER_POLICY)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Load state policy from environment
/// Default: ignore
pub fn state_policy() -> StatePolicy {
    ensure_loaded();
    env::var(ENV_STATE_POLICY)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Load continuous duration limit from environment
/// Default: 30.0 s
pub fn max_continuous_secs() -> f32 {
    ensure_loaded();
    env::var(ENV_MAX_CONTINUOUS_SECS)
        .ok()
        .and_then(|v| v.parse::<f32>().ok())
        .filter(|v| *v > 0.0 && Duration::try_from_secs_f32(*v).is_ok())
        .unwrap_or(DEFAULT_MAX_CONTINUOUS_SECS)
}

/// Load AHAP directory from environment
/// Default: .
pub fn pattern_dir() -> PathBuf {
    ensure_loaded();
    env::var_os(ENV_PATTERN_DIR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("clamp".parse::<ParameterPolicy>().unwrap(), ParameterPolicy::Clamp);
        assert_eq!(" REJECT ".parse::<ParameterPolicy>().unwrap(), ParameterPolicy::Reject);
        assert!("loose".parse::<ParameterPolicy>().is_err());

        assert_eq!("ignore".parse::<StatePolicy>().unwrap(), StatePolicy::Ignore);
        assert_eq!("Error".parse::<StatePolicy>().unwrap(), StatePolicy::Error);
        assert!("panic".parse::<StatePolicy>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = FacadeConfig::default();
        assert_eq!(config.parameter_policy, ParameterPolicy::Clamp);
        assert_eq!(config.state_policy, StatePolicy::Ignore);
        assert_eq!(config.max_continuous(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = FacadeConfig::strict();
        assert_eq!(config.parameter_policy, ParameterPolicy::Reject);
        assert_eq!(config.state_policy, StatePolicy::Error);
    }

    #[test]
    fn test_invalid_config() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = FacadeConfig {
                max_continuous_secs: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn test_config_serde() {
        let json = serde_json::to_string(&FacadeConfig::strict()).unwrap();
        assert!(json.contains("\"Reject\""));
        let back: FacadeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FacadeConfig::strict());
    }
}
