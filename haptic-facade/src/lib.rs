//! # 📳 haptic-facade — Feedback háptico com verificação de capacidade
//!
//! O [`Haptic`] recebe um [`HapticDevice`](haptic_core::HapticDevice) por
//! injeção e expõe uma superfície única para o aplicativo:
//!
//! | Operação | Efeito |
//! |:---------|:-------|
//! | `is_supported()` | dispositivo toca eventos customizados? |
//! | `selection()` / `impact()` / `notification()` | feedback predefinido |
//! | `play_transient(i, s)` | evento instantâneo |
//! | `play_continuous(i, s, secs)` | evento sustentado |
//! | `update_continuous(i, s)` | altera o evento sustentado em andamento |
//! | `stop()` / `stop_pattern_player()` | para a reprodução (idempotente) |
//! | `play_pattern_json()` / `play_ahap_file()` / `play_ahap_url()` | padrões AHAP |
//!
//! ## Semântica
//!
//! - **Sem suporte**: a chamada não chega ao dispositivo e devolve
//!   `Playback::Skipped(SkipReason::Unsupported)`.
//! - **Falha**: erros do dispositivo viram `HapticError::Device`.
//! - **Um player por facade**: iniciar um evento contínuo ou padrão
//!   substitui o anterior.
//! - **Políticas**: [`ParameterPolicy`] (clamp/reject) e [`StatePolicy`]
//!   (ignore/error) decidem o que fazer com valores fora do range e com
//!   `update_continuous` sem evento ativo.
//!
//! ## Exemplo
//!
//! ```ignore
//! use haptic_facade::{Haptic, Playback};
//! use haptic_device::SimulatedDevice;
//!
//! let mut haptic = Haptic::new(SimulatedDevice::new());
//! if haptic.is_supported() {
//!     haptic.play_continuous(0.8, 0.3, 1.5)?;
//!     haptic.update_continuous(1.0, 0.6)?;
//!     haptic.stop()?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod haptic;
pub mod state;

pub use config::{FacadeConfig, ParameterPolicy, StatePolicy};
pub use error::{HapticError, HapticResult};
pub use haptic::Haptic;
pub use state::{HapticStats, Playback, PlaybackPhase, PlaybackState, SkipReason};

// Re-export core types
pub use haptic_core::prelude::*;

#[cfg(test)]
mod tests;
