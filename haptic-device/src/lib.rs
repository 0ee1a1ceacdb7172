//! # 📳 haptic-device — Implementações de `HapticDevice`
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Haptic facade                  │
//! └─────────────────────────────────────────┘
//!                   ↓
//! ┌─────────────────────────────────────────┐
//! │     HapticDevice trait (haptic-core)    │
//! │  capabilities(), play_*(), stop_*()     │
//! └─────────────────────────────────────────┘
//!          ↓                       ↓
//!  ┌────────────────┐     ┌────────────────┐
//!  │SimulatedDevice │     │   NullDevice   │
//!  │ (mock motor)   │     │ (sem hardware) │
//!  └────────────────┘     └────────────────┘
//! ```
//!
//! ## Componentes
//!
//! ### SimulatedDevice
//!
//! Motor háptico em memória com:
//! - Players com duração real (expiram sozinhos)
//! - Log limitado de todo feedback emitido
//! - Contadores de comandos e de players liberados
//! - Injeção de falha e parada do motor, recuperáveis com `reset`
//!
//! ### NullDevice
//!
//! Plataforma sem atuador: nenhuma capacidade, todo comando é `Unsupported`.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::time::Duration;
//! use haptic_core::prelude::*;
//! use haptic_device::SimulatedDevice;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut device = SimulatedDevice::new();
//! let player = device.start_continuous(EventParams::medium(), Duration::from_secs(1))?;
//! assert_eq!(device.active_players(), 1);
//!
//! device.stop_player(player)?;
//! assert_eq!(device.active_players(), 0);
//! # Ok(())
//! # }
//! ```

pub mod null;
pub mod simulated;

pub use null::NullDevice;
pub use simulated::{Feedback, FeedbackRecord, PlayerKind, SimulatedConfig, SimulatedDevice};
