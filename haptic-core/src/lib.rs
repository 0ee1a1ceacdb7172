//! # 🤚 haptic-core
//!
//! Vocabulário compartilhado da pilha háptica: o trait de capacidade
//! [`HapticDevice`](traits::HapticDevice), os tipos de feedback e o modelo
//! de padrões AHAP.
//!
//! ## Módulos
//!
//! - [`traits`]: `HapticComponent`, `HapticDevice`, `DeviceError`, `DeviceStatus`
//! - [`types`]: `EventParams`, `ImpactStyle`, `NotificationType`, `Capabilities`, `PlayerId`
//! - [`pattern`]: `HapticPattern`: leitura, validação e duração de padrões
//!
//! ## Quick Start
//!
//! ```
//! use haptic_core::prelude::*;
//!
//! let pattern = HapticPattern::new()
//!     .with_transient(0.0, EventParams::medium())
//!     .with_continuous(0.1, 0.5, EventParams::clamped(0.9, 0.3));
//!
//! assert!(pattern.validate().is_ok());
//! assert!((pattern.duration_secs() - 0.6).abs() < 1e-6);
//! ```

pub mod pattern;
pub mod prelude;
pub mod traits;
pub mod types;

pub use pattern::{HapticPattern, PatternError, PatternResult};
pub use traits::{DeviceError, DeviceResult, DeviceStatus, HapticComponent, HapticDevice};
pub use types::{Capabilities, EventParams, ImpactStyle, NotificationType, PlayerId};
