//! # Prelude — Re-exportações Convenientes
//!
//! ```
//! use haptic_core::prelude::*;
//! ```

// Traits fundamentais
pub use crate::traits::{
    DeviceError,
    DeviceResult,
    DeviceStatus,
    HapticComponent,
    HapticDevice,
};

// Tipos
pub use crate::types::{
    Capabilities,
    EventParams,
    ImpactStyle,
    NotificationType,
    PlayerId,
};

// Padrões
pub use crate::pattern::{
    EventType,
    HapticPattern,
    ParameterId,
    PatternEntry,
    PatternError,
    PatternEvent,
    PatternResult,
};
