//! Tipos de feedback háptico

use serde::{Deserialize, Serialize};
use crate::traits::{DeviceError, DeviceResult};

/// Parâmetros de um evento háptico customizado
///
/// Ambos os valores são normalizados em `[0.0, 1.0]`:
/// - `intensity`: força do evento
/// - `sharpness`: caráter do evento (suave → nítido)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventParams {
    pub intensity: f32,
    pub sharpness: f32,
}

impl EventParams {
    /// Cria parâmetros validados (rejeita valores fora de `[0, 1]` ou não finitos)
    pub fn new(intensity: f32, sharpness: f32) -> DeviceResult<Self> {
        Self::check("intensity", intensity)?;
        Self::check("sharpness", sharpness)?;
        Ok(Self { intensity, sharpness })
    }

    /// Cria parâmetros saturados em `[0, 1]` (NaN vira 0)
    pub fn clamped(intensity: f32, sharpness: f32) -> Self {
        Self {
            intensity: Self::clamp_unit(intensity),
            sharpness: Self::clamp_unit(sharpness),
        }
    }

    /// Parâmetros médios (0.5, 0.5)
    pub fn medium() -> Self {
        Self { intensity: 0.5, sharpness: 0.5 }
    }

    /// Valida se os parâmetros estão no range válido
    pub fn validate(&self) -> DeviceResult<()> {
        Self::check("intensity", self.intensity)?;
        Self::check("sharpness", self.sharpness)
    }

    fn check(name: &str, value: f32) -> DeviceResult<()> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(DeviceError::OutOfRange(format!(
                "{} must be within 0.0-1.0, got {}",
                name, value
            )));
        }
        Ok(())
    }

    fn clamp_unit(value: f32) -> f32 {
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        }
    }
}

impl Default for EventParams {
    fn default() -> Self {
        Self::medium()
    }
}

/// Estilo de impacto predefinido
///
/// Os códigos inteiros seguem a ordem do gerador de impacto do sistema
/// (0 = light ... 4 = rigid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
    Soft,
    Rigid,
}

impl ImpactStyle {
    pub const ALL: [ImpactStyle; 5] = [
        ImpactStyle::Light,
        ImpactStyle::Medium,
        ImpactStyle::Heavy,
        ImpactStyle::Soft,
        ImpactStyle::Rigid,
    ];

    /// Código inteiro do estilo
    pub fn code(&self) -> i32 {
        match self {
            ImpactStyle::Light => 0,
            ImpactStyle::Medium => 1,
            ImpactStyle::Heavy => 2,
            ImpactStyle::Soft => 3,
            ImpactStyle::Rigid => 4,
        }
    }

    /// Intensidade nominal usada por dispositivos que emulam impactos
    pub fn nominal_intensity(&self) -> f32 {
        match self {
            ImpactStyle::Light => 0.4,
            ImpactStyle::Medium => 0.7,
            ImpactStyle::Heavy => 1.0,
            ImpactStyle::Soft => 0.5,
            ImpactStyle::Rigid => 0.8,
        }
    }
}

impl TryFrom<i32> for ImpactStyle {
    type Error = DeviceError;

    fn try_from(code: i32) -> Result<Self, DeviceError> {
        Self::ALL
            .into_iter()
            .find(|style| style.code() == code)
            .ok_or_else(|| DeviceError::OutOfRange(format!("Unknown impact style: {}", code)))
    }
}

/// Tipo de notificação predefinida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub const ALL: [NotificationType; 3] = [
        NotificationType::Success,
        NotificationType::Warning,
        NotificationType::Error,
    ];

    /// Código inteiro do tipo
    pub fn code(&self) -> i32 {
        match self {
            NotificationType::Success => 0,
            NotificationType::Warning => 1,
            NotificationType::Error => 2,
        }
    }
}

impl TryFrom<i32> for NotificationType {
    type Error = DeviceError;

    fn try_from(code: i32) -> Result<Self, DeviceError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or_else(|| DeviceError::OutOfRange(format!("Unknown notification type: {}", code)))
    }
}

/// Capacidades reportadas por um dispositivo háptico
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Feedback predefinido (selection / impact / notification)
    pub predefined_feedback: bool,
    /// Eventos customizados (transient / continuous)
    pub custom_events: bool,
    /// Reprodução de padrões declarativos (JSON / AHAP)
    pub pattern_files: bool,
    /// Eventos de áudio dentro de padrões
    pub audio_events: bool,
}

impl Capabilities {
    /// Nenhuma capacidade (dispositivo sem atuador)
    pub fn none() -> Self {
        Self {
            predefined_feedback: false,
            custom_events: false,
            pattern_files: false,
            audio_events: false,
        }
    }

    /// Todas as capacidades
    pub fn full() -> Self {
        Self {
            predefined_feedback: true,
            custom_events: true,
            pattern_files: true,
            audio_events: true,
        }
    }

    /// Apenas feedback predefinido (hardware antigo, sem motor customizável)
    pub fn predefined_only() -> Self {
        Self {
            predefined_feedback: true,
            ..Self::none()
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}

/// Identificador opaco de um player mantido pelo dispositivo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player#{}", self.0)
    }
}
