//! # 🎯 Traits — Abstrações de Dispositivo Háptico
//!
//! O facade não herda de nenhum runtime hospedeiro: recebe um dispositivo
//! que implementa [`HapticDevice`] e delega tudo a ele.
//!
//! | Trait | Papel |
//! |:------|:------|
//! | [`HapticComponent`] | identificação e prontidão |
//! | [`HapticDevice`] | feedback predefinido, eventos customizados, padrões |
//!
//! ## Princípio de Design
//!
//! > *"Trait no core, implementação no módulo."*
//!
//! As implementações concretas vivem em `haptic-device`.

use std::fmt::Debug;
use std::time::Duration;

use crate::pattern::HapticPattern;
use crate::types::{Capabilities, EventParams, ImpactStyle, NotificationType, PlayerId};

// ═══════════════════════════════════════════════════════════════════════════════
// BASE
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait base para todos os componentes hápticos.
pub trait HapticComponent: Send + Sync + Debug {
    /// Nome único do componente (para logs e debug)
    fn name(&self) -> &str;

    /// Versão do componente
    fn version(&self) -> &str {
        "2026.1.16"
    }

    /// Componente está pronto para uso?
    fn is_ready(&self) -> bool {
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DISPOSITIVO
// ═══════════════════════════════════════════════════════════════════════════════

pub type DeviceResult<T> = Result<T, DeviceError>;

/// Erro de dispositivo
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeviceError {
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Out of range: {0}")]
    OutOfRange(String),
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),
    #[error("Engine stopped")]
    EngineStopped,
    #[error("Device fault: {0}")]
    Fault(String),
    #[error("Command failed: {0}")]
    CommandFailed(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Status do motor háptico
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    /// Pronto para receber comandos
    Ready,
    /// Em erro (precisa reset)
    Fault,
    /// Motor parado
    Stopped,
}

/// Trait para dispositivos que produzem feedback háptico.
///
/// Operações de disparo único (`selection`, `impact`, `notification`,
/// `play_transient`) não deixam recursos alocados. Operações temporizadas
/// (`start_continuous`, `play_pattern`) devolvem um [`PlayerId`] que o
/// chamador libera com [`stop_player`](HapticDevice::stop_player).
///
/// # Exemplo
///
/// ```ignore
/// use haptic_core::prelude::*;
///
/// fn tap(device: &mut dyn HapticDevice) -> DeviceResult<()> {
///     if device.capabilities().custom_events {
///         device.play_transient(EventParams::medium())?;
///     }
///     Ok(())
/// }
/// ```
pub trait HapticDevice: HapticComponent {
    /// Capacidades atuais do hardware/SO
    fn capabilities(&self) -> Capabilities;

    /// Status atual do motor
    fn status(&self) -> DeviceStatus;

    fn selection(&mut self) -> DeviceResult<()>;

    fn impact(&mut self, style: ImpactStyle) -> DeviceResult<()>;

    fn notification(&mut self, kind: NotificationType) -> DeviceResult<()>;

    /// Dispara um evento instantâneo
    fn play_transient(&mut self, params: EventParams) -> DeviceResult<()>;

    /// Inicia um evento contínuo com duração fixa
    fn start_continuous(&mut self, params: EventParams, duration: Duration) -> DeviceResult<PlayerId>;

    /// Altera os parâmetros de um evento contínuo em andamento
    fn update_continuous(&mut self, player: PlayerId, params: EventParams) -> DeviceResult<()>;

    /// Reproduz um padrão declarativo
    fn play_pattern(&mut self, pattern: &HapticPattern) -> DeviceResult<PlayerId>;

    /// Para e libera um player.
    ///
    /// Retorna `false` quando o player é desconhecido ou já tinha sido
    /// liberado (expirou, motor parado pelo sistema).
    fn stop_player(&mut self, player: PlayerId) -> DeviceResult<bool>;

    /// Para e libera todos os players
    fn stop_all(&mut self) -> DeviceResult<()> {
        Ok(())
    }

    /// Reinicia o motor após falha
    fn reset(&mut self) -> DeviceResult<()> {
        Ok(())
    }
}

impl<D: HapticComponent + ?Sized> HapticComponent for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn version(&self) -> &str {
        (**self).version()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

impl<D: HapticDevice + ?Sized> HapticDevice for Box<D> {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn status(&self) -> DeviceStatus {
        (**self).status()
    }

    fn selection(&mut self) -> DeviceResult<()> {
        (**self).selection()
    }

    fn impact(&mut self, style: ImpactStyle) -> DeviceResult<()> {
        (**self).impact(style)
    }

    fn notification(&mut self, kind: NotificationType) -> DeviceResult<()> {
        (**self).notification(kind)
    }

    fn play_transient(&mut self, params: EventParams) -> DeviceResult<()> {
        (**self).play_transient(params)
    }

    fn start_continuous(&mut self, params: EventParams, duration: Duration) -> DeviceResult<PlayerId> {
        (**self).start_continuous(params, duration)
    }

    fn update_continuous(&mut self, player: PlayerId, params: EventParams) -> DeviceResult<()> {
        (**self).update_continuous(player, params)
    }

    fn play_pattern(&mut self, pattern: &HapticPattern) -> DeviceResult<PlayerId> {
        (**self).play_pattern(pattern)
    }

    fn stop_player(&mut self, player: PlayerId) -> DeviceResult<bool> {
        (**self).stop_player(player)
    }

    fn stop_all(&mut self) -> DeviceResult<()> {
        (**self).stop_all()
    }

    fn reset(&mut self) -> DeviceResult<()> {
        (**self).reset()
    }
}
