//! Dispositivo sem atuador háptico

use std::time::Duration;
use haptic_core::prelude::*;

/// Dispositivo para plataformas sem hardware háptico.
///
/// Não anuncia nenhuma capacidade e recusa todo comando com
/// [`DeviceError::Unsupported`]. Parar players é sempre aceito.
#[derive(Debug, Clone)]
pub struct NullDevice {
    name: String,
}

impl NullDevice {
    pub fn new() -> Self {
        Self::named("null")
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn unsupported<T>(&self, what: &str) -> DeviceResult<T> {
        tracing::debug!(device = %self.name, what, "no haptic hardware");
        Err(DeviceError::Unsupported(format!("{} on {}", what, self.name)))
    }
}

impl Default for NullDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HapticComponent for NullDevice {
    fn name(&self) -> &str {
        &self.name
    }
}

impl HapticDevice for NullDevice {
    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
    }

    fn status(&self) -> DeviceStatus {
        DeviceStatus::Ready
    }

    fn selection(&mut self) -> DeviceResult<()> {
        self.unsupported("selection feedback")
    }

    fn impact(&mut self, _style: ImpactStyle) -> DeviceResult<()> {
        self.unsupported("impact feedback")
    }

    fn notification(&mut self, _kind: NotificationType) -> DeviceResult<()> {
        self.unsupported("notification feedback")
    }

    fn play_transient(&mut self, _params: EventParams) -> DeviceResult<()> {
        self.unsupported("custom events")
    }

    fn start_continuous(&mut self, _params: EventParams, _duration: Duration) -> DeviceResult<PlayerId> {
        self.unsupported("custom events")
    }

    fn update_continuous(&mut self, player: PlayerId, _params: EventParams) -> DeviceResult<()> {
        Err(DeviceError::UnknownPlayer(player))
    }

    fn play_pattern(&mut self, _pattern: &HapticPattern) -> DeviceResult<PlayerId> {
        self.unsupported("pattern playback")
    }

    fn stop_player(&mut self, _player: PlayerId) -> DeviceResult<bool> {
        Ok(false)
    }
}
