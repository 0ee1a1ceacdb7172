//! Facade háptico

use std::mem;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use haptic_core::pattern::AHAP_EXTENSION;
use haptic_core::prelude::*;

use crate::config::{FacadeConfig, ParameterPolicy, StatePolicy};
use crate::error::{HapticError, HapticResult};
use crate::state::{HapticStats, Playback, PlaybackPhase, PlaybackState, SkipReason};

/// Ponto de entrada único para feedback háptico.
///
/// Toda operação consulta as [`Capabilities`] do dispositivo antes de
/// agir: sem suporte, a chamada não toca o dispositivo e devolve
/// `Playback::Skipped(SkipReason::Unsupported)`. Falhas do dispositivo
/// chegam como `HapticError::Device`.
///
/// O facade mantém no máximo um player (contínuo ou padrão). Iniciar outro
/// substitui o anterior; `stop`, `reset_engine` e o `Drop` o liberam.
#[derive(Debug)]
pub struct Haptic<D: HapticDevice> {
    device: D,
    config: FacadeConfig,
    state: PlaybackState,
    stats: HapticStats,
}

impl<D: HapticDevice> Haptic<D> {
    /// Cria facade com configuração padrão
    pub fn new(device: D) -> Self {
        Self {
            device,
            config: FacadeConfig::default(),
            state: PlaybackState::Idle,
            stats: HapticStats::default(),
        }
    }

    /// Cria com configuração específica
    pub fn with_config(device: D, config: FacadeConfig) -> HapticResult<Self> {
        config.validate()?;
        Ok(Self {
            device,
            config,
            state: PlaybackState::Idle,
            stats: HapticStats::default(),
        })
    }

    /// Cria com a configuração do ambiente (`HAPTIC_*`)
    pub fn from_env(device: D) -> HapticResult<Self> {
        Self::with_config(device, FacadeConfig::from_env())
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    pub fn stats(&self) -> &HapticStats {
        &self.stats
    }

    pub fn capabilities(&self) -> Capabilities {
        self.device.capabilities()
    }

    /// O dispositivo toca eventos customizados?
    ///
    /// Lido do dispositivo a cada chamada; sem efeitos colaterais.
    pub fn is_supported(&self) -> bool {
        self.device.capabilities().custom_events
    }

    /// Fase atual (eventos que já passaram da duração contam como `Idle`)
    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase_at(Instant::now())
    }

    /// Estado interno, sem aplicar expiração
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Player ativo, se houver
    pub fn active_player(&self) -> Option<PlayerId> {
        match self.phase() {
            PlaybackPhase::Idle => None,
            _ => self.state.player(),
        }
    }

    /// Tempo restante do evento ativo
    pub fn remaining(&self) -> Option<Duration> {
        self.state.remaining_at(Instant::now())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // FEEDBACK PREDEFINIDO
    // ═══════════════════════════════════════════════════════════════════════

    pub fn selection(&mut self) -> HapticResult<Playback> {
        self.refresh();
        if !self.device.capabilities().predefined_feedback {
            return Ok(self.skip("selection", SkipReason::Unsupported));
        }
        if let Err(err) = self.device.selection() {
            return Err(self.failure("selection", err));
        }
        self.stats.predefined += 1;
        Ok(Playback::Played)
    }

    pub fn impact(&mut self, style: ImpactStyle) -> HapticResult<Playback> {
        self.refresh();
        if !self.device.capabilities().predefined_feedback {
            return Ok(self.skip("impact", SkipReason::Unsupported));
        }
        if let Err(err) = self.device.impact(style) {
            return Err(self.failure("impact", err));
        }
        self.stats.predefined += 1;
        Ok(Playback::Played)
    }

    pub fn notification(&mut self, kind: NotificationType) -> HapticResult<Playback> {
        self.refresh();
        if !self.device.capabilities().predefined_feedback {
            return Ok(self.skip("notification", SkipReason::Unsupported));
        }
        if let Err(err) = self.device.notification(kind) {
            return Err(self.failure("notification", err));
        }
        self.stats.predefined += 1;
        Ok(Playback::Played)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // EVENTOS CUSTOMIZADOS
    // ═══════════════════════════════════════════════════════════════════════

    /// Dispara um evento instantâneo. Não altera a fase.
    pub fn play_transient(&mut self, intensity: f32, sharpness: f32) -> HapticResult<Playback> {
        self.refresh();
        if !self.is_supported() {
            return Ok(self.skip("play_transient", SkipReason::Unsupported));
        }

        let params = self.params(intensity, sharpness)?;
        if let Err(err) = self.device.play_transient(params) {
            return Err(self.failure("play_transient", err));
        }

        self.stats.transients += 1;
        tracing::debug!(?params, "transient haptic fired");
        Ok(Playback::Played)
    }

    /// Inicia um evento contínuo de `duration_secs` segundos, substituindo
    /// o que estiver tocando.
    pub fn play_continuous(
        &mut self,
        intensity: f32,
        sharpness: f32,
        duration_secs: f32,
    ) -> HapticResult<Playback> {
        self.refresh();
        if !self.is_supported() {
            return Ok(self.skip("play_continuous", SkipReason::Unsupported));
        }

        let params = self.params(intensity, sharpness)?;
        let duration = self.continuous_duration(duration_secs)?;
        self.release_active()?;

        let player = match self.device.start_continuous(params, duration) {
            Ok(player) => player,
            Err(err) => return Err(self.failure("play_continuous", err)),
        };

        self.state = PlaybackState::Continuous {
            player,
            params,
            started: Instant::now(),
            duration,
        };
        self.stats.continuous_started += 1;
        tracing::info!(%player, ?params, ?duration, "continuous haptic started");
        Ok(Playback::Played)
    }

    /// Altera intensidade/nitidez do evento contínuo em andamento.
    ///
    /// Sem evento contínuo ativo, segue a [`StatePolicy`].
    pub fn update_continuous(&mut self, intensity: f32, sharpness: f32) -> HapticResult<Playback> {
        self.refresh();

        let player = match self.state {
            PlaybackState::Continuous { player, .. } => player,
            _ => return self.not_playing("update_continuous"),
        };

        let params = self.params(intensity, sharpness)?;
        match self.device.update_continuous(player, params) {
            Ok(()) => {}
            Err(DeviceError::UnknownPlayer(_)) => {
                // O dispositivo já encerrou o player
                self.state = PlaybackState::Idle;
                return self.not_playing("update_continuous");
            }
            Err(err) => return Err(self.failure("update_continuous", err)),
        }

        if let PlaybackState::Continuous { params: current, .. } = &mut self.state {
            *current = params;
        }
        self.stats.continuous_updated += 1;
        tracing::debug!(%player, ?params, "continuous haptic updated");
        Ok(Playback::Played)
    }

    /// Para qualquer reprodução. Idempotente.
    pub fn stop(&mut self) -> HapticResult<Playback> {
        self.refresh();
        if self.release_active()? {
            Ok(Playback::Played)
        } else {
            Ok(Playback::Skipped(SkipReason::NotPlaying))
        }
    }

    /// Para apenas a reprodução de padrão. Idempotente.
    pub fn stop_pattern_player(&mut self) -> HapticResult<Playback> {
        self.refresh();
        if matches!(self.state, PlaybackState::Pattern { .. }) && self.release_active()? {
            Ok(Playback::Played)
        } else {
            Ok(Playback::Skipped(SkipReason::NotPlaying))
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // PADRÕES
    // ═══════════════════════════════════════════════════════════════════════

    /// Reproduz um padrão já carregado, substituindo o que estiver tocando
    pub fn play_pattern(&mut self, pattern: &HapticPattern) -> HapticResult<Playback> {
        self.refresh();
        if !self.supports_patterns() {
            return Ok(self.skip("play_pattern", SkipReason::Unsupported));
        }

        pattern.validate()?;
        self.release_active()?;

        let player = match self.device.play_pattern(pattern) {
            Ok(player) => player,
            Err(err) => return Err(self.failure("play_pattern", err)),
        };

        let duration = pattern.duration();
        self.state = PlaybackState::Pattern {
            player,
            started: Instant::now(),
            duration,
        };
        self.stats.patterns_started += 1;
        tracing::info!(%player, ?duration, events = pattern.pattern.len(), "haptic pattern started");
        Ok(Playback::Played)
    }

    /// Reproduz um padrão descrito como dicionário JSON (formato AHAP)
    pub fn play_pattern_json(&mut self, json: &str) -> HapticResult<Playback> {
        if !self.supports_patterns() {
            return Ok(self.skip("play_pattern_json", SkipReason::Unsupported));
        }
        let pattern = HapticPattern::from_json_str(json)?;
        self.play_pattern(&pattern)
    }

    /// Reproduz um arquivo `.ahap` do diretório de padrões
    pub fn play_ahap_file(&mut self, name: &str) -> HapticResult<Playback> {
        if !self.supports_patterns() {
            return Ok(self.skip("play_ahap_file", SkipReason::Unsupported));
        }
        let path = self.resolve_ahap_path(name);
        let pattern = HapticPattern::from_file(&path)?;
        self.play_pattern(&pattern)
    }

    /// Reproduz o arquivo `.ahap` apontado por uma URL `file://`
    pub fn play_ahap_url(&mut self, url: &str) -> HapticResult<Playback> {
        if !self.supports_patterns() {
            return Ok(self.skip("play_ahap_url", SkipReason::Unsupported));
        }
        let pattern = HapticPattern::from_url_str(url)?;
        self.play_pattern(&pattern)
    }

    /// Caminho de um padrão no diretório configurado (`.ahap` se sem extensão)
    pub fn resolve_ahap_path(&self, name: &str) -> PathBuf {
        let mut path = self.config.pattern_dir.join(name);
        if path.extension().is_none() {
            path.set_extension(AHAP_EXTENSION);
        }
        path
    }

    // ═══════════════════════════════════════════════════════════════════════
    // MOTOR
    // ═══════════════════════════════════════════════════════════════════════

    /// Reinicia o dispositivo (ex.: após falha) e volta para `Idle`
    pub fn reset_engine(&mut self) -> HapticResult<()> {
        self.state = PlaybackState::Idle;
        self.device.reset()?;
        tracing::info!(device = %self.device.name(), "haptic engine reset");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INTERNOS
    // ═══════════════════════════════════════════════════════════════════════

    fn supports_patterns(&self) -> bool {
        let caps = self.device.capabilities();
        caps.custom_events && caps.pattern_files
    }

    fn params(&self, intensity: f32, sharpness: f32) -> HapticResult<EventParams> {
        match self.config.parameter_policy {
            ParameterPolicy::Clamp => Ok(EventParams::clamped(intensity, sharpness)),
            ParameterPolicy::Reject => EventParams::new(intensity, sharpness)
                .map_err(|e| HapticError::InvalidParameter(e.to_string())),
        }
    }

    fn continuous_duration(&self, secs: f32) -> HapticResult<Duration> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(HapticError::InvalidParameter(format!(
                "continuous duration must be positive, got {}",
                secs
            )));
        }

        let max = self.config.max_continuous_secs;
        let secs = if secs > max {
            match self.config.parameter_policy {
                ParameterPolicy::Clamp => max,
                ParameterPolicy::Reject => {
                    return Err(HapticError::InvalidParameter(format!(
                        "continuous duration {}s exceeds {}s",
                        secs, max
                    )));
                }
            }
        } else {
            secs
        };

        Duration::try_from_secs_f32(secs).map_err(|e| {
            HapticError::InvalidParameter(format!("continuous duration {}s: {}", secs, e))
        })
    }

    /// Libera o player de um evento que já terminou
    fn refresh(&mut self) {
        if !self.state.is_expired(Instant::now()) {
            return;
        }
        if let Some(player) = mem::replace(&mut self.state, PlaybackState::Idle).player() {
            if let Err(err) = self.device.stop_player(player) {
                tracing::warn!(%player, error = %err, "failed to release expired player");
            }
            self.stats.expired += 1;
            tracing::debug!(%player, "haptic playback finished");
        }
    }

    /// Libera o player ativo. Retorna `true` se o dispositivo ainda o tocava.
    ///
    /// Se o dispositivo falhar, o estado é mantido para que `stop` ou o
    /// `Drop` tentem de novo.
    fn release_active(&mut self) -> HapticResult<bool> {
        let Some(player) = self.state.player() else {
            return Ok(false);
        };
        let held = match self.device.stop_player(player) {
            Ok(held) => held,
            Err(err) => return Err(self.failure("stop", err)),
        };

        self.state = PlaybackState::Idle;
        if held {
            self.stats.stopped += 1;
            tracing::info!(%player, "haptic playback stopped");
        } else {
            tracing::debug!(%player, "player already released by the device");
        }
        Ok(held)
    }

    fn skip(&mut self, op: &str, reason: SkipReason) -> Playback {
        self.stats.skipped += 1;
        tracing::debug!(op, ?reason, device = %self.device.name(), "haptic call skipped");
        Playback::Skipped(reason)
    }

    fn not_playing(&mut self, op: &str) -> HapticResult<Playback> {
        match self.config.state_policy {
            StatePolicy::Ignore => Ok(self.skip(op, SkipReason::NotPlaying)),
            StatePolicy::Error => Err(HapticError::InvalidState(format!(
                "{} requires an active continuous haptic",
                op
            ))),
        }
    }

    fn failure(&mut self, op: &str, err: DeviceError) -> HapticError {
        self.stats.failures += 1;
        tracing::warn!(op, error = %err, device = %self.device.name(), "haptic device failure");
        HapticError::Device(err)
    }
}

impl<D: HapticDevice> HapticComponent for Haptic<D> {
    fn name(&self) -> &str {
        self.device.name()
    }

    fn is_ready(&self) -> bool {
        self.device.is_ready()
    }
}

impl<D: HapticDevice> Drop for Haptic<D> {
    fn drop(&mut self) {
        if let Some(player) = self.state.player() {
            if let Err(err) = self.device.stop_player(player) {
                tracing::warn!(%player, error = %err, "failed to release player on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haptic_device::{Feedback, NullDevice, SimulatedDevice};

    fn facade() -> (Haptic<SimulatedDevice>, SimulatedDevice) {
        let probe = SimulatedDevice::new();
        (Haptic::new(probe.clone()), probe)
    }

    #[test]
    fn test_is_supported_stable() {
        let (haptic, _) = facade();
        let first = haptic.is_supported();
        for _ in 0..10 {
            assert_eq!(haptic.is_supported(), first);
        }
        assert!(first);

        let haptic = Haptic::new(NullDevice::new());
        assert!(!haptic.is_supported());
    }

    #[test]
    fn test_stop_when_idle() {
        let (mut haptic, probe) = facade();
        assert_eq!(haptic.stop().unwrap(), Playback::Skipped(SkipReason::NotPlaying));
        assert_eq!(haptic.phase(), PlaybackPhase::Idle);
        assert_eq!(probe.command_count(), 0);
    }

    #[test]
    fn test_transient_stays_idle() {
        let (mut haptic, probe) = facade();
        assert_eq!(haptic.play_transient(0.5, 0.5).unwrap(), Playback::Played);
        assert_eq!(haptic.phase(), PlaybackPhase::Idle);
        assert_eq!(probe.active_players(), 0);
        assert_eq!(haptic.stats().transients, 1);
    }

    #[test]
    fn test_continuous_then_stop_releases() {
        let (mut haptic, probe) = facade();
        haptic.play_continuous(0.5, 0.5, 1.0).unwrap();
        assert_eq!(haptic.phase(), PlaybackPhase::Continuous);
        assert_eq!(probe.active_players(), 1);

        assert_eq!(haptic.stop().unwrap(), Playback::Played);
        assert_eq!(haptic.phase(), PlaybackPhase::Idle);
        assert_eq!(probe.active_players(), 0);
    }

    #[test]
    fn test_update_without_continuous() {
        let (mut haptic, _) = facade();
        assert_eq!(
            haptic.update_continuous(0.5, 0.5).unwrap(),
            Playback::Skipped(SkipReason::NotPlaying)
        );
    }

    #[test]
    fn test_update_without_continuous_strict() {
        let probe = SimulatedDevice::new();
        let mut haptic = Haptic::with_config(probe, FacadeConfig::strict()).unwrap();
        assert!(matches!(
            haptic.update_continuous(0.5, 0.5),
            Err(HapticError::InvalidState(_))
        ));
    }

    #[test]
    fn test_update_continuous() {
        let (mut haptic, probe) = facade();
        haptic.play_continuous(0.2, 0.2, 5.0).unwrap();
        assert_eq!(haptic.update_continuous(0.9, 0.1).unwrap(), Playback::Played);

        let player = haptic.active_player().unwrap();
        assert_eq!(probe.player_params(player), Some(EventParams::clamped(0.9, 0.1)));
        assert_eq!(haptic.stats().continuous_updated, 1);
    }

    #[test]
    fn test_clamp_policy() {
        let (mut haptic, probe) = facade();
        haptic.play_transient(3.0, -1.0).unwrap();
        assert_eq!(
            probe.last_feedback(),
            Some(Feedback::Transient(EventParams { intensity: 1.0, sharpness: 0.0 }))
        );
    }

    #[test]
    fn test_reject_policy() {
        let probe = SimulatedDevice::new();
        let mut haptic = Haptic::with_config(probe.clone(), FacadeConfig::strict()).unwrap();
        assert!(matches!(
            haptic.play_transient(3.0, 0.5),
            Err(HapticError::InvalidParameter(_))
        ));
        assert_eq!(probe.command_count(), 0);
    }

    #[test]
    fn test_duration_limits() {
        let (mut haptic, probe) = facade();
        assert!(matches!(
            haptic.play_continuous(0.5, 0.5, 0.0),
            Err(HapticError::InvalidParameter(_))
        ));
        assert!(haptic.play_continuous(0.5, 0.5, f32::NAN).is_err());

        // Clamp: acima do limite vira o limite
        haptic.play_continuous(0.5, 0.5, 120.0).unwrap();
        assert_eq!(
            probe.last_feedback(),
            Some(Feedback::ContinuousStarted {
                player: haptic.active_player().unwrap(),
                params: EventParams::medium(),
                duration_ms: 30_000,
            })
        );

        let mut strict = Haptic::with_config(SimulatedDevice::new(), FacadeConfig::strict()).unwrap();
        assert!(strict.play_continuous(0.5, 0.5, 120.0).is_err());
    }

    #[test]
    fn test_invalid_config() {
        let config = FacadeConfig {
            max_continuous_secs: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Haptic::with_config(SimulatedDevice::new(), config),
            Err(HapticError::InvalidConfig(_))
        ));

        let config = FacadeConfig {
            max_continuous_secs: 1.0e30,
            ..Default::default()
        };
        assert!(matches!(
            Haptic::with_config(SimulatedDevice::new(), config),
            Err(HapticError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_huge_continuous_duration() {
        let (mut haptic, probe) = facade();
        assert!(matches!(
            haptic.play_continuous(0.5, 0.5, 1.0e25),
            Ok(Playback::Played)
        ));
        assert_eq!(haptic.remaining().map(|d| d.as_secs() <= 30), Some(true));

        // Limite perto do teto de Duration
        let config = FacadeConfig {
            max_continuous_secs: 1.0e19,
            parameter_policy: ParameterPolicy::Clamp,
            ..Default::default()
        };
        let mut wide = Haptic::with_config(probe.clone(), config).unwrap();
        assert!(matches!(
            wide.play_continuous(0.5, 0.5, 1.0e25),
            Ok(Playback::Played)
        ));
        assert!(matches!(
            wide.play_continuous(0.5, 0.5, f32::INFINITY),
            Err(HapticError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_resolve_ahap_path() {
        let config = FacadeConfig {
            pattern_dir: PathBuf::from("/bundle/haptics"),
            ..Default::default()
        };
        let haptic = Haptic::with_config(SimulatedDevice::new(), config).unwrap();
        assert_eq!(
            haptic.resolve_ahap_path("boom"),
            PathBuf::from("/bundle/haptics/boom.ahap")
        );
        assert_eq!(
            haptic.resolve_ahap_path("rumble.json"),
            PathBuf::from("/bundle/haptics/rumble.json")
        );
    }

    #[test]
    fn test_component_trait() {
        let (haptic, _) = facade();
        assert_eq!(haptic.name(), "simulated");
        assert!(haptic.is_ready());
    }
}
