//! Dispositivo háptico simulado

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use haptic_core::prelude::*;

/// Tipo de player ativo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    Continuous,
    Pattern,
}

/// Feedback emitido pelo dispositivo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feedback {
    Selection,
    Impact {
        style: ImpactStyle,
        intensity: f32,
    },
    Notification(NotificationType),
    Transient(EventParams),
    ContinuousStarted {
        player: PlayerId,
        params: EventParams,
        duration_ms: u64,
    },
    ContinuousUpdated {
        player: PlayerId,
        params: EventParams,
    },
    PatternStarted {
        player: PlayerId,
        haptic_events: usize,
        duration_ms: u64,
    },
    Stopped(PlayerId),
}

/// Registro do log de feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Sequência monotônica
    pub seq: u64,
    /// Tempo desde a criação do dispositivo (µs)
    pub elapsed_us: u64,
    pub feedback: Feedback,
}

#[derive(Debug, Clone)]
struct Player {
    kind: PlayerKind,
    params: EventParams,
    started: Instant,
    duration: Duration,
}

impl Player {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.duration
    }
}

/// Estado interno do dispositivo
#[derive(Debug, Clone)]
pub struct SimulatedState {
    status: DeviceStatus,
    capabilities: Capabilities,
    players: BTreeMap<PlayerId, Player>,
    next_player: u64,
    log: VecDeque<FeedbackRecord>,
    log_capacity: usize,
    commands: u64,
    released: u64,
    fault: Option<String>,
    stop_fault: Option<String>,
    created: Instant,
}

impl SimulatedState {
    fn new(capabilities: Capabilities, log_capacity: usize) -> Self {
        Self {
            status: DeviceStatus::Ready,
            capabilities,
            players: BTreeMap::new(),
            next_player: 1,
            log: VecDeque::with_capacity(log_capacity),
            log_capacity,
            commands: 0,
            released: 0,
            fault: None,
            stop_fault: None,
            created: Instant::now(),
        }
    }

    /// Remove players cujo tempo já acabou
    fn sweep(&mut self) {
        let now = Instant::now();
        let before = self.players.len();
        self.players.retain(|_, player| !player.is_expired(now));
        self.released += (before - self.players.len()) as u64;
    }

    fn ensure_running(&self) -> DeviceResult<()> {
        match self.status {
            DeviceStatus::Fault => Err(DeviceError::Fault(
                self.fault.clone().unwrap_or_else(|| "unknown fault".into()),
            )),
            DeviceStatus::Stopped => Err(DeviceError::EngineStopped),
            DeviceStatus::Ready => Ok(()),
        }
    }

    fn ensure_capability(&self, available: bool, what: &str) -> DeviceResult<()> {
        if !available {
            return Err(DeviceError::Unsupported(what.to_string()));
        }
        Ok(())
    }

    fn record(&mut self, feedback: Feedback) {
        if self.log.len() == self.log_capacity {
            self.log.pop_front();
        }
        self.commands += 1;
        self.log.push_back(FeedbackRecord {
            seq: self.commands,
            elapsed_us: self.created.elapsed().as_micros() as u64,
            feedback,
        });
    }

    fn allocate(&mut self, kind: PlayerKind, params: EventParams, duration: Duration) -> PlayerId {
        let id = PlayerId(self.next_player);
        self.next_player += 1;
        self.players.insert(
            id,
            Player {
                kind,
                params,
                started: Instant::now(),
                duration,
            },
        );
        id
    }

    fn release(&mut self, player: PlayerId) -> bool {
        if self.players.remove(&player).is_some() {
            self.released += 1;
            true
        } else {
            false
        }
    }
}

/// Configuração do dispositivo simulado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedConfig {
    /// Nome do dispositivo
    pub name: String,
    /// Capacidades anunciadas
    pub capabilities: Capabilities,
    /// Tamanho máximo do log de feedback
    pub log_capacity: usize,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            name: "simulated".to_string(),
            capabilities: Capabilities::full(),
            log_capacity: 256,
        }
    }
}

/// Dispositivo háptico em memória
///
/// Clones compartilham o mesmo estado: um clone mantido pelo teste observa
/// tudo o que o facade faz com o dispositivo injetado.
#[derive(Clone)]
pub struct SimulatedDevice {
    state: Arc<Mutex<SimulatedState>>,
    config: SimulatedConfig,
}

impl std::fmt::Debug for SimulatedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedDevice")
            .field("config", &self.config)
            .finish()
    }
}

impl SimulatedDevice {
    /// Cria dispositivo com todas as capacidades
    pub fn new() -> Self {
        Self::build(SimulatedConfig::default())
    }

    /// Cria com configuração específica
    pub fn with_config(config: SimulatedConfig) -> DeviceResult<Self> {
        if config.name.trim().is_empty() {
            return Err(DeviceError::InvalidConfig("name must not be empty".into()));
        }

        if config.log_capacity == 0 {
            return Err(DeviceError::InvalidConfig(
                "log_capacity must be positive".into(),
            ));
        }

        Ok(Self::build(config))
    }

    /// Cria dispositivo com capacidades específicas
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self::build(SimulatedConfig {
            capabilities,
            ..Default::default()
        })
    }

    fn build(config: SimulatedConfig) -> Self {
        let state = SimulatedState::new(config.capabilities, config.log_capacity);
        Self {
            state: Arc::new(Mutex::new(state)),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Configuração com as capacidades atuais
    pub fn config(&self) -> SimulatedConfig {
        SimulatedConfig {
            capabilities: self.lock().capabilities,
            ..self.config.clone()
        }
    }

    /// Players ainda tocando (expirados não contam)
    pub fn active_players(&self) -> usize {
        let mut state = self.lock();
        state.sweep();
        state.players.len()
    }

    /// Tipo de um player ativo
    pub fn player_kind(&self, player: PlayerId) -> Option<PlayerKind> {
        let mut state = self.lock();
        state.sweep();
        state.players.get(&player).map(|p| p.kind)
    }

    /// Parâmetros atuais de um player ativo
    pub fn player_params(&self, player: PlayerId) -> Option<EventParams> {
        let mut state = self.lock();
        state.sweep();
        state.players.get(&player).map(|p| p.params)
    }

    /// Total de players liberados (parados ou expirados)
    pub fn released_players(&self) -> u64 {
        let mut state = self.lock();
        state.sweep();
        state.released
    }

    /// Número de comandos executados
    pub fn command_count(&self) -> u64 {
        self.lock().commands
    }

    /// Cópia do log de feedback
    pub fn log(&self) -> Vec<FeedbackRecord> {
        self.lock().log.iter().cloned().collect()
    }

    /// Último feedback emitido
    pub fn last_feedback(&self) -> Option<Feedback> {
        self.lock().log.back().map(|r| r.feedback.clone())
    }

    /// Altera as capacidades anunciadas (simula troca de hardware/SO)
    pub fn set_capabilities(&self, capabilities: Capabilities) {
        self.lock().capabilities = capabilities;
    }

    /// Coloca o motor em falha; comandos falham até `reset`
    pub fn inject_fault(&self, reason: &str) {
        let mut state = self.lock();
        tracing::warn!(device = %self.config.name, reason, "fault injected");
        state.status = DeviceStatus::Fault;
        state.fault = Some(reason.to_string());
    }

    /// Faz `stop_player` falhar até `reset`; os players continuam ativos
    pub fn inject_stop_fault(&self, reason: &str) {
        tracing::warn!(device = %self.config.name, reason, "stop fault injected");
        self.lock().stop_fault = Some(reason.to_string());
    }

    pub fn clear_stop_fault(&self) {
        self.lock().stop_fault = None;
    }

    /// Simula o sistema parando o motor (ex.: app em background)
    pub fn stop_engine(&self) {
        let mut state = self.lock();
        let players: Vec<PlayerId> = state.players.keys().copied().collect();
        for player in players {
            state.release(player);
        }
        state.status = DeviceStatus::Stopped;
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPLEMENTAÇÃO DOS TRAITS DO CORE
// ═══════════════════════════════════════════════════════════════════════════════

impl HapticComponent for SimulatedDevice {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn is_ready(&self) -> bool {
        self.lock().status == DeviceStatus::Ready
    }
}

impl HapticDevice for SimulatedDevice {
    fn capabilities(&self) -> Capabilities {
        self.lock().capabilities
    }

    fn status(&self) -> DeviceStatus {
        self.lock().status
    }

    fn selection(&mut self) -> DeviceResult<()> {
        let mut state = self.lock();
        state.ensure_running()?;
        state.ensure_capability(state.capabilities.predefined_feedback, "selection feedback")?;
        state.record(Feedback::Selection);
        tracing::trace!(device = %self.config.name, "selection");
        Ok(())
    }

    fn impact(&mut self, style: ImpactStyle) -> DeviceResult<()> {
        let mut state = self.lock();
        state.ensure_running()?;
        state.ensure_capability(state.capabilities.predefined_feedback, "impact feedback")?;
        let intensity = style.nominal_intensity();
        state.record(Feedback::Impact { style, intensity });
        tracing::trace!(device = %self.config.name, ?style, intensity, "impact");
        Ok(())
    }

    fn notification(&mut self, kind: NotificationType) -> DeviceResult<()> {
        let mut state = self.lock();
        state.ensure_running()?;
        state.ensure_capability(state.capabilities.predefined_feedback, "notification feedback")?;
        state.record(Feedback::Notification(kind));
        tracing::trace!(device = %self.config.name, ?kind, "notification");
        Ok(())
    }

    fn play_transient(&mut self, params: EventParams) -> DeviceResult<()> {
        params.validate()?;
        let mut state = self.lock();
        state.ensure_running()?;
        state.ensure_capability(state.capabilities.custom_events, "custom events")?;
        state.record(Feedback::Transient(params));
        tracing::trace!(device = %self.config.name, ?params, "transient");
        Ok(())
    }

    fn start_continuous(&mut self, params: EventParams, duration: Duration) -> DeviceResult<PlayerId> {
        params.validate()?;
        if duration.is_zero() {
            return Err(DeviceError::OutOfRange("continuous duration must be positive".into()));
        }

        let mut state = self.lock();
        state.ensure_running()?;
        state.ensure_capability(state.capabilities.custom_events, "custom events")?;
        state.sweep();

        let player = state.allocate(PlayerKind::Continuous, params, duration);
        state.record(Feedback::ContinuousStarted {
            player,
            params,
            duration_ms: duration.as_millis() as u64,
        });
        tracing::trace!(device = %self.config.name, %player, ?duration, "continuous started");
        Ok(player)
    }

    fn update_continuous(&mut self, player: PlayerId, params: EventParams) -> DeviceResult<()> {
        params.validate()?;
        let mut state = self.lock();
        state.sweep();

        // Player liberado (expirado, parado ou motor parado) antes do status
        let is_continuous = state
            .players
            .get(&player)
            .is_some_and(|active| active.kind == PlayerKind::Continuous);
        if !is_continuous {
            return Err(DeviceError::UnknownPlayer(player));
        }
        state.ensure_running()?;

        if let Some(active) = state.players.get_mut(&player) {
            active.params = params;
        }

        state.record(Feedback::ContinuousUpdated { player, params });
        Ok(())
    }

    fn play_pattern(&mut self, pattern: &HapticPattern) -> DeviceResult<PlayerId> {
        pattern
            .validate()
            .map_err(|e| DeviceError::CommandFailed(e.to_string()))?;

        let mut state = self.lock();
        state.ensure_running()?;
        state.ensure_capability(state.capabilities.pattern_files, "pattern playback")?;

        if pattern.has_audio() && !state.capabilities.audio_events {
            tracing::warn!(device = %self.config.name, "audio events in pattern ignored");
        }

        state.sweep();
        let haptic_events = pattern.haptic_events().count();
        let duration = pattern.duration();
        let first = pattern
            .haptic_events()
            .next()
            .map(|event| event.params())
            .unwrap_or_default();

        let player = state.allocate(PlayerKind::Pattern, first, duration);
        state.record(Feedback::PatternStarted {
            player,
            haptic_events,
            duration_ms: duration.as_millis() as u64,
        });
        tracing::trace!(device = %self.config.name, %player, haptic_events, "pattern started");
        Ok(player)
    }

    fn stop_player(&mut self, player: PlayerId) -> DeviceResult<bool> {
        let mut state = self.lock();
        state.sweep();
        if !state.players.contains_key(&player) {
            return Ok(false);
        }
        if let Some(reason) = &state.stop_fault {
            return Err(DeviceError::CommandFailed(format!(
                "cannot stop {}: {}",
                player, reason
            )));
        }
        state.release(player);
        state.record(Feedback::Stopped(player));
        Ok(true)
    }

    fn stop_all(&mut self) -> DeviceResult<()> {
        let mut state = self.lock();
        let players: Vec<PlayerId> = state.players.keys().copied().collect();
        for player in players {
            state.release(player);
            state.record(Feedback::Stopped(player));
        }
        Ok(())
    }

    fn reset(&mut self) -> DeviceResult<()> {
        let mut state = self.lock();
        let players: Vec<PlayerId> = state.players.keys().copied().collect();
        for player in players {
            state.release(player);
        }
        state.status = DeviceStatus::Ready;
        state.fault = None;
        state.stop_fault = None;
        tracing::debug!(device = %self.config.name, "engine reset");
        Ok(())
    }
}
