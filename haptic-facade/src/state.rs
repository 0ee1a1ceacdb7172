//! Máquina de estados de reprodução
//!
//! ```text
//!            play_continuous                 play_pattern
//!   ┌──────┐ ─────────────▶ ┌────────────┐   ┌─────────┐
//!   │ Idle │                │ Continuous │   │ Pattern │
//!   └──────┘ ◀───────────── └────────────┘   └─────────┘
//!       ▲      stop / expira      │  ▲              │
//!       └─────────────────────────┼──┼──────────────┘
//!                                 └──┘ update_continuous
//! ```
//!
//! Eventos transientes disparam e retornam dentro da própria chamada, sem
//! ocupar o player.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use haptic_core::{EventParams, PlayerId};

/// Estado interno do facade
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    Idle,
    Continuous {
        player: PlayerId,
        params: EventParams,
        started: Instant,
        duration: Duration,
    },
    Pattern {
        player: PlayerId,
        started: Instant,
        duration: Duration,
    },
}

impl PlaybackState {
    /// Player ocupado pelo estado, se houver
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Continuous { player, .. } | PlaybackState::Pattern { player, .. } => {
                Some(*player)
            }
        }
    }

    /// O evento ativo já passou da duração?
    pub fn is_expired(&self, now: Instant) -> bool {
        match self {
            PlaybackState::Idle => false,
            PlaybackState::Continuous { started, duration, .. }
            | PlaybackState::Pattern { started, duration, .. } => {
                now.duration_since(*started) >= *duration
            }
        }
    }

    /// Fase observável em `now` (estados expirados contam como `Idle`)
    pub fn phase_at(&self, now: Instant) -> PlaybackPhase {
        if self.is_expired(now) {
            return PlaybackPhase::Idle;
        }
        match self {
            PlaybackState::Idle => PlaybackPhase::Idle,
            PlaybackState::Continuous { .. } => PlaybackPhase::Continuous,
            PlaybackState::Pattern { .. } => PlaybackPhase::Pattern,
        }
    }

    /// Tempo restante em `now`
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Continuous { started, duration, .. }
            | PlaybackState::Pattern { started, duration, .. } => {
                duration.checked_sub(now.duration_since(*started))
            }
        }
    }
}

/// Resumo do estado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    Idle,
    Continuous,
    Pattern,
}

/// Motivo de uma chamada não ter produzido feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// O dispositivo não tem a capacidade necessária
    Unsupported,
    /// Nada tocando para atualizar/parar
    NotPlaying,
}

/// Resultado de uma operação do facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Playback {
    Played,
    Skipped(SkipReason),
}

impl Playback {
    pub fn is_played(&self) -> bool {
        matches!(self, Playback::Played)
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Playback::Skipped(SkipReason::Unsupported))
    }
}

/// Contadores de uso
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapticStats {
    pub predefined: u64,
    pub transients: u64,
    pub continuous_started: u64,
    pub continuous_updated: u64,
    pub patterns_started: u64,
    pub stopped: u64,
    pub expired: u64,
    pub skipped: u64,
    pub failures: u64,
}
