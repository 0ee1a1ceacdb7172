//! Testes do módulo haptic-facade

use super::*;
use std::time::Duration;
use haptic_device::{Feedback, NullDevice, PlayerKind, SimulatedDevice};

fn simulated() -> (Haptic<SimulatedDevice>, SimulatedDevice) {
    let probe = SimulatedDevice::new();
    (Haptic::new(probe.clone()), probe)
}

const PATTERN_JSON: &str = r#"{
    "Version": 1.0,
    "Pattern": [
        { "Event": { "Time": 0.0, "EventType": "HapticTransient",
                     "EventParameters": [ { "ParameterID": "HapticIntensity", "ParameterValue": 1.0 } ] } },
        { "Event": { "Time": 0.1, "EventType": "HapticContinuous", "EventDuration": 4.9 } }
    ]
}"#;

// ═══════════════════════════════════════════════════════════════════════════════
// CAPACIDADES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_unsupported_device_skips_everything() {
    let mut haptic = Haptic::new(NullDevice::new());

    let unsupported = Playback::Skipped(SkipReason::Unsupported);
    assert_eq!(haptic.selection().unwrap(), unsupported);
    assert_eq!(haptic.impact(ImpactStyle::Heavy).unwrap(), unsupported);
    assert_eq!(haptic.notification(NotificationType::Error).unwrap(), unsupported);
    assert_eq!(haptic.play_transient(0.5, 0.5).unwrap(), unsupported);
    assert_eq!(haptic.play_continuous(0.5, 0.5, 1.0).unwrap(), unsupported);
    assert_eq!(haptic.play_pattern_json(PATTERN_JSON).unwrap(), unsupported);
    assert_eq!(haptic.play_ahap_file("missing").unwrap(), unsupported);
    assert_eq!(haptic.play_ahap_url("file:///missing.ahap").unwrap(), unsupported);

    assert_eq!(haptic.stats().skipped, 8);
    assert_eq!(haptic.phase(), PlaybackPhase::Idle);
}

#[test]
fn test_unsupported_skips_before_parsing() {
    let mut haptic = Haptic::new(NullDevice::new());
    // JSON inválido não é nem lido sem suporte
    assert!(haptic.play_pattern_json("{ broken").unwrap().is_unsupported());
}

#[test]
fn test_predefined_only_device() {
    let probe = SimulatedDevice::with_capabilities(Capabilities::predefined_only());
    let mut haptic = Haptic::new(probe.clone());

    assert!(!haptic.is_supported());
    assert!(haptic.selection().unwrap().is_played());
    assert!(haptic.impact(ImpactStyle::Light).unwrap().is_played());
    assert!(haptic.play_transient(0.5, 0.5).unwrap().is_unsupported());

    assert_eq!(probe.command_count(), 2);
    assert_eq!(haptic.stats().predefined, 2);
}

#[test]
fn test_patterns_need_pattern_capability() {
    let caps = Capabilities {
        pattern_files: false,
        ..Capabilities::full()
    };
    let mut haptic = Haptic::new(SimulatedDevice::with_capabilities(caps));

    assert!(haptic.play_transient(0.5, 0.5).unwrap().is_played());
    assert!(haptic.play_pattern_json(PATTERN_JSON).unwrap().is_unsupported());
}

#[test]
fn test_capability_read_at_query_time() {
    let (haptic, probe) = simulated();
    assert!(haptic.is_supported());

    probe.set_capabilities(Capabilities::none());
    assert!(!haptic.is_supported());
}

// ═══════════════════════════════════════════════════════════════════════════════
// MÁQUINA DE ESTADOS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_continuous_replaces_continuous() {
    let (mut haptic, probe) = simulated();

    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
    let first = haptic.active_player().unwrap();

    haptic.play_continuous(0.9, 0.9, 5.0).unwrap();
    let second = haptic.active_player().unwrap();

    assert_ne!(first, second);
    assert_eq!(probe.active_players(), 1);
    assert_eq!(probe.player_kind(first), None);
    assert_eq!(haptic.stats().stopped, 1);
}

#[test]
fn test_pattern_replaces_continuous() {
    let (mut haptic, probe) = simulated();

    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
    haptic.play_pattern_json(PATTERN_JSON).unwrap();

    assert_eq!(haptic.phase(), PlaybackPhase::Pattern);
    assert_eq!(probe.active_players(), 1);

    let player = haptic.active_player().unwrap();
    assert_eq!(probe.player_kind(player), Some(PlayerKind::Pattern));
}

#[test]
fn test_update_during_pattern_is_not_playing() {
    let (mut haptic, _) = simulated();
    haptic.play_pattern_json(PATTERN_JSON).unwrap();

    assert_eq!(
        haptic.update_continuous(0.5, 0.5).unwrap(),
        Playback::Skipped(SkipReason::NotPlaying)
    );
    assert_eq!(haptic.phase(), PlaybackPhase::Pattern);
}

#[test]
fn test_stop_pattern_player_only_stops_patterns() {
    let (mut haptic, probe) = simulated();

    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
    assert_eq!(
        haptic.stop_pattern_player().unwrap(),
        Playback::Skipped(SkipReason::NotPlaying)
    );
    assert_eq!(haptic.phase(), PlaybackPhase::Continuous);

    haptic.play_pattern_json(PATTERN_JSON).unwrap();
    assert_eq!(haptic.stop_pattern_player().unwrap(), Playback::Played);
    assert_eq!(haptic.phase(), PlaybackPhase::Idle);
    assert_eq!(probe.active_players(), 0);
}

#[test]
fn test_stop_is_idempotent() {
    let (mut haptic, probe) = simulated();
    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();

    assert!(haptic.stop().unwrap().is_played());
    for _ in 0..3 {
        assert_eq!(haptic.stop().unwrap(), Playback::Skipped(SkipReason::NotPlaying));
    }
    assert_eq!(probe.active_players(), 0);
}

#[test]
fn test_stop_is_idempotent_in_strict_mode() {
    let mut haptic = Haptic::with_config(SimulatedDevice::new(), FacadeConfig::strict()).unwrap();
    assert!(haptic.stop().is_ok());
    assert!(haptic.stop_pattern_player().is_ok());
}

#[test]
fn test_continuous_expires() {
    let (mut haptic, probe) = simulated();
    haptic.play_continuous(0.5, 0.5, 0.02).unwrap();
    assert_eq!(haptic.phase(), PlaybackPhase::Continuous);

    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(haptic.phase(), PlaybackPhase::Idle);
    assert_eq!(haptic.active_player(), None);

    // A próxima chamada libera o player expirado
    assert_eq!(
        haptic.update_continuous(0.5, 0.5).unwrap(),
        Playback::Skipped(SkipReason::NotPlaying)
    );
    assert_eq!(haptic.stats().expired, 1);
    assert_eq!(probe.active_players(), 0);
}

#[test]
fn test_transient_during_continuous_keeps_continuous() {
    let (mut haptic, probe) = simulated();
    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
    haptic.play_transient(1.0, 1.0).unwrap();

    assert_eq!(haptic.phase(), PlaybackPhase::Continuous);
    assert_eq!(probe.active_players(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════════
// FALHAS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_device_fault_is_error() {
    let (mut haptic, probe) = simulated();
    probe.inject_fault("driver crashed");

    let err = haptic.play_transient(0.5, 0.5).unwrap_err();
    assert!(matches!(err, HapticError::Device(DeviceError::Fault(_))));
    assert_eq!(haptic.stats().failures, 1);
    assert!(!haptic.is_ready());
}

#[test]
fn test_reset_engine_recovers() {
    let (mut haptic, probe) = simulated();
    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
    probe.inject_fault("driver crashed");

    haptic.reset_engine().unwrap();
    assert_eq!(haptic.phase(), PlaybackPhase::Idle);
    assert_eq!(probe.active_players(), 0);
    assert!(haptic.play_transient(0.5, 0.5).unwrap().is_played());
}

#[test]
fn test_engine_stopped_by_system() {
    let (mut haptic, probe) = simulated();
    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
    probe.stop_engine();

    // O player já foi liberado pelo sistema
    assert_eq!(
        haptic.update_continuous(0.7, 0.7).unwrap(),
        Playback::Skipped(SkipReason::NotPlaying)
    );
    assert_eq!(haptic.phase(), PlaybackPhase::Idle);

    assert!(matches!(
        haptic.selection(),
        Err(HapticError::Device(DeviceError::EngineStopped))
    ));
}

#[test]
fn test_failed_stop_keeps_player() {
    let (mut haptic, probe) = simulated();
    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
    let player = haptic.active_player().unwrap();
    probe.inject_stop_fault("player locked");

    assert!(matches!(
        haptic.stop(),
        Err(HapticError::Device(DeviceError::CommandFailed(_)))
    ));
    assert_eq!(haptic.phase(), PlaybackPhase::Continuous);
    assert_eq!(haptic.active_player(), Some(player));

    // Substituição também falha sem perder o player atual
    assert!(haptic.play_continuous(0.9, 0.9, 5.0).is_err());
    assert_eq!(haptic.active_player(), Some(player));
    assert_eq!(probe.active_players(), 1);

    probe.clear_stop_fault();
    assert_eq!(haptic.stop().unwrap(), Playback::Played);
    assert_eq!(probe.active_players(), 0);
    assert_eq!(haptic.stats().failures, 2);
}

#[test]
fn test_drop_retries_failed_stop() {
    let probe = SimulatedDevice::new();
    {
        let mut haptic = Haptic::new(probe.clone());
        haptic.play_pattern_json(PATTERN_JSON).unwrap();
        probe.inject_stop_fault("player locked");
        assert!(haptic.stop_pattern_player().is_err());
        assert_eq!(haptic.phase(), PlaybackPhase::Pattern);
        probe.clear_stop_fault();
    }
    assert_eq!(probe.active_players(), 0);
}

#[test]
fn test_stop_after_system_released_player() {
    let (mut haptic, probe) = simulated();
    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
    probe.stop_engine();

    assert_eq!(haptic.stop().unwrap(), Playback::Skipped(SkipReason::NotPlaying));
    assert_eq!(haptic.phase(), PlaybackPhase::Idle);
    assert_eq!(haptic.stats().stopped, 0);
}

#[test]
fn test_invalid_pattern_json() {
    let (mut haptic, probe) = simulated();
    let err = haptic.play_pattern_json(r#"{ "Pattern": [] }"#).unwrap_err();
    assert!(matches!(err, HapticError::Pattern(PatternError::Invalid(_))));
    assert_eq!(probe.command_count(), 0);
}

#[test]
fn test_invalid_pattern_keeps_current_playback() {
    let (mut haptic, probe) = simulated();
    haptic.play_continuous(0.5, 0.5, 5.0).unwrap();

    assert!(haptic.play_pattern_json("not json").is_err());
    assert_eq!(haptic.phase(), PlaybackPhase::Continuous);
    assert_eq!(probe.active_players(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECURSOS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_drop_releases_player() {
    let probe = SimulatedDevice::new();
    {
        let mut haptic = Haptic::new(probe.clone());
        haptic.play_continuous(0.5, 0.5, 5.0).unwrap();
        assert_eq!(probe.active_players(), 1);
    }
    assert_eq!(probe.active_players(), 0);
    assert!(matches!(probe.last_feedback(), Some(Feedback::Stopped(_))));
}

#[test]
fn test_two_facades_share_device() {
    let probe = SimulatedDevice::new();
    let mut a = Haptic::new(probe.clone());
    let mut b = Haptic::new(probe.clone());

    a.play_continuous(0.5, 0.5, 5.0).unwrap();
    b.play_continuous(0.5, 0.5, 5.0).unwrap();
    assert_eq!(probe.active_players(), 2);

    a.stop().unwrap();
    assert_eq!(probe.active_players(), 1);
    assert_eq!(b.phase(), PlaybackPhase::Continuous);
}

#[test]
fn test_boxed_device() {
    let probe = SimulatedDevice::new();
    let device: Box<dyn HapticDevice> = Box::new(probe.clone());
    let mut haptic = Haptic::new(device);

    haptic.play_continuous(0.5, 0.5, 1.0).unwrap();
    haptic.stop().unwrap();
    assert_eq!(probe.active_players(), 0);
    assert_eq!(probe.released_players(), 1);
}

#[test]
fn test_stats_serialize() {
    let (mut haptic, _) = simulated();
    haptic.selection().unwrap();
    haptic.play_transient(0.1, 0.1).unwrap();

    let json = serde_json::to_value(haptic.stats()).unwrap();
    assert_eq!(json["predefined"], 1);
    assert_eq!(json["transients"], 1);
}
