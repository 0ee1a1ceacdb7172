//! # Padrões AHAP
//!
//! Modelo serde para documentos no formato Apple Haptic and Audio Pattern.
//! As chaves JSON seguem exatamente o formato do arquivo:
//!
//! ```json
//! {
//!   "Version": 1.0,
//!   "Pattern": [
//!     { "Event": { "Time": 0.0, "EventType": "HapticTransient",
//!                  "EventParameters": [ { "ParameterID": "HapticIntensity", "ParameterValue": 0.8 } ] } },
//!     { "Event": { "Time": 0.1, "EventType": "HapticContinuous", "EventDuration": 0.5 } },
//!     { "ParameterCurve": { "ParameterID": "HapticIntensityControl", "Time": 0.1,
//!                           "ParameterCurveControlPoints": [ { "Time": 0.0, "ParameterValue": 1.0 } ] } }
//!   ]
//! }
//! ```
//!
//! Um padrão só é aceito depois de [`HapticPattern::validate`]; todos os
//! construtores públicos (`from_json_str`, `from_file`, ...) validam.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::types::EventParams;

/// Extensão de arquivos AHAP
pub const AHAP_EXTENSION: &str = "ahap";

/// Número máximo de pontos de controle por curva
pub const MAX_CURVE_POINTS: usize = 16;

/// Duração máxima de um padrão (1 hora)
pub const MAX_PATTERN_DURATION_SECS: f64 = 3600.0;

/// Intensidade padrão de um evento sem `HapticIntensity`
pub const DEFAULT_EVENT_INTENSITY: f32 = 1.0;

/// Nitidez padrão de um evento sem `HapticSharpness`
pub const DEFAULT_EVENT_SHARPNESS: f32 = 0.5;

pub type PatternResult<T> = Result<T, PatternError>;

/// Erros de carregamento e validação de padrões
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pattern: {0}")]
    Invalid(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// MODELO
// ═══════════════════════════════════════════════════════════════════════════════

/// Tipo de evento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    HapticTransient,
    HapticContinuous,
    AudioContinuous,
    AudioCustom,
}

impl EventType {
    pub fn is_haptic(&self) -> bool {
        matches!(self, EventType::HapticTransient | EventType::HapticContinuous)
    }

    /// Eventos que exigem `EventDuration`
    pub fn is_continuous(&self) -> bool {
        matches!(self, EventType::HapticContinuous | EventType::AudioContinuous)
    }
}

/// Identificador de parâmetro (de evento ou dinâmico)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterId {
    // Parâmetros de evento
    HapticIntensity,
    HapticSharpness,
    AttackTime,
    DecayTime,
    ReleaseTime,
    Sustained,
    AudioVolume,
    AudioPan,
    AudioPitch,
    AudioBrightness,
    // Parâmetros dinâmicos
    HapticIntensityControl,
    HapticSharpnessControl,
    HapticAttackTimeControl,
    HapticDecayTimeControl,
    HapticReleaseTimeControl,
    AudioVolumeControl,
    AudioPanControl,
    AudioPitchControl,
    AudioBrightnessControl,
    AudioAttackTimeControl,
    AudioDecayTimeControl,
    AudioReleaseTimeControl,
    #[serde(other)]
    Unknown,
}

impl ParameterId {
    /// Parâmetros cujo valor precisa estar em `[0, 1]`
    pub fn is_unit_range(&self) -> bool {
        matches!(
            self,
            ParameterId::HapticIntensity
                | ParameterId::HapticSharpness
                | ParameterId::AudioVolume
                | ParameterId::HapticIntensityControl
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventParameter {
    #[serde(rename = "ParameterID")]
    pub id: ParameterId,
    #[serde(rename = "ParameterValue")]
    pub value: f64,
}

/// Evento do padrão
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PatternEvent {
    pub time: f64,
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_parameters: Vec<EventParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_waveform_path: Option<String>,
}

impl PatternEvent {
    /// Valor de um parâmetro (o último vence se repetido)
    pub fn parameter(&self, id: ParameterId) -> Option<f64> {
        self.event_parameters
            .iter()
            .rev()
            .find(|p| p.id == id)
            .map(|p| p.value)
    }

    /// Intensidade/nitidez do evento, com os padrões do formato
    pub fn params(&self) -> EventParams {
        let intensity = self
            .parameter(ParameterId::HapticIntensity)
            .map(|v| v as f32)
            .unwrap_or(DEFAULT_EVENT_INTENSITY);
        let sharpness = self
            .parameter(ParameterId::HapticSharpness)
            .map(|v| v as f32)
            .unwrap_or(DEFAULT_EVENT_SHARPNESS);
        EventParams::clamped(intensity, sharpness)
    }

    /// Instante (s) em que o evento termina
    pub fn end_time(&self) -> f64 {
        if self.event_type.is_continuous() {
            self.time + self.event_duration.unwrap_or(0.0)
        } else {
            self.time
        }
    }
}

/// Parâmetro dinâmico aplicado em um instante
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicParameter {
    #[serde(rename = "ParameterID")]
    pub id: ParameterId,
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "ParameterValue")]
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ControlPoint {
    pub time: f64,
    pub parameter_value: f64,
}

/// Curva de parâmetro dinâmico (tempos dos pontos relativos a `time`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterCurve {
    #[serde(rename = "ParameterID")]
    pub id: ParameterId,
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "ParameterCurveControlPoints")]
    pub control_points: Vec<ControlPoint>,
}

impl ParameterCurve {
    pub fn end_time(&self) -> f64 {
        self.time + self.control_points.last().map(|p| p.time).unwrap_or(0.0)
    }
}

/// Entrada do array `Pattern`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternEntry {
    Event(PatternEvent),
    Parameter(DynamicParameter),
    ParameterCurve(ParameterCurve),
}

impl PatternEntry {
    pub fn end_time(&self) -> f64 {
        match self {
            PatternEntry::Event(event) => event.end_time(),
            PatternEntry::Parameter(param) => param.time,
            PatternEntry::ParameterCurve(curve) => curve.end_time(),
        }
    }
}

fn default_version() -> f64 {
    1.0
}

/// Documento AHAP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HapticPattern {
    #[serde(default = "default_version")]
    pub version: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub pattern: Vec<PatternEntry>,
}

impl HapticPattern {
    /// Cria padrão vazio (inválido até receber um evento háptico)
    pub fn new() -> Self {
        Self {
            version: default_version(),
            metadata: None,
            pattern: Vec::new(),
        }
    }

    /// Adiciona evento instantâneo
    pub fn with_transient(mut self, time: f64, params: EventParams) -> Self {
        self.pattern.push(PatternEntry::Event(PatternEvent {
            time,
            event_type: EventType::HapticTransient,
            event_duration: None,
            event_parameters: Self::haptic_parameters(params),
            event_waveform_path: None,
        }));
        self
    }

    /// Adiciona evento contínuo
    pub fn with_continuous(mut self, time: f64, duration: f64, params: EventParams) -> Self {
        self.pattern.push(PatternEntry::Event(PatternEvent {
            time,
            event_type: EventType::HapticContinuous,
            event_duration: Some(duration),
            event_parameters: Self::haptic_parameters(params),
            event_waveform_path: None,
        }));
        self
    }

    fn haptic_parameters(params: EventParams) -> Vec<EventParameter> {
        vec![
            EventParameter {
                id: ParameterId::HapticIntensity,
                value: params.intensity as f64,
            },
            EventParameter {
                id: ParameterId::HapticSharpness,
                value: params.sharpness as f64,
            },
        ]
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Carregamento
    // ───────────────────────────────────────────────────────────────────────────

    /// Lê e valida um padrão a partir de JSON
    pub fn from_json_str(json: &str) -> PatternResult<Self> {
        let pattern: Self = serde_json::from_str(json)?;
        pattern.validate()?;
        Ok(pattern)
    }

    /// Lê e valida um padrão a partir de um dicionário JSON já decodificado
    pub fn from_value(value: Value) -> PatternResult<Self> {
        let pattern: Self = serde_json::from_value(value)?;
        pattern.validate()?;
        Ok(pattern)
    }

    /// Lê e valida um arquivo `.ahap`
    pub fn from_file(path: impl AsRef<Path>) -> PatternResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PatternError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = json.len(), "loaded AHAP file");
        Self::from_json_str(&json)
    }

    /// Lê e valida o arquivo referenciado por uma URL `file://`
    pub fn from_url_str(url: &str) -> PatternResult<Self> {
        let path = file_path_from_url(url)?;
        Self::from_file(path)
    }

    /// Serializa de volta para JSON formatado
    pub fn to_json_string(&self) -> PatternResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Consulta
    // ───────────────────────────────────────────────────────────────────────────

    pub fn events(&self) -> impl Iterator<Item = &PatternEvent> {
        self.pattern.iter().filter_map(|entry| match entry {
            PatternEntry::Event(event) => Some(event),
            _ => None,
        })
    }

    pub fn haptic_events(&self) -> impl Iterator<Item = &PatternEvent> {
        self.events().filter(|e| e.event_type.is_haptic())
    }

    pub fn has_audio(&self) -> bool {
        self.events().any(|e| !e.event_type.is_haptic())
    }

    /// Duração total em segundos
    pub fn duration_secs(&self) -> f64 {
        self.pattern
            .iter()
            .map(PatternEntry::end_time)
            .fold(0.0, f64::max)
    }

    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs()).unwrap_or(Duration::MAX)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Validação
    // ───────────────────────────────────────────────────────────────────────────

    pub fn validate(&self) -> PatternResult<()> {
        if !self.version.is_finite() {
            return Err(PatternError::Invalid("Version must be a finite number".into()));
        }

        if self.haptic_events().next().is_none() {
            return Err(PatternError::Invalid("pattern has no haptic events".into()));
        }

        for (index, entry) in self.pattern.iter().enumerate() {
            match entry {
                PatternEntry::Event(event) => validate_event(index, event)?,
                PatternEntry::Parameter(param) => {
                    check_time(index, "Parameter.Time", param.time)?;
                    check_value(index, param.id, param.value)?;
                }
                PatternEntry::ParameterCurve(curve) => validate_curve(index, curve)?,
            }
        }

        let duration = self.duration_secs();
        if duration > MAX_PATTERN_DURATION_SECS {
            return Err(PatternError::Invalid(format!(
                "pattern lasts {}s, limit is {}s",
                duration, MAX_PATTERN_DURATION_SECS
            )));
        }

        Ok(())
    }
}

impl Default for HapticPattern {
    fn default() -> Self {
        Self::new()
    }
}

fn check_time(index: usize, field: &str, time: f64) -> PatternResult<()> {
    if !time.is_finite() || time < 0.0 {
        return Err(PatternError::Invalid(format!(
            "entry {}: {} must be >= 0, got {}",
            index, field, time
        )));
    }
    Ok(())
}

fn check_value(index: usize, id: ParameterId, value: f64) -> PatternResult<()> {
    if !value.is_finite() {
        return Err(PatternError::Invalid(format!(
            "entry {}: {:?} value is not finite",
            index, id
        )));
    }
    if id.is_unit_range() && !(0.0..=1.0).contains(&value) {
        return Err(PatternError::Invalid(format!(
            "entry {}: {:?} must be within 0.0-1.0, got {}",
            index, id, value
        )));
    }
    Ok(())
}

fn validate_event(index: usize, event: &PatternEvent) -> PatternResult<()> {
    check_time(index, "Event.Time", event.time)?;

    match event.event_duration {
        Some(duration) if !duration.is_finite() || duration < 0.0 => {
            return Err(PatternError::Invalid(format!(
                "entry {}: EventDuration must be >= 0, got {}",
                index, duration
            )));
        }
        Some(duration) if event.event_type.is_continuous() && duration == 0.0 => {
            return Err(PatternError::Invalid(format!(
                "entry {}: {:?} needs a positive EventDuration",
                index, event.event_type
            )));
        }
        None if event.event_type.is_continuous() => {
            return Err(PatternError::Invalid(format!(
                "entry {}: {:?} is missing EventDuration",
                index, event.event_type
            )));
        }
        _ => {}
    }

    if event.event_type == EventType::AudioCustom && event.event_waveform_path.is_none() {
        return Err(PatternError::Invalid(format!(
            "entry {}: AudioCustom is missing EventWaveformPath",
            index
        )));
    }

    for param in &event.event_parameters {
        check_value(index, param.id, param.value)?;
    }

    Ok(())
}

fn validate_curve(index: usize, curve: &ParameterCurve) -> PatternResult<()> {
    check_time(index, "ParameterCurve.Time", curve.time)?;

    let count = curve.control_points.len();
    if count == 0 || count > MAX_CURVE_POINTS {
        return Err(PatternError::Invalid(format!(
            "entry {}: ParameterCurve needs 1-{} control points, got {}",
            index, MAX_CURVE_POINTS, count
        )));
    }

    let mut last = 0.0;
    for point in &curve.control_points {
        check_time(index, "ControlPoint.Time", point.time)?;
        if point.time < last {
            return Err(PatternError::Invalid(format!(
                "entry {}: control point times must not decrease",
                index
            )));
        }
        last = point.time;
        check_value(index, curve.id, point.parameter_value)?;
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// URL
// ═══════════════════════════════════════════════════════════════════════════════

/// Converte uma URL `file://` em caminho local.
///
/// Aceita `file:///abs/path` e `file://localhost/abs/path`, com
/// percent-decoding (`%20` → espaço). Query e fragmento são ignorados.
/// Outros esquemas são rejeitados.
pub fn file_path_from_url(url: &str) -> PatternResult<PathBuf> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| PatternError::InvalidUrl(format!("{}: {}", url, e)))?;

    if parsed.scheme() != "file" {
        return Err(PatternError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    match parsed.host_str() {
        None | Some("") | Some("localhost") => {}
        Some(host) => {
            return Err(PatternError::InvalidUrl(format!("remote host {} in {}", host, url)));
        }
    }

    let path = parsed.path();
    if !has_valid_escapes(path) {
        return Err(PatternError::InvalidUrl(format!("bad escape in {}", url)));
    }

    let decoded = urlencoding::decode(path)
        .map_err(|_| PatternError::InvalidUrl(format!("non UTF-8 path in {}", url)))?;
    Ok(PathBuf::from(decoded.into_owned()))
}

/// Todo `%` precisa de dois dígitos hexadecimais
fn has_valid_escapes(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}
