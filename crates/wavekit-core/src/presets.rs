//! Preset waveforms.
//!
//! A preset is produced in two steps: [`collect_preset_params`] asks the user
//! every question up front through a [`ParameterPrompt`] (a cancel at any
//! question aborts the whole preset), then [`generate`] builds the point set
//! from the collected parameters without any further interaction.

use crate::error::{WaveformError, WaveformResult};
use crate::point::{linspace_positions, ControlPoint, VOLTAGE_MAX, VOLTAGE_MIN};
use crate::point_set::PointSet;
use crate::prompt::{FloatRequest, ParameterPrompt};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Number of points a preset lays down unless configured otherwise.
pub const DEFAULT_PRESET_RESOLUTION: usize = 100;

/// Preset waveform shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    Sine,
    Sawtooth,
    Triangle,
    Square,
}

impl PresetKind {
    pub const ALL: [PresetKind; 4] = [Self::Sine, Self::Sawtooth, Self::Triangle, Self::Square];

    /// The two amplitude questions asked for this preset, in order.
    pub fn questions(&self) -> [FloatRequest; 2] {
        let title = format!("{} Wave", self);
        let ask = |label: &str, default: f64| {
            FloatRequest::new(&title, label, VOLTAGE_MIN, VOLTAGE_MAX, default)
        };
        match self {
            Self::Sine => [
                ask("Enter Midpoint Amplitude (0-3):", 1.5),
                ask("Enter Max. Amplitude (0-3):", 3.0),
            ],
            Self::Sawtooth => [
                ask("Enter Start Amplitude (0-3):", 0.0),
                ask("Enter End Amplitude (0-3):", 3.0),
            ],
            Self::Triangle => [
                ask("Enter Min. Amplitude (0-3):", 0.0),
                ask("Enter Max. Amplitude (0-3):", 3.0),
            ],
            Self::Square => [
                ask("Enter Low Amplitude (0-3):", 0.0),
                ask("Enter High Amplitude (0-3):", 3.0),
            ],
        }
    }
}

impl fmt::Display for PresetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sine => write!(f, "Sine"),
            Self::Sawtooth => write!(f, "Sawtooth"),
            Self::Triangle => write!(f, "Triangle"),
            Self::Square => write!(f, "Square"),
        }
    }
}

impl FromStr for PresetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Ok(Self::Sine),
            "sawtooth" | "saw" => Ok(Self::Sawtooth),
            "triangle" | "tri" => Ok(Self::Triangle),
            "square" | "sq" => Ok(Self::Square),
            _ => Err(format!("Unknown preset: {}", s)),
        }
    }
}

/// Fully collected preset parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PresetParams {
    Sine { midpoint: f64, max_amplitude: f64 },
    Sawtooth { start: f64, end: f64 },
    Triangle { min: f64, max: f64 },
    Square { low: f64, high: f64 },
}

impl PresetParams {
    pub fn kind(&self) -> PresetKind {
        match self {
            Self::Sine { .. } => PresetKind::Sine,
            Self::Sawtooth { .. } => PresetKind::Sawtooth,
            Self::Triangle { .. } => PresetKind::Triangle,
            Self::Square { .. } => PresetKind::Square,
        }
    }

    fn from_answers(kind: PresetKind, [a, b]: [f64; 2]) -> Self {
        match kind {
            PresetKind::Sine => Self::Sine {
                midpoint: a,
                max_amplitude: b,
            },
            PresetKind::Sawtooth => Self::Sawtooth { start: a, end: b },
            PresetKind::Triangle => Self::Triangle { min: a, max: b },
            PresetKind::Square => Self::Square { low: a, high: b },
        }
    }

    fn amplitudes(&self) -> [f64; 2] {
        match *self {
            Self::Sine {
                midpoint,
                max_amplitude,
            } => [midpoint, max_amplitude],
            Self::Sawtooth { start, end } => [start, end],
            Self::Triangle { min, max } => [min, max],
            Self::Square { low, high } => [low, high],
        }
    }

    /// Both amplitudes must be inside the output range.
    pub fn validate(&self) -> WaveformResult<()> {
        for value in self.amplitudes() {
            if !value.is_finite() || !(VOLTAGE_MIN..=VOLTAGE_MAX).contains(&value) {
                return Err(WaveformError::validation(
                    "amplitude",
                    format!("{value} is outside {VOLTAGE_MIN}..={VOLTAGE_MAX}"),
                ));
            }
        }
        Ok(())
    }

    fn voltage_at(&self, index: usize, position: f64, resolution: usize) -> f64 {
        match *self {
            Self::Sine {
                midpoint,
                max_amplitude,
            } => {
                let phase = 2.0 * PI * index as f64 / (resolution - 1) as f64;
                midpoint + (max_amplitude - midpoint) * phase.sin()
            }
            Self::Sawtooth { start, end } => {
                start + (end - start) * index as f64 / (resolution - 1) as f64
            }
            Self::Triangle { min, max } => {
                ((position / 50.0 + 1.0).rem_euclid(2.0) - 1.0).abs() * (max - min) + min
            }
            Self::Square { low, high } => {
                if position.rem_euclid(20.0) < 10.0 {
                    low
                } else {
                    high
                }
            }
        }
    }
}

/// Asks every question of `kind` in order. Any cancel aborts with `None`.
///
/// Answers outside the requested bounds count as a cancel.
pub fn collect_preset_params(
    kind: PresetKind,
    prompt: &mut dyn ParameterPrompt,
) -> Option<PresetParams> {
    let [first, second] = kind.questions();
    let a = prompt.ask_float(&first).filter(|v| first.accepts(*v))?;
    let b = prompt.ask_float(&second).filter(|v| second.accepts(*v))?;
    debug!("Collected {} preset parameters ({}, {})", kind, a, b);
    Some(PresetParams::from_answers(kind, [a, b]))
}

/// Builds the preset waveform with `resolution` evenly spaced points.
///
/// Voltages are clamped into the output range; the first and last points sit
/// exactly on 0 and 100.
pub fn generate(params: &PresetParams, resolution: usize) -> WaveformResult<PointSet> {
    params.validate()?;
    if resolution < 2 {
        return Err(WaveformError::validation(
            "resolution",
            format!("{resolution} is below the minimum of 2"),
        ));
    }

    let points = linspace_positions(resolution)
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            let y = params.voltage_at(i, x, resolution);
            ControlPoint::new(x, y.clamp(VOLTAGE_MIN, VOLTAGE_MAX))
        })
        .collect();

    let set = PointSet::from_points(points)?;
    info!(
        "Generated {} preset with {} points",
        params.kind(),
        set.len()
    );
    Ok(set)
}
