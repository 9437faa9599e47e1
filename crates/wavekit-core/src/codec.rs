//! Lookup-table text codec.
//!
//! The export artifact is a brace-delimited, comma-separated block of 12-bit
//! hexadecimal entries assigned to an identifier, ten entries per line,
//! always padded with `0x000` out to the table capacity:
//!
//! ```text
//! USER_WAVEFORM = {
//!  0x800, 0xAAA, 0x800, 0x000, 0x000, 0x000, 0x000, 0x000, 0x000, 0x000,
//!  ...
//! }
//! ```
//!
//! Each entry is `round(voltage / 3 * 0xFFF)` clamped to `0x000..=0xFFF`,
//! with halves rounded away from zero (1.5 V encodes to `0x800`).
//!
//! # Decode limitation
//!
//! Padding and a genuine 0 V sample are both `0x000`. Without a sample-count
//! header, decoding stops at the first `0x000` once two samples have been
//! read, so a waveform with a 0 V sample from the third entry on comes back
//! truncated. Enabling [`CodecOptions::sample_count_header`] writes a
//! `// samples: N` line that decode honours instead of the heuristic.

use crate::error::{WaveformError, WaveformResult};
use crate::interpolator::SampledCurve;
use crate::point::{linspace_positions, ControlPoint, VOLTAGE_MAX};
use crate::point_set::PointSet;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{debug, info};

/// Identifier the table is assigned to.
pub const DEFAULT_IDENTIFIER: &str = "USER_WAVEFORM";
/// Number of entries in an exported table.
pub const DEFAULT_CAPACITY: usize = 128;
/// Entries rendered per line.
pub const DEFAULT_ENTRIES_PER_LINE: usize = 10;
/// Largest 12-bit code.
pub const MAX_CODE: u16 = 0xFFF;

const SAMPLE_COUNT_TAG: &str = "samples:";

/// Rendering options for the export text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecOptions {
    /// Name the table is assigned to
    pub identifier: String,
    /// Total number of entries, padding included
    pub capacity: usize,
    /// Entries per rendered line
    pub entries_per_line: usize,
    /// Emit a `// samples: N` line ahead of the block
    pub sample_count_header: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            identifier: DEFAULT_IDENTIFIER.to_string(),
            capacity: DEFAULT_CAPACITY,
            entries_per_line: DEFAULT_ENTRIES_PER_LINE,
            sample_count_header: false,
        }
    }
}

/// A fixed-length table of quantized samples followed by zero padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    entries: Vec<u16>,
    sample_count: usize,
}

impl ExportTable {
    /// Quantizes `voltages` and pads with zeros up to `capacity`.
    pub fn from_voltages<I>(voltages: I, capacity: usize) -> WaveformResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if capacity == 0 {
            return Err(WaveformError::validation("capacity", "must be > 0"));
        }
        let mut entries: Vec<u16> = voltages.into_iter().map(quantize).collect();
        let sample_count = entries.len();
        if sample_count > capacity {
            return Err(WaveformError::validation(
                "capacity",
                format!("{sample_count} samples do not fit in a table of {capacity}"),
            ));
        }
        entries.resize(capacity, 0);
        Ok(Self {
            entries,
            sample_count,
        })
    }

    pub fn entries(&self) -> &[u16] {
        &self.entries
    }

    /// Number of real samples ahead of the padding.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Renders the table as assignment text.
    pub fn render(&self, options: &CodecOptions) -> String {
        let per_line = options.entries_per_line.max(1);
        let mut out = String::new();
        if options.sample_count_header {
            let _ = writeln!(out, "// {} {}", SAMPLE_COUNT_TAG, self.sample_count);
        }
        let _ = writeln!(out, "{} = {{", options.identifier);
        for line in self.entries.chunks(per_line) {
            let row = line
                .iter()
                .map(|code| format_code(*code))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, " {},", row);
        }
        out.push('}');
        out
    }
}

/// Converts a voltage to its 12-bit code.
pub fn quantize(voltage: f64) -> u16 {
    let scaled = (voltage / VOLTAGE_MAX * f64::from(MAX_CODE)).round();
    scaled.clamp(0.0, f64::from(MAX_CODE)) as u16
}

/// Converts a 12-bit code back to a voltage.
pub fn dequantize(code: u16) -> f64 {
    f64::from(code) / f64::from(MAX_CODE) * VOLTAGE_MAX
}

/// `0x` followed by three uppercase hex digits.
pub fn format_code(code: u16) -> String {
    format!("0x{:03X}", code)
}

/// Encodes the control points themselves, one entry per point in order.
pub fn encode(points: &PointSet, options: &CodecOptions) -> WaveformResult<String> {
    let table = ExportTable::from_voltages(points.iter().map(|p| p.voltage), options.capacity)?;
    info!(
        "Encoded {} control points into a {}-entry table",
        table.sample_count(),
        table.capacity()
    );
    Ok(table.render(options))
}

/// Encodes a dense sampled curve, one entry per sample.
pub fn encode_curve(curve: &SampledCurve, options: &CodecOptions) -> WaveformResult<String> {
    let table = ExportTable::from_voltages(curve.voltages(), options.capacity)?;
    info!(
        "Encoded {} curve samples into a {}-entry table",
        table.sample_count(),
        table.capacity()
    );
    Ok(table.render(options))
}

/// Parses export text back into a point set.
///
/// Reads the first `{ ... }` block. Samples are re-spread evenly over
/// [0, 100] in their encoded order. See the module docs for how the end of
/// the samples is found.
pub fn decode(text: &str) -> WaveformResult<PointSet> {
    let open = text
        .find('{')
        .ok_or_else(|| WaveformError::parse("no '{' opening a waveform block"))?;
    let close = text[open..]
        .find('}')
        .map(|offset| open + offset)
        .ok_or_else(|| WaveformError::parse("no '}' closing the waveform block"))?;

    let declared = parse_sample_count(&text[..open])?;
    let codes = text[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_code)
        .collect::<WaveformResult<Vec<u16>>>()?;

    let retained: Vec<u16> = match declared {
        Some(count) => {
            if count > codes.len() {
                return Err(WaveformError::parse(format!(
                    "header declares {count} samples but the block holds {}",
                    codes.len()
                )));
            }
            codes[..count].to_vec()
        }
        None => {
            let mut retained = Vec::with_capacity(codes.len());
            for code in codes {
                if code == 0 && retained.len() >= 2 {
                    break;
                }
                retained.push(code);
            }
            retained
        }
    };

    if retained.len() < 2 {
        return Err(WaveformError::parse(format!(
            "a waveform needs at least 2 samples, found {}",
            retained.len()
        )));
    }

    let points = linspace_positions(retained.len())
        .into_iter()
        .zip(retained.iter())
        .map(|(x, code)| ControlPoint::new(x, dequantize(*code)))
        .collect();
    let set = PointSet::from_points(points)?;
    info!("Decoded waveform with {} samples", set.len());
    Ok(set)
}

fn parse_code(token: &str) -> WaveformResult<u16> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    let code = u16::from_str_radix(digits, 16)
        .map_err(|_| WaveformError::parse(format!("'{token}' is not a hexadecimal entry")))?;
    if code > MAX_CODE {
        return Err(WaveformError::parse(format!(
            "'{token}' exceeds the 12-bit maximum {}",
            format_code(MAX_CODE)
        )));
    }
    Ok(code)
}

fn parse_sample_count(preamble: &str) -> WaveformResult<Option<usize>> {
    for line in preamble.lines() {
        let Some(comment) = line.trim().strip_prefix("//") else {
            continue;
        };
        let Some(value) = comment.trim().strip_prefix(SAMPLE_COUNT_TAG) else {
            continue;
        };
        let count = value.trim().parse::<usize>().map_err(|_| {
            WaveformError::parse(format!("bad sample count '{}'", value.trim()))
        })?;
        debug!("Import text declares {} samples", count);
        return Ok(Some(count));
    }
    Ok(None)
}
