//! Editing session.
//!
//! [`EditSession`] owns the point set, the selection and the editor settings.
//! Every operation runs to completion and then tells the subscribers what
//! changed, so render surfaces and tables redraw from the session instead of
//! keeping their own copy of the state.

use crate::clipboard::ClipboardSink;
use crate::codec::{self, CodecOptions};
use crate::editing::{EditingRules, GridSettings, DEFAULT_ERASE_TOLERANCE};
use crate::error::{WaveformError, WaveformResult};
use crate::interpolator::{self, SampledCurve, DEFAULT_SMOOTH_SAMPLES};
use crate::point::ControlPoint;
use crate::point_set::{PointSet, UpsertPolicy, DEFAULT_BOUNDARY_SNAP};
use crate::presets::{self, PresetKind, PresetParams, DEFAULT_PRESET_RESOLUTION};
use crate::prompt::ParameterPrompt;
use crate::resampler;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Everything the session needs to know about how editing and export behave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    pub grid: GridSettings,
    pub boundary_snap: f64,
    pub erase_tolerance: f64,
    pub smooth_samples: usize,
    pub link_boundaries: bool,
    pub codec: CodecOptions,
    /// Evaluate the curve at this resolution before encoding; `None` encodes
    /// the control points directly.
    pub export_resolution: Option<usize>,
    pub preset_resolution: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            boundary_snap: DEFAULT_BOUNDARY_SNAP,
            erase_tolerance: DEFAULT_ERASE_TOLERANCE,
            smooth_samples: DEFAULT_SMOOTH_SAMPLES,
            link_boundaries: false,
            codec: CodecOptions::default(),
            export_resolution: None,
            preset_resolution: DEFAULT_PRESET_RESOLUTION,
        }
    }
}

impl EditorSettings {
    pub fn rules(&self) -> EditingRules {
        EditingRules::new(
            self.grid,
            UpsertPolicy {
                boundary_snap: self.boundary_snap,
                link_boundaries: self.link_boundaries,
            },
            self.erase_tolerance,
        )
    }
}

/// The selected row, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    index: Option<usize>,
}

impl SelectionState {
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_selected(&self) -> bool {
        self.index.is_some()
    }
}

/// Table column targeted by a cell edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Position,
    Voltage,
}

/// What changed after an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PointsChanged { count: usize },
    SelectionChanged(Option<usize>),
    GridChanged(GridSettings),
    Exported { samples: usize },
    Imported { count: usize },
}

/// Handle returned by [`EditSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Subscriber = Box<dyn FnMut(&SessionEvent)>;

/// What the render surface draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub points: Vec<ControlPoint>,
    pub grid: GridSettings,
    pub selection: Option<usize>,
}

/// One row of the tabular display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub position: String,
    pub voltage: String,
}

/// The single owner of the waveform being edited.
pub struct EditSession {
    points: PointSet,
    selection: SelectionState,
    settings: EditorSettings,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("points", &self.points)
            .field("selection", &self.selection)
            .field("settings", &self.settings)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EditSession {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            points: PointSet::new(),
            selection: SelectionState::default(),
            settings,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Registers a callback run after every completed operation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    /// Add-or-move gesture from the plot.
    pub fn primary_gesture(&mut self, x: f64, y: f64) -> WaveformResult<usize> {
        let before = self.points.len();
        let index = self.settings.rules().primary_gesture(&mut self.points, x, y)?;
        self.after_points_changed(before != self.points.len());
        Ok(index)
    }

    /// Erase gesture from the plot.
    pub fn secondary_gesture(&mut self, x: f64, y: f64) -> usize {
        let removed = self
            .settings
            .rules()
            .secondary_gesture(&mut self.points, x, y);
        if removed > 0 {
            self.after_points_changed(true);
        }
        removed
    }

    /// Selects the table row at `index`.
    pub fn select(&mut self, index: usize) -> WaveformResult<()> {
        if index >= self.points.len() {
            return Err(WaveformError::validation(
                "selection",
                format!("row {index} does not exist"),
            ));
        }
        self.set_selection(Some(index));
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.set_selection(None);
    }

    /// Deletes every point at the selected row's position, then deselects.
    pub fn delete_selected(&mut self) -> WaveformResult<usize> {
        let point = self.selected_point()?;
        let removed = self.points.remove_by_position(point.position)?;
        self.after_points_changed(true);
        Ok(removed)
    }

    /// Smooths around the selected point.
    ///
    /// Returns `false` and changes nothing when no point is selected or the
    /// selection is a boundary point.
    pub fn smooth_selected(&mut self) -> bool {
        let Some(index) = self.selection.index else {
            return false;
        };
        match interpolator::smooth_around_point(
            &mut self.points,
            index,
            self.settings.smooth_samples,
        ) {
            Some(_) => {
                self.after_points_changed(true);
                true
            }
            None => false,
        }
    }

    /// Applies a typed value from the table.
    pub fn edit_cell(&mut self, index: usize, column: Column, value: f64) -> WaveformResult<()> {
        let rules = self.settings.rules();
        match column {
            Column::Voltage => {
                rules.edit_voltage(&mut self.points, index, value)?;
                self.notify(SessionEvent::PointsChanged {
                    count: self.points.len(),
                });
            }
            Column::Position => {
                let selected = self.selected_point().ok();
                let new_index = rules.edit_position(&mut self.points, index, value)?;
                self.notify(SessionEvent::PointsChanged {
                    count: self.points.len(),
                });
                // The selection stays on the same point, wherever the move left it.
                let follow = match self.selection.index {
                    Some(i) if i == index => Some(new_index),
                    _ => selected.and_then(|p| self.points.index_of(p.position)),
                };
                self.set_selection(follow);
            }
        }
        Ok(())
    }

    /// Collects the preset's parameters and replaces the waveform with it.
    ///
    /// Returns `Ok(false)` when the user cancelled; the waveform is untouched.
    pub fn apply_preset(
        &mut self,
        kind: PresetKind,
        prompt: &mut dyn ParameterPrompt,
    ) -> WaveformResult<bool> {
        let Some(params) = presets::collect_preset_params(kind, prompt) else {
            debug!("{} preset cancelled", kind);
            return Ok(false);
        };
        self.apply_preset_params(&params)?;
        Ok(true)
    }

    pub fn apply_preset_params(&mut self, params: &PresetParams) -> WaveformResult<()> {
        self.points = presets::generate(params, self.settings.preset_resolution)?;
        self.after_points_changed(true);
        Ok(())
    }

    /// Rebuilds the waveform with `resolution` evenly spaced points.
    pub fn resample(&mut self, resolution: usize) -> WaveformResult<()> {
        let resolution = self.settings.rules().validate_resolution(resolution)?;
        self.points = resampler::resample(&self.points, resolution)?;
        self.after_points_changed(true);
        Ok(())
    }

    /// Asks for a new resolution and rebuilds the waveform with it.
    ///
    /// Returns `Ok(false)` when the user cancelled.
    pub fn resample_with(&mut self, prompt: &mut dyn ParameterPrompt) -> WaveformResult<bool> {
        let request = self.settings.rules().resolution_request(self.points.len());
        let Some(answer) = prompt.ask_integer(&request) else {
            debug!("Resolution change cancelled");
            return Ok(false);
        };
        let resolution = usize::try_from(answer).map_err(|_| {
            WaveformError::validation("resolution", format!("{answer} is negative"))
        })?;
        self.resample(resolution)?;
        Ok(true)
    }

    pub fn set_grid(&mut self, grid: GridSettings) -> WaveformResult<()> {
        grid.validate()?;
        self.settings.grid = grid;
        self.notify(SessionEvent::GridChanged(grid));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.after_points_changed(true);
    }

    /// The dense curve at `resolution` samples.
    pub fn curve(&self, resolution: usize) -> WaveformResult<SampledCurve> {
        interpolator::evaluate(&self.points, resolution)
    }

    /// Renders the export text for the current waveform.
    pub fn export_text(&mut self) -> WaveformResult<String> {
        let options = &self.settings.codec;
        let (text, samples) = match self.settings.export_resolution {
            Some(resolution) => {
                let curve = interpolator::evaluate(&self.points, resolution)?;
                (codec::encode_curve(&curve, options)?, curve.len())
            }
            None => (codec::encode(&self.points, options)?, self.points.len()),
        };
        self.notify(SessionEvent::Exported { samples });
        Ok(text)
    }

    /// Renders the export text and hands it to `sink`.
    pub fn export_to(&mut self, sink: &mut dyn ClipboardSink) -> WaveformResult<String> {
        let text = self.export_text()?;
        sink.deliver(&text)?;
        info!("Export delivered to clipboard");
        Ok(text)
    }

    /// Replaces the waveform with decoded text. A failed parse changes nothing.
    pub fn import_text(&mut self, text: &str) -> WaveformResult<()> {
        let points = codec::decode(text).inspect_err(|e| warn!("Import rejected: {}", e))?;
        self.points = points;
        let count = self.points.len();
        self.after_points_changed(true);
        self.notify(SessionEvent::Imported { count });
        Ok(())
    }

    pub fn render_model(&self) -> RenderModel {
        RenderModel {
            points: self.points.points().to_vec(),
            grid: self.settings.grid,
            selection: self.selection.index,
        }
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        self.points
            .iter()
            .map(|p| TableRow {
                position: format!("{:.2}", p.position),
                voltage: format!("{:.2}", p.voltage),
            })
            .collect()
    }

    fn selected_point(&self) -> WaveformResult<ControlPoint> {
        self.selection
            .index
            .and_then(|i| self.points.get(i).copied())
            .ok_or_else(|| WaveformError::validation("selection", "no point selected"))
    }

    fn after_points_changed(&mut self, structural: bool) {
        self.notify(SessionEvent::PointsChanged {
            count: self.points.len(),
        });
        if structural && self.selection.is_selected() {
            self.set_selection(None);
        }
    }

    fn set_selection(&mut self, index: Option<usize>) {
        if self.selection.index != index {
            self.selection.index = index;
            self.notify(SessionEvent::SelectionChanged(index));
        }
    }

    fn notify(&mut self, event: SessionEvent) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
    }
}
