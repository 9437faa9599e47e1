//! Line-oriented console front end.
//!
//! Plays the part of the editor UI: it turns typed commands into session
//! operations, answers preset questions from the same input stream, and
//! reprints the point table whenever the session reports a change.

use std::cell::Cell;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::str::FromStr;
use tracing::{info, warn};
use wavekit_core::{
    ClipboardSink, Column, EditSession, EditorSettings, FloatRequest, GridSettings,
    IntegerRequest, ParameterPrompt, PresetKind, SessionEvent, WaveformError, WaveformResult,
};

const HELP: &str = "\
commands:
  add <x> <y>              add a point or move the one at x
  erase <x> <y>            erase points near (x, y)
  select <i> | deselect    select a table row
  delete                   delete the selected point
  smooth                   smooth around the selected point
  set-voltage <i> <v>      type a voltage into row i
  set-position <i> <p>     type a position into row i
  preset <sine|sawtooth|triangle|square>
  resample [n]             rebuild with n evenly spaced points (asks when n is omitted)
  grid <x|y> <interval|on|off> | grid snap <on|off>
  show                     print the table
  export                   print the table text and copy it to the clipboard
  import                   paste table text, ending with a line containing '}'
  clear                    reset to the two default boundary points
  help | quit";

/// Grid axis named by a `grid` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Change requested by a `grid` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridChange {
    Interval(Axis, f64),
    Enabled(Axis, bool),
    Snap(bool),
}

impl GridChange {
    pub fn apply(self, mut grid: GridSettings) -> GridSettings {
        match self {
            Self::Interval(Axis::X, interval) => grid.x_interval = interval,
            Self::Interval(Axis::Y, interval) => grid.y_interval = interval,
            Self::Enabled(Axis::X, on) => grid.x_enabled = on,
            Self::Enabled(Axis::Y, on) => grid.y_enabled = on,
            Self::Snap(on) => grid.snap = on,
        }
        grid
    }
}

/// One parsed console command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Add { x: f64, y: f64 },
    Erase { x: f64, y: f64 },
    Select(usize),
    Deselect,
    Delete,
    Smooth,
    SetVoltage { index: usize, value: f64 },
    SetPosition { index: usize, value: f64 },
    Preset(PresetKind),
    Resample(Option<usize>),
    Grid(GridChange),
    Show,
    Export,
    Import,
    Clear,
    Help,
    Quit,
}

fn arg<T: FromStr>(parts: &[&str], index: usize, name: &str) -> Result<T, String> {
    let raw = parts
        .get(index)
        .ok_or_else(|| format!("{} expects <{}>", parts[0], name))?;
    raw.parse()
        .map_err(|_| format!("'{}' is not a valid {}", raw, name))
}

fn switch(raw: &str) -> Option<bool> {
    match raw {
        "on" | "true" | "yes" => Some(true),
        "off" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn parse_grid(parts: &[&str]) -> Result<GridChange, String> {
    let usage = || "usage: grid <x|y> <interval|on|off> | grid snap <on|off>".to_string();
    let (target, value) = match parts {
        [_, target, value] => (*target, *value),
        _ => return Err(usage()),
    };
    let axis = match target {
        "x" => Axis::X,
        "y" => Axis::Y,
        "snap" => return switch(value).map(GridChange::Snap).ok_or_else(usage),
        _ => return Err(usage()),
    };
    if let Some(on) = switch(value) {
        return Ok(GridChange::Enabled(axis, on));
    }
    value
        .parse()
        .map(|interval| GridChange::Interval(axis, interval))
        .map_err(|_| usage())
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let Some(name) = parts.first() else {
            return Err("empty command".to_string());
        };
        let command = match name.to_lowercase().as_str() {
            "add" => Self::Add {
                x: arg(&parts, 1, "x")?,
                y: arg(&parts, 2, "y")?,
            },
            "erase" => Self::Erase {
                x: arg(&parts, 1, "x")?,
                y: arg(&parts, 2, "y")?,
            },
            "select" => Self::Select(arg(&parts, 1, "row")?),
            "deselect" => Self::Deselect,
            "delete" => Self::Delete,
            "smooth" => Self::Smooth,
            "set-voltage" => Self::SetVoltage {
                index: arg(&parts, 1, "row")?,
                value: arg(&parts, 2, "voltage")?,
            },
            "set-position" => Self::SetPosition {
                index: arg(&parts, 1, "row")?,
                value: arg(&parts, 2, "position")?,
            },
            "preset" => Self::Preset(arg(&parts, 1, "preset")?),
            "resample" if parts.len() > 1 => Self::Resample(Some(arg(&parts, 1, "resolution")?)),
            "resample" => Self::Resample(None),
            "grid" => Self::Grid(parse_grid(&parts)?),
            "show" => Self::Show,
            "export" => Self::Export,
            "import" => Self::Import,
            "clear" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(command)
    }
}

/// Answers [`ParameterPrompt`] questions from a line-based input stream.
///
/// An empty line takes the default, `cancel` (or end of input) cancels, and
/// anything outside the requested bounds is asked again.
pub struct LinePrompt<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> LinePrompt<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, title: &str, label: &str, default: &dyn fmt::Display) -> Option<String> {
        let shown = write!(self.output, "[{}] {} [{}] ", title, label, default)
            .and_then(|_| self.output.flush());
        if let Err(e) = shown {
            warn!("Prompt output failed: {}", e);
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let answer = line.trim();
                if answer.eq_ignore_ascii_case("cancel") {
                    None
                } else if answer.is_empty() {
                    Some(default.to_string())
                } else {
                    Some(answer.to_string())
                }
            }
            Err(e) => {
                warn!("Prompt input failed: {}", e);
                None
            }
        }
    }

    fn retry(&mut self, min: &dyn fmt::Display, max: &dyn fmt::Display) {
        let hint = format!("enter a number between {} and {}, or 'cancel'", min, max);
        if let Err(e) = writeln!(self.output, "{}", hint) {
            warn!("Prompt output failed: {}", e);
        }
    }
}

impl<R: BufRead, W: Write> ParameterPrompt for LinePrompt<'_, R, W> {
    fn ask_float(&mut self, request: &FloatRequest) -> Option<f64> {
        loop {
            let answer = self.ask(&request.title, &request.label, &request.default)?;
            match answer.parse::<f64>() {
                Ok(value) if request.accepts(value) => return Some(value),
                _ => self.retry(&request.min, &request.max),
            }
        }
    }

    fn ask_integer(&mut self, request: &IntegerRequest) -> Option<i64> {
        loop {
            let answer = self.ask(&request.title, &request.label, &request.default)?;
            match answer.parse::<i64>() {
                Ok(value) if request.accepts(value) => return Some(value),
                _ => self.retry(&request.min, &request.max),
            }
        }
    }
}

/// Reads lines until one contains `}` (inclusive) or the input ends.
fn read_block<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut text = String::new();
    loop {
        let read = input.read_line(&mut text)?;
        if read == 0 || text.lines().last().is_some_and(|l| l.contains('}')) {
            return Ok(text);
        }
    }
}

/// The console editor: a session, a clipboard sink and a change flag.
pub struct Console<S> {
    session: EditSession,
    sink: S,
    changed: Rc<Cell<bool>>,
}

impl<S: ClipboardSink> Console<S> {
    pub fn new(settings: EditorSettings, sink: S) -> Self {
        let mut session = EditSession::new(settings);
        let changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&changed);
        session.subscribe(move |event| {
            if matches!(
                event,
                SessionEvent::PointsChanged { .. } | SessionEvent::SelectionChanged(_)
            ) {
                flag.set(true);
            }
        });
        Self {
            session,
            sink,
            changed,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<()> {
        writeln!(output, "WaveKit console, type 'help' for commands")?;
        self.print_table(output)?;

        let mut line = String::new();
        loop {
            write!(output, "> ")?;
            output.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let command = match text.parse::<Command>() {
                Ok(command) => command,
                Err(message) => {
                    writeln!(output, "error: {}", message)?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            if let Err(e) = self.execute(command, input, output)? {
                writeln!(output, "error: {}", e)?;
            }
            if self.changed.replace(false) {
                self.print_table(output)?;
            }
        }
        info!("Console closed");
        Ok(())
    }

    /// Executes one command. The outer result carries I/O failures, the inner
    /// one a rejected edit.
    pub fn execute<R: BufRead, W: Write>(
        &mut self,
        command: Command,
        input: &mut R,
        output: &mut W,
    ) -> io::Result<WaveformResult<()>> {
        let result = match command {
            Command::Add { x, y } => self.session.primary_gesture(x, y).map(|_| ()),
            Command::Erase { x, y } => {
                let removed = self.session.secondary_gesture(x, y);
                writeln!(output, "erased {} point(s)", removed)?;
                Ok(())
            }
            Command::Select(index) => self.session.select(index),
            Command::Deselect => {
                self.session.deselect();
                Ok(())
            }
            Command::Delete => self.session.delete_selected().map(|_| ()),
            Command::Smooth => {
                if !self.session.smooth_selected() {
                    writeln!(output, "select an interior point to smooth")?;
                }
                Ok(())
            }
            Command::SetVoltage { index, value } => {
                self.session.edit_cell(index, Column::Voltage, value)
            }
            Command::SetPosition { index, value } => {
                self.session.edit_cell(index, Column::Position, value)
            }
            Command::Preset(kind) => {
                let applied = {
                    let mut prompt = LinePrompt::new(input, output);
                    self.session.apply_preset(kind, &mut prompt)
                };
                if let Ok(false) = applied {
                    writeln!(output, "{} preset cancelled", kind)?;
                }
                applied.map(|_| ())
            }
            Command::Resample(Some(resolution)) => self.session.resample(resolution),
            Command::Resample(None) => {
                let applied = {
                    let mut prompt = LinePrompt::new(input, output);
                    self.session.resample_with(&mut prompt)
                };
                if let Ok(false) = applied {
                    writeln!(output, "resolution unchanged")?;
                }
                applied.map(|_| ())
            }
            Command::Grid(change) => {
                let grid = change.apply(self.session.settings().grid);
                let result = self.session.set_grid(grid);
                if result.is_ok() {
                    self.print_grid(output)?;
                }
                result
            }
            Command::Show => {
                self.print_table(output)?;
                Ok(())
            }
            Command::Export => self.export(output)?,
            Command::Import => {
                writeln!(output, "paste the table text, ending with '}}':")?;
                let text = read_block(input)?;
                self.session.import_text(&text)
            }
            Command::Clear => {
                self.session.clear();
                Ok(())
            }
            Command::Help => {
                writeln!(output, "{}", HELP)?;
                Ok(())
            }
            Command::Quit => Ok(()),
        };
        Ok(result)
    }

    fn export<W: Write>(&mut self, output: &mut W) -> io::Result<WaveformResult<()>> {
        match self.session.export_to(&mut self.sink) {
            Ok(text) => {
                writeln!(output, "{}", text)?;
                writeln!(output, "(copied to clipboard)")?;
                Ok(Ok(()))
            }
            Err(WaveformError::Clipboard { reason }) => {
                warn!("Clipboard delivery failed: {}", reason);
                let text = match self.session.export_text() {
                    Ok(text) => text,
                    Err(e) => return Ok(Err(e)),
                };
                writeln!(output, "{}", text)?;
                writeln!(output, "(clipboard unavailable: {})", reason)?;
                Ok(Ok(()))
            }
            Err(e) => Ok(Err(e)),
        }
    }

    fn print_table<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let selected = self.session.selection().index();
        writeln!(output, "    # {:>9} {:>8}", "Position", "Voltage")?;
        for (i, row) in self.session.table_rows().iter().enumerate() {
            let marker = if selected == Some(i) { '*' } else { ' ' };
            writeln!(
                output,
                "{} {:>3} {:>9} {:>8}",
                marker, i, row.position, row.voltage
            )?;
        }
        Ok(())
    }

    fn print_grid<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let grid = self.session.settings().grid;
        let state = |on: bool| if on { "on" } else { "off" };
        writeln!(
            output,
            "grid: x {} % ({}), y {} V ({}), snap {}",
            grid.x_interval,
            state(grid.x_enabled),
            grid.y_interval,
            state(grid.y_enabled),
            state(grid.snap)
        )
    }
}
