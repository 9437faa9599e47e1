//! Modal numeric prompt collaborator.
//!
//! The UI implements [`ParameterPrompt`] to ask the user for a bounded number.
//! `None` means the user cancelled.

/// A request for a bounded floating-point value.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatRequest {
    pub title: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl FloatRequest {
    pub fn new(title: &str, label: &str, min: f64, max: f64, default: f64) -> Self {
        Self {
            title: title.to_string(),
            label: label.to_string(),
            min,
            max,
            default,
        }
    }

    /// True when `value` lies inside the requested bounds.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// A request for a bounded integer value.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerRequest {
    pub title: String,
    pub label: String,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl IntegerRequest {
    pub fn new(title: &str, label: &str, min: i64, max: i64, default: i64) -> Self {
        Self {
            title: title.to_string(),
            label: label.to_string(),
            min,
            max,
            default,
        }
    }

    pub fn accepts(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Asks the user for numbers.
pub trait ParameterPrompt {
    /// Returns the entered value, or `None` if the user cancelled.
    fn ask_float(&mut self, request: &FloatRequest) -> Option<f64>;

    /// Returns the entered value, or `None` if the user cancelled.
    fn ask_integer(&mut self, request: &IntegerRequest) -> Option<i64>;
}

/// Replays a fixed list of answers. Runs out as a cancel.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<Option<f64>>,
}

impl ScriptedPrompt {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl ParameterPrompt for ScriptedPrompt {
    fn ask_float(&mut self, _request: &FloatRequest) -> Option<f64> {
        self.answers.pop_front().flatten()
    }

    fn ask_integer(&mut self, _request: &IntegerRequest) -> Option<i64> {
        self.answers.pop_front().flatten().map(|v| v.round() as i64)
    }
}
