#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{Parameters, Settings, ValueRange};

/// A named set of parameter ranges that can be applied to [`Settings`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Preset {
    pub name: String,
    pub frequency: ValueRange,
    pub damping: ValueRange,
    pub response: ValueRange,
    pub time_scale: ValueRange,
}

impl Preset {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        frequency: ValueRange,
        damping: ValueRange,
        response: ValueRange,
        time_scale: ValueRange,
    ) -> Self {
        Self {
            name: name.into(),
            frequency,
            damping,
            response,
            time_scale,
        }
    }

    /// Creates a preset pinned to `params` with a time scale of one.
    #[must_use]
    pub fn from_parameters(name: impl Into<String>, params: Parameters) -> Self {
        Self::new(
            name,
            ValueRange::fixed(params.frequency),
            ValueRange::fixed(params.damping),
            ValueRange::fixed(params.response),
            ValueRange::fixed(1.0),
        )
    }

    /// Captures the current ranges of `settings`.
    #[must_use]
    pub fn from_settings(name: impl Into<String>, settings: &Settings) -> Self {
        Self::new(
            name,
            *settings.frequency(),
            *settings.damping(),
            *settings.response(),
            *settings.time_scale(),
        )
    }

    /// Returns the built-in presets.
    ///
    /// | name | f | ζ | r |
    /// |---|---|---|---|
    /// | snappy | 4 | 0.5 | 2 |
    /// | smooth | 2 | 1 | 0 |
    /// | bouncy | 3 | 0.3 | 1 |
    /// | sluggish | 1 | 1.5 | 0 |
    /// | anticipate | 3 | 0.8 | -0.5 |
    #[must_use]
    pub fn builtin() -> Vec<Preset> {
        [
            ("snappy", 4.0, 0.5, 2.0),
            ("smooth", 2.0, 1.0, 0.0),
            ("bouncy", 3.0, 0.3, 1.0),
            ("sluggish", 1.0, 1.5, 0.0),
            ("anticipate", 3.0, 0.8, -0.5),
        ]
        .into_iter()
        .map(|(name, f, z, r)| Self::from_parameters(name, Parameters::new(f, z, r)))
        .collect()
    }

    /// Looks up a built-in preset by name, ignoring case.
    #[must_use]
    pub fn find(name: &str) -> Option<Preset> {
        Self::builtin()
            .into_iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
    }
}
