use rand::Rng;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// A bounded scalar window used to configure one dynamics parameter.
///
/// A `ValueRange` holds a current `[minimum, maximum]` window and a separate
/// hard `[minimum_limit, maximum_limit]` envelope. The window always lies
/// within the envelope:
///
/// ```text
/// minimum_limit <= minimum <= maximum <= maximum_limit
/// ```
///
/// # Clamping contract
///
/// Setters never fail. A value written outside the envelope is clamped into
/// it, and writing a minimum above the maximum (or the reverse) drags the
/// other end along. Callers that never inspect the result still end up with
/// a valid range.
///
/// # Limit ownership
///
/// Ranges built with [`ValueRange::new`] do not own their limits: the limits
/// are the current values and [`set_minimum_limit`](Self::set_minimum_limit)
/// and [`set_maximum_limit`](Self::set_maximum_limit) are no-ops. Ranges built
/// with [`ValueRange::with_limits`], or after
/// [`enable_limit_editing`](Self::enable_limit_editing), own their limits and
/// allow editing them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct ValueRange {
    minimum: f32,
    maximum: f32,
    minimum_limit: f32,
    maximum_limit: f32,
    owns_limits: bool,
    force_fixed: bool,
}

impl Default for ValueRange {
    /// An unset range: zero everywhere, no owned limits.
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl ValueRange {
    /// Creates a range whose limits are its current values.
    ///
    /// Inverted bounds are swapped.
    #[must_use]
    pub fn new(minimum: f32, maximum: f32) -> Self {
        let (minimum, maximum) = ordered(minimum, maximum);
        Self {
            minimum,
            maximum,
            minimum_limit: minimum,
            maximum_limit: maximum,
            owns_limits: false,
            force_fixed: false,
        }
    }

    /// Creates a collapsed range holding a single value.
    #[must_use]
    pub fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Creates a range with owned, editable limits.
    ///
    /// Inverted limits are swapped, then the window is clamped into them.
    #[must_use]
    pub fn with_limits(minimum: f32, maximum: f32, minimum_limit: f32, maximum_limit: f32) -> Self {
        let (minimum_limit, maximum_limit) = ordered(minimum_limit, maximum_limit);
        let mut range = Self {
            minimum: minimum_limit,
            maximum: maximum_limit,
            minimum_limit,
            maximum_limit,
            owns_limits: true,
            force_fixed: false,
        };
        let (minimum, maximum) = ordered(minimum, maximum);
        range.set_minimum(minimum);
        range.set_maximum(maximum);
        range
    }

    /// Returns the lower end of the current window.
    #[must_use]
    pub fn minimum(&self) -> f32 {
        self.minimum
    }

    /// Returns the upper end of the current window.
    #[must_use]
    pub fn maximum(&self) -> f32 {
        self.maximum
    }

    /// Returns the centre of the current window.
    #[must_use]
    pub fn midpoint(&self) -> f32 {
        f32::midpoint(self.minimum, self.maximum)
    }

    /// Returns a value drawn uniformly from the current window.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.minimum >= self.maximum {
            return self.minimum;
        }
        rng.random_range(self.minimum..=self.maximum)
    }

    /// Pins the range to a single value and returns it.
    ///
    /// The window collapses onto its minimum and stays collapsed until
    /// [`clear_force_fixed`](Self::clear_force_fixed) is called.
    pub fn force_fixed(&mut self) -> f32 {
        self.force_fixed = true;
        self.maximum = self.minimum;
        self.minimum
    }

    /// Returns `true` if the range is pinned to a single value.
    #[must_use]
    pub fn is_force_fixed(&self) -> bool {
        self.force_fixed
    }

    /// Releases a pinned range. The window stays where it is.
    pub fn clear_force_fixed(&mut self) {
        self.force_fixed = false;
    }

    /// Sets the lower end of the window, clamped into the limits.
    pub fn set_minimum(&mut self, value: f32) {
        let value = clamp(value, self.minimum_limit, self.maximum_limit);
        self.minimum = value;
        if self.force_fixed || self.maximum < value {
            self.maximum = value;
        }
    }

    /// Sets the upper end of the window, clamped into the limits.
    pub fn set_maximum(&mut self, value: f32) {
        let value = clamp(value, self.minimum_limit, self.maximum_limit);
        self.maximum = value;
        if self.force_fixed || self.minimum > value {
            self.minimum = value;
        }
    }

    /// Collapses the window onto a single value, clamped into the limits.
    pub fn set_value(&mut self, value: f32) {
        let value = clamp(value, self.minimum_limit, self.maximum_limit);
        self.minimum = value;
        self.maximum = value;
    }

    /// Copies another range's window into this one, clamped into the limits.
    pub fn set_window(&mut self, other: &ValueRange) {
        if self.force_fixed {
            self.set_value(other.minimum);
        } else {
            self.set_minimum(other.minimum);
            self.set_maximum(other.maximum);
        }
    }

    #[must_use]
    pub fn minimum_limit(&self) -> f32 {
        self.minimum_limit
    }

    #[must_use]
    pub fn maximum_limit(&self) -> f32 {
        self.maximum_limit
    }

    /// Returns `true` if the limits may be edited.
    #[must_use]
    pub fn owns_limits(&self) -> bool {
        self.owns_limits
    }

    /// Allows subsequent limit edits.
    pub fn enable_limit_editing(&mut self) {
        self.owns_limits = true;
    }

    /// Sets the lower limit. No-op unless the range owns its limits.
    ///
    /// The limit never rises above the upper limit, and the window is
    /// re-clamped afterwards.
    pub fn set_minimum_limit(&mut self, value: f32) {
        if !self.owns_limits || value.is_nan() {
            return;
        }
        self.minimum_limit = value.min(self.maximum_limit);
        self.reclamp();
    }

    /// Sets the upper limit. No-op unless the range owns its limits.
    ///
    /// The limit never drops below the lower limit, and the window is
    /// re-clamped afterwards.
    pub fn set_maximum_limit(&mut self, value: f32) {
        if !self.owns_limits || value.is_nan() {
            return;
        }
        self.maximum_limit = value.max(self.minimum_limit);
        self.reclamp();
    }

    /// Returns `true` if the range owns finite, non-degenerate limits.
    #[must_use]
    pub fn has_valid_limits(&self) -> bool {
        self.owns_limits
            && self.minimum_limit.is_finite()
            && self.maximum_limit.is_finite()
            && self.minimum_limit < self.maximum_limit
    }

    /// Replaces invalid limits with `defaults` and re-clamps the window.
    ///
    /// Returns `true` if anything was repaired. Non-finite window values are
    /// moved onto the nearest limit.
    pub fn repair(&mut self, defaults: [f32; 2]) -> bool {
        let mut repaired = false;

        if !self.has_valid_limits() {
            let [minimum_limit, maximum_limit] = defaults;
            self.minimum_limit = minimum_limit;
            self.maximum_limit = maximum_limit;
            self.owns_limits = true;
            repaired = true;
        }

        if !self.minimum.is_finite() {
            self.minimum = self.minimum_limit;
            repaired = true;
        }
        if !self.maximum.is_finite() {
            self.maximum = self.maximum_limit;
            repaired = true;
        }

        let before = (self.minimum, self.maximum);
        self.reclamp();
        repaired || before != (self.minimum, self.maximum)
    }

    fn reclamp(&mut self) {
        self.minimum = clamp(self.minimum, self.minimum_limit, self.maximum_limit);
        self.maximum = clamp(self.maximum, self.minimum, self.maximum_limit);
        if self.force_fixed {
            self.maximum = self.minimum;
        }
    }
}

/// Clamps without panicking on NaN; a NaN value lands on `lo`.
fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a > b { (b, a) } else { (a, b) }
}
