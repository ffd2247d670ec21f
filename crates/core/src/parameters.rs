use uom::si::{
    f32::{Frequency, Ratio},
    frequency::hertz,
    ratio::ratio,
};

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

/// A resolved frequency, damping and response triple.
///
/// - `frequency` (`f`, Hz): how fast the system responds to a target change.
/// - `damping` (`ζ`): `0` oscillates forever, `1` is critically damped,
///   above `1` is overdamped.
/// - `response` (`r`): `0` starts slowly, `1` reacts immediately, above `1`
///   overshoots and below `0` anticipates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Parameters {
    pub frequency: f32,
    pub damping: f32,
    pub response: f32,
}

impl Parameters {
    #[must_use]
    pub fn new(frequency: f32, damping: f32, response: f32) -> Self {
        Self {
            frequency,
            damping,
            response,
        }
    }

    /// Creates parameters from dimensioned quantities.
    ///
    /// ```
    /// use sodyn_core::Parameters;
    /// use uom::si::{f32::{Frequency, Ratio}, frequency::hertz, ratio::ratio};
    ///
    /// let params = Parameters::from_quantities(
    ///     Frequency::new::<hertz>(3.0),
    ///     Ratio::new::<ratio>(1.0),
    ///     Ratio::new::<ratio>(0.0),
    /// );
    /// assert_eq!(params, Parameters::new(3.0, 1.0, 0.0));
    /// ```
    #[must_use]
    pub fn from_quantities(frequency: Frequency, damping: Ratio, response: Ratio) -> Self {
        Self::new(
            frequency.get::<hertz>(),
            damping.get::<ratio>(),
            response.get::<ratio>(),
        )
    }

    /// Returns the natural frequency as a dimensioned quantity.
    #[must_use]
    pub fn frequency_quantity(&self) -> Frequency {
        Frequency::new::<hertz>(self.frequency)
    }

    /// Returns `true` if the system has no stiffness and can never move.
    ///
    /// Every strategy holds the value in place while frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        // Also catches NaN.
        !(self.frequency > 0.0)
    }
}
