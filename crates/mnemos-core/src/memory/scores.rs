use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{MnemosError, MnemosResult};

macro_rules! unit_score {
    ($(#[$meta:meta])* $name:ident, $field:literal, $default:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            pub const DEFAULT: f64 = $default;

            /// Validate a raw value. NaN and anything outside [0.0, 1.0] is rejected.
            pub fn try_new(value: f64) -> MnemosResult<Self> {
                if value.is_nan() || !(0.0..=1.0).contains(&value) {
                    return Err(MnemosError::validation(
                        $field,
                        format!("{value} is outside [0, 1]"),
                    ));
                }
                Ok(Self(value))
            }

            /// Clamp to [0.0, 1.0]. NaN becomes 0.0.
            pub fn clamped(value: f64) -> Self {
                if value.is_nan() {
                    Self(0.0)
                } else {
                    Self(value.clamp(0.0, 1.0))
                }
            }

            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(Self::DEFAULT)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.3}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = MnemosError;
            fn try_from(value: f64) -> MnemosResult<Self> {
                Self::try_new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(s: $name) -> Self {
                s.0
            }
        }
    };
}

unit_score!(
    /// Externally assigned salience in [0.0, 1.0]. Higher importance slows decay.
    Importance,
    "importance",
    0.5
);

unit_score!(
    /// Resistance to decay in [0.0, 1.0], grown by spaced reinforcement.
    Stability,
    "stability",
    0.3
);
