//! Unit newtypes for market quantities.
//!
//! Capacities, demands and line limits are carried as [`Megawatts`] so a
//! quantity can never be confused with a price or a voltage. Prices stay plain
//! `f64` (currency per MWh) because they are the output of the clearing engine
//! and flow straight into result maps.
//!
//! ```
//! use gridclear_core::units::Megawatts;
//!
//! let base = Megawatts(100.0);
//! let scaled = base * 0.6;
//! assert_eq!(scaled.value(), 60.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Declares an `f64` quantity newtype with same-unit arithmetic, scaling by a
/// plain factor, and a `"{:.2} unit"` display.
macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, $symbol:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(pub f64);

        impl $name {
            pub const ZERO: Self = Self(0.0);

            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, factor: f64) -> Self {
                Self(self.0 * factor)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, quantity: $name) -> $name {
                $name(self * quantity.0)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, divisor: f64) -> Self {
                Self(self.0 / divisor)
            }
        }

        /// Ratio of two quantities in the same unit
        impl Div for $name {
            type Output = f64;
            fn div(self, rhs: Self) -> f64 {
                self.0 / rhs.0
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, Add::add)
            }
        }

        impl<'a> Sum<&'a $name> for $name {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                iter.copied().sum()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2} {}", self.0, $symbol)
            }
        }
    };
}

quantity!(
    /// Active power in megawatts
    ///
    /// Generator limits, load demand, bid segment breakpoints and line
    /// transfer limits.
    Megawatts,
    "MW"
);

quantity!(
    /// Nominal voltage in kilovolts
    Kilovolts,
    "kV"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_a_capacity() {
        let wind = Megawatts(150.0);
        assert_eq!((wind * 0.4).value(), 60.0);
        assert_eq!((0.8 * wind).value(), 120.0);
        assert_eq!(wind / Megawatts(50.0), 3.0);
        assert_eq!((wind - Megawatts(200.0)).max(Megawatts::ZERO), Megawatts::ZERO);
        assert_eq!(-(wind / 3.0), Megawatts(-50.0));
    }

    #[test]
    fn summing_node_demand() {
        let loads = [Megawatts(180.0), Megawatts(250.0), Megawatts(120.0)];
        let by_ref: Megawatts = loads.iter().sum();
        let by_value: Megawatts = loads.into_iter().sum();
        assert_eq!(by_ref, Megawatts(550.0));
        assert_eq!(by_value, by_ref);
        assert_eq!(Vec::<Megawatts>::new().iter().sum::<Megawatts>(), Megawatts::ZERO);
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(Megawatts(72.0).to_string(), "72.00 MW");
        assert_eq!(Kilovolts(500.0).to_string(), "500.00 kV");
        assert_eq!(serde_json::to_string(&Megawatts(42.5)).unwrap(), "42.5");
        let back: Kilovolts = serde_json::from_str("220.0").unwrap();
        assert_eq!(back, Kilovolts(220.0));
    }
}
