//! Units of length. Everything in the layout engine is ultimately measured in
//! PDF points (1/72 of an inch); the other units exist to make specifying
//! page sizes and margins less error prone.

use derive_more::{Add, AddAssign, Deref, DerefMut, Display, Div, From, Into, Mul, MulAssign, Sub, SubAssign, Sum};

/// A length in PDF points (1/72 of an inch)
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Mul,
    MulAssign,
    Div,
    Sum,
    Deref,
    DerefMut,
    Display,
    From,
    Into,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// A length in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Mul, Display, From)]
#[display("{_0}in")]
pub struct In(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Mul, Display, From)]
#[display("{_0}mm")]
pub struct Mm(pub f32);

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * 72.0)
    }
}

impl From<Mm> for Pt {
    fn from(value: Mm) -> Self {
        Pt(value.0 * 72.0 / 25.4)
    }
}

impl From<Pt> for In {
    fn from(value: Pt) -> Self {
        In(value.0 / 72.0)
    }
}

impl From<Pt> for Mm {
    fn from(value: Pt) -> Self {
        Mm(value.0 * 25.4 / 72.0)
    }
}

impl From<f64> for Pt {
    fn from(value: f64) -> Self {
        Pt(value as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_units() {
        assert_eq!(Pt::from(In(1.0)), Pt(72.0));
        assert!((*Pt::from(Mm(25.4)) - 72.0).abs() < 1e-4);
        assert_eq!(In::from(Pt(36.0)), In(0.5));
    }

    #[test]
    fn arithmetic_stays_in_points() {
        let mut total = Pt(10.0) + Pt(2.5);
        total -= Pt(0.5);
        assert_eq!(total * 2.0_f32, Pt(24.0));
        let sum: Pt = [Pt(1.0), Pt(2.0)].into_iter().sum();
        assert_eq!(sum, Pt(3.0));
    }
}
