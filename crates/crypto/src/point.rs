//! A generic point on the short Weierstrass curve `y² = x³ + a·x + b` over
//! some [`FieldElement`]'s prime field. `None` coordinates mean the point at
//! infinity (the group identity).

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::Error;
use crate::field::FieldElement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub coords: Option<(FieldElement, FieldElement)>,
    pub a: FieldElement,
    pub b: FieldElement,
}

impl Point {
    pub fn new(x: FieldElement, y: FieldElement, a: FieldElement, b: FieldElement) -> Result<Self, Error> {
        let lhs = y.mul(&y)?;
        let rhs = x.mul(&x)?.mul(&x)?.add(&a.mul(&x)?)?.add(&b)?;
        if lhs != rhs {
            return Err(Error::NotOnCurve {
                x: x.num.to_string(),
                y: y.num.to_string(),
            });
        }
        Ok(Point { coords: Some((x, y)), a, b })
    }

    pub fn infinity(a: FieldElement, b: FieldElement) -> Self {
        Point { coords: None, a, b }
    }

    pub fn is_infinity(&self) -> bool {
        self.coords.is_none()
    }

    fn same_curve(&self, other: &Point) -> Result<(), Error> {
        if self.a != other.a || self.b != other.b {
            return Err(Error::DomainMismatch);
        }
        Ok(())
    }

    pub fn add(&self, other: &Point) -> Result<Point, Error> {
        self.same_curve(other)?;
        let (Some((x1, y1)), Some((x2, y2))) = (&self.coords, &other.coords) else {
            return Ok(if self.is_infinity() { other.clone() } else { self.clone() });
        };

        if x1 == x2 && y1 != y2 {
            return Ok(Point::infinity(self.a.clone(), self.b.clone()));
        }

        let s = if x1 == x2 && y1 == y2 {
            if y1.is_zero() {
                return Ok(Point::infinity(self.a.clone(), self.b.clone()));
            }
            let three_x1_sq = x1.mul(x1)?.scale(&BigUint::from(3u32));
            let numerator = three_x1_sq.add(&self.a)?;
            let denominator = y1.scale(&BigUint::from(2u32));
            numerator.div(&denominator)?
        } else {
            let numerator = y2.sub(y1)?;
            let denominator = x2.sub(x1)?;
            numerator.div(&denominator)?
        };

        let x3 = s.mul(&s)?.sub(x1)?.sub(x2)?;
        let y3 = s.mul(&x1.sub(&x3)?)?.sub(y1)?;
        Point::new(x3, y3, self.a.clone(), self.b.clone())
    }

    /// Double-and-add scalar multiplication, LSB first.
    pub fn scalar_mul(&self, coefficient: &BigUint) -> Point {
        let mut coef = coefficient.clone();
        let mut current = self.clone();
        let mut result = Point::infinity(self.a.clone(), self.b.clone());
        let one = BigUint::from(1u32);
        while !coef.is_zero() {
            if &coef & &one == one {
                result = result.add(&current).expect("points on the same curve always combine");
            }
            current = current.add(&current).expect("doubling a point on its own curve always succeeds");
            coef >>= 1;
        }
        result
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.coords {
            None => write!(f, "Point(Infinity)"),
            Some((x, y)) => write!(f, "Point({}, {})_{}_{}", x.num, y.num, self.a.num, self.b.num),
        }
    }
}
