// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded curves used as element locations and roof profiles.

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};

/// Shortest curve the document accepts, in internal units (about 0.8 mm).
pub const SHORT_CURVE_TOLERANCE: f64 = 0.002_604_166_7;

/// Distance under which two points are considered coincident.
pub const POINT_TOLERANCE: f64 = 1e-9;

/// A bounded straight line between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    start: Point3<f64>,
    end: Point3<f64>,
}

impl Line {
    /// Creates a bounded line.
    ///
    /// Returns [`Error::CurveTooShort`] if the endpoints are closer than
    /// [`SHORT_CURVE_TOLERANCE`].
    pub fn create_bound(start: Point3<f64>, end: Point3<f64>) -> Result<Self> {
        let length = (end - start).norm();
        if !length.is_finite() || length < SHORT_CURVE_TOLERANCE {
            return Err(Error::CurveTooShort(length));
        }
        Ok(Self { start, end })
    }

    /// Returns endpoint 0 (start) or 1 (end). Any other index yields the end.
    pub fn end_point(&self, index: usize) -> Point3<f64> {
        if index == 0 {
            self.start
        } else {
            self.end
        }
    }

    pub fn start(&self) -> Point3<f64> {
        self.start
    }

    pub fn end(&self) -> Point3<f64> {
        self.end
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Midpoint of the segment.
    pub fn midpoint(&self) -> Point3<f64> {
        Point3::from((self.start.coords + self.end.coords) / 2.0)
    }

    /// Unit direction from start to end.
    pub fn direction(&self) -> Vector3<f64> {
        (self.end - self.start).normalize()
    }

    /// Shortest distance from `point` to the bounded segment.
    pub fn distance_to_point(&self, point: &Point3<f64>) -> f64 {
        let seg = self.end - self.start;
        let t = ((point - self.start).dot(&seg) / seg.norm_squared()).clamp(0.0, 1.0);
        let closest = self.start + seg * t;
        (point - closest).norm()
    }
}

/// Checks that consecutive lines share endpoints (end of `i` equals start of
/// `i + 1`). Returns the index of the first break.
pub fn check_chain(lines: &[Line]) -> std::result::Result<(), usize> {
    for (i, pair) in lines.windows(2).enumerate() {
        if (pair[0].end - pair[1].start).norm() > POINT_TOLERANCE {
            return Err(i);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn line_length_and_midpoint() {
        let line = Line::create_bound(Point3::new(-2.0, -1.0, 0.0), Point3::new(2.0, -1.0, 0.0))
            .unwrap();
        assert_relative_eq!(line.length(), 4.0);
        assert_eq!(line.midpoint(), Point3::new(0.0, -1.0, 0.0));
        assert_eq!(line.direction(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(line.end_point(0), line.start());
        assert_eq!(line.end_point(1), line.end());
    }

    #[test]
    fn degenerate_line_rejected() {
        let p = Point3::new(1.0, 1.0, 0.0);
        assert!(matches!(Line::create_bound(p, p), Err(Error::CurveTooShort(_))));
        let q = Point3::new(1.0 + SHORT_CURVE_TOLERANCE / 2.0, 1.0, 0.0);
        assert!(Line::create_bound(p, q).is_err());
    }

    #[test]
    fn distance_to_point_clamps_to_segment() {
        let line = Line::create_bound(Point3::origin(), Point3::new(10.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(line.distance_to_point(&Point3::new(5.0, 3.0, 0.0)), 3.0);
        assert_relative_eq!(line.distance_to_point(&Point3::new(13.0, 4.0, 0.0)), 5.0);
        assert_relative_eq!(line.distance_to_point(&Point3::new(4.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn chain_detection() {
        let a = Point3::origin();
        let b = Point3::new(0.0, 1.0, 1.0);
        let c = Point3::new(0.0, 2.0, 0.0);
        let connected = [Line::create_bound(a, b).unwrap(), Line::create_bound(b, c).unwrap()];
        assert!(check_chain(&connected).is_ok());

        let broken = [Line::create_bound(a, b).unwrap(), Line::create_bound(c, a).unwrap()];
        assert_eq!(check_chain(&broken), Err(0));
    }
}
