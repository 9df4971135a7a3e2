// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use nalgebra::Point3;

/// Corners of a `width` × `depth` rectangle centered on the origin at z = 0.
///
/// Counter-clockwise from the (-x, -y) corner; the fifth point repeats the
/// first so consecutive pairs give the four wall segments.
pub fn generate_points(width: f64, depth: f64) -> [Point3<f64>; 5] {
    let dx = width / 2.0;
    let dy = depth / 2.0;
    [
        Point3::new(-dx, -dy, 0.0),
        Point3::new(dx, -dy, 0.0),
        Point3::new(dx, dy, 0.0),
        Point3::new(-dx, dy, 0.0),
        Point3::new(-dx, -dy, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn loop_is_closed() {
        let points = generate_points(32.8, 16.4);
        assert_eq!(points[0], points[4]);
    }

    #[test]
    fn sides_alternate_width_and_depth() {
        let (width, depth) = (32.8, 16.4);
        let points = generate_points(width, depth);
        let sides: Vec<f64> = points.windows(2).map(|p| (p[1] - p[0]).norm()).collect();
        assert_relative_eq!(sides[0], width);
        assert_relative_eq!(sides[1], depth);
        assert_relative_eq!(sides[2], width);
        assert_relative_eq!(sides[3], depth);
    }

    #[test]
    fn centered_on_origin() {
        let points = generate_points(10.0, 4.0);
        let sum = points[..4]
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
        assert_relative_eq!(sum.norm(), 0.0);
        assert!(points.iter().all(|p| p.z == 0.0));
        assert_eq!(points[0], Point3::new(-5.0, -2.0, 0.0));
        assert_eq!(points[2], Point3::new(5.0, 2.0, 0.0));
    }
}
