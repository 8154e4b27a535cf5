use kurbo::{Affine, Point};

const FULL_TURN_DEGREES: f64 = 360.0;

/// Rotation of the whole composition by `angle` radians about `center`.
pub fn rotation_about(angle: f64, center: Point) -> Affine {
    let c = center.to_vec2();
    Affine::translate(c) * Affine::rotate(angle) * Affine::translate(-c)
}

/// Maps a point on the displayed (rotated) surface back into the unrotated frame.
pub fn to_unrotated(p: Point, angle: f64, center: Point) -> Point {
    let rel_x = p.x - center.x;
    let rel_y = p.y - center.y;
    let cos = (-angle).cos();
    let sin = (-angle).sin();
    Point::new(
        rel_x * cos - rel_y * sin + center.x,
        rel_x * sin + rel_y * cos + center.y,
    )
}

/// Inverse of [`to_unrotated`].
pub fn to_rotated(p: Point, angle: f64, center: Point) -> Point {
    rotation_about(angle, center) * p
}

/// Angle in degrees folded into `[0, 360)`, with values a hair under 360 snapped to 0.
pub fn normalized_degrees(angle: f64) -> f64 {
    let mut degrees = angle.to_degrees() % FULL_TURN_DEGREES;
    degrees = (degrees + FULL_TURN_DEGREES) % FULL_TURN_DEGREES;
    if FULL_TURN_DEGREES - degrees < 0.0001 {
        degrees = 0.0;
    }
    degrees
}

pub fn rotation_label(angle: f64) -> String {
    format!("Rotation: {:.1}°", normalized_degrees(angle))
}

/// True when the angle is a whole number of turns, judged at one decimal of a degree.
pub fn is_upright(angle: f64) -> bool {
    let degrees = (angle.to_degrees() * 10.0).round() / 10.0;
    let normalized = (degrees % FULL_TURN_DEGREES + FULL_TURN_DEGREES) % FULL_TURN_DEGREES;
    normalized.abs() < 0.1 || (normalized - FULL_TURN_DEGREES).abs() < 0.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn inverse_then_forward_is_identity() {
        let center = Point::new(50.0, 40.0);
        let points = [Point::new(0.0, 0.0), Point::new(13.5, 77.25), Point::new(-20.0, 300.0)];
        for step in -30..=30 {
            let angle = step as f64 * PI / 7.0;
            for p in points {
                let there = to_unrotated(p, angle, center);
                assert!(close(to_rotated(there, angle, center), p), "angle {angle}, point {p:?}");
            }
        }
    }

    #[test]
    fn quarter_turn_maps_corner() {
        let center = Point::new(50.0, 50.0);
        // Displayed at the right-center after a 90° turn, the point came from the top-center.
        let p = to_unrotated(Point::new(100.0, 50.0), PI / 2.0, center);
        assert!(close(p, Point::new(50.0, 0.0)), "{p:?}");
    }

    #[test]
    fn center_is_fixed() {
        let center = Point::new(10.0, 20.0);
        assert!(close(to_unrotated(center, 1.234, center), center));
    }

    #[test]
    fn labels_normalize_into_one_turn() {
        assert_eq!(rotation_label(0.0), "Rotation: 0.0°");
        assert_eq!(rotation_label(-PI / 12.0), "Rotation: 345.0°");
        assert_eq!(rotation_label(PI / 12.0 * 25.0), "Rotation: 15.0°");
        assert_eq!(rotation_label(PI / 12.0 * 24.0), "Rotation: 0.0°");
    }

    #[test]
    fn upright_only_on_whole_turns() {
        assert!(is_upright(0.0));
        assert!(is_upright(2.0 * PI));
        assert!(is_upright(-4.0 * PI));
        assert!(!is_upright(PI / 12.0));
        assert!(!is_upright(PI));
    }
}
