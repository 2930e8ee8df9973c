//! Shared utility functions

use marga_map::Heading;

/// Wrap an angle into [0, 360) degrees
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Shortest signed rotation from `from` to `to`, in (-180, 180] degrees
#[inline]
pub fn angle_difference(to: f32, from: f32) -> f32 {
    let d = wrap_degrees(to - from);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Snap a yaw to the nearest multiple of 90 degrees, in [0, 360).
///
/// Exact midpoints round to the even multiple, so 45° snaps to 0° and 135°
/// snaps to 180°.
#[inline]
pub fn snap_yaw(yaw: f32) -> f32 {
    wrap_degrees((yaw / 90.0).round_ties_even() * 90.0)
}

/// Grid heading the robot faces for a given tracker yaw.
///
/// The tracker's yaw frame has 0° pointing South and 90° East:
/// [315, 45) South, [45, 135) East, [135, 225) North, [225, 315) West.
pub fn heading_from_yaw(yaw: f32) -> Heading {
    let y = wrap_degrees(yaw);
    if !(45.0..315.0).contains(&y) {
        Heading::South
    } else if y < 135.0 {
        Heading::East
    } else if y < 225.0 {
        Heading::North
    } else {
        Heading::West
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_degrees() {
        assert_relative_eq!(wrap_degrees(-90.0), 270.0);
        assert_relative_eq!(wrap_degrees(450.0), 90.0);
        assert_relative_eq!(wrap_degrees(360.0), 0.0);
        assert!(wrap_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_angle_difference_takes_short_way() {
        assert_relative_eq!(angle_difference(10.0, 350.0), 20.0);
        assert_relative_eq!(angle_difference(350.0, 10.0), -20.0);
        assert_relative_eq!(angle_difference(180.0, 0.0), 180.0);
    }

    #[test]
    fn test_snap_yaw_ties_to_even() {
        assert_relative_eq!(snap_yaw(44.0), 0.0);
        assert_relative_eq!(snap_yaw(45.0), 0.0);
        assert_relative_eq!(snap_yaw(46.0), 90.0);
        assert_relative_eq!(snap_yaw(135.0), 180.0);
        assert_relative_eq!(snap_yaw(225.0), 180.0);
        assert_relative_eq!(snap_yaw(315.0), 0.0);
        assert_relative_eq!(snap_yaw(359.0), 0.0);
        assert_relative_eq!(snap_yaw(-80.0), 270.0);
    }

    #[test]
    fn test_heading_from_yaw_sectors() {
        assert_eq!(heading_from_yaw(0.0), Heading::South);
        assert_eq!(heading_from_yaw(314.9), Heading::West);
        assert_eq!(heading_from_yaw(315.0), Heading::South);
        assert_eq!(heading_from_yaw(45.0), Heading::East);
        assert_eq!(heading_from_yaw(135.0), Heading::North);
        assert_eq!(heading_from_yaw(225.0), Heading::West);
        assert_eq!(heading_from_yaw(-100.0), Heading::West);
    }
}
