/// Display entity orientation as a quaternion, in the `(x, y, z, w)`
/// component order the rendering layer expects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Builds the orientation matching a view direction given as yaw and
    /// pitch degrees. Roll is always zero.
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        let half_yaw = f64::from(yaw).to_radians() * 0.5;
        let half_pitch = f64::from(pitch).to_radians() * 0.5;

        let (sin_yaw, cos_yaw) = half_yaw.sin_cos();
        let (sin_pitch, cos_pitch) = half_pitch.sin_cos();

        Rotation {
            x: (cos_yaw * sin_pitch) as f32,
            y: (sin_yaw * cos_pitch) as f32,
            z: (-sin_yaw * sin_pitch) as f32,
            w: (cos_yaw * cos_pitch) as f32,
        }
    }
}

#[cfg(test)]
mod test {
    use super::Rotation;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn zero_angles_give_identity() {
        let rotation = Rotation::from_yaw_pitch(0.0, 0.0);
        assert_eq!(rotation, Rotation::IDENTITY);
    }

    #[test]
    fn yaw_only_rotates_about_y() {
        let rotation = Rotation::from_yaw_pitch(90.0, 0.0);
        assert_close(rotation.x, 0.0);
        assert_close(rotation.y, std::f32::consts::FRAC_1_SQRT_2);
        assert_close(rotation.z, 0.0);
        assert_close(rotation.w, std::f32::consts::FRAC_1_SQRT_2);
    }

    #[test]
    fn pitch_only_rotates_about_x() {
        let rotation = Rotation::from_yaw_pitch(0.0, 90.0);
        assert_close(rotation.x, std::f32::consts::FRAC_1_SQRT_2);
        assert_close(rotation.y, 0.0);
        assert_close(rotation.z, 0.0);
        assert_close(rotation.w, std::f32::consts::FRAC_1_SQRT_2);
    }

    #[test]
    fn combined_angles_mix_components() {
        let rotation = Rotation::from_yaw_pitch(90.0, 45.0);
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let (sin, cos) = (22.5f32.to_radians().sin(), 22.5f32.to_radians().cos());
        assert_close(rotation.x, half * sin);
        assert_close(rotation.y, half * cos);
        assert_close(rotation.z, -half * sin);
        assert_close(rotation.w, half * cos);
    }
}
