use crate::math::vector3::Vector3;

/// A point in a named world, with an optional facing.
///
/// The record form is `world,x,y,z,yaw,pitch`; the two angles may be
/// omitted, in which case they default to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub world: String,
    pub position: Vector3<f64>,
    pub yaw: f32,
    pub pitch: f32,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Location {
            world: world.into(),
            position: Vector3::new(x, y, z),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Returns a copy shifted by the given deltas, keeping world and facing.
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Location {
        let mut moved = self.clone();
        moved.position = moved.position.add(&Vector3::new(dx, dy, dz));
        moved
    }

    pub fn parse(input: &str) -> Option<Self> {
        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        if parts.len() != 4 && parts.len() != 6 {
            return None;
        }
        if parts[0].is_empty() {
            return None;
        }
        let mut location = Location::new(
            parts[0],
            parts[1].parse().ok()?,
            parts[2].parse().ok()?,
            parts[3].parse().ok()?,
        );
        if parts.len() == 6 {
            location.yaw = parts[4].parse().ok()?;
            location.pitch = parts[5].parse().ok()?;
        }
        Some(location)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.world, self.position.x, self.position.y, self.position.z, self.yaw, self.pitch
        )
    }
}
