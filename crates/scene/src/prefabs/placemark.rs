use foundation::math::Geodetic;

use crate::object::{Movable, SceneObject};

/// A named point marker on the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct Placemark {
    pub name: String,
    position: Option<Geodetic>,
    move_count: u32,
}

impl Placemark {
    pub fn new(name: impl Into<String>, position: Geodetic) -> Self {
        Self {
            name: name.into(),
            position: Some(position),
            move_count: 0,
        }
    }

    /// A placemark that has not been positioned yet.
    pub fn unplaced(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            move_count: 0,
        }
    }

    pub fn position(&self) -> Option<Geodetic> {
        self.position
    }

    /// Number of `move_to` calls received so far.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }
}

impl Movable for Placemark {
    fn reference_position(&self) -> Option<Geodetic> {
        self.position
    }

    fn move_to(&mut self, position: Geodetic) {
        self.position = Some(position);
        self.move_count += 1;
    }
}

impl SceneObject for Placemark {
    fn as_movable(&mut self) -> Option<&mut dyn Movable> {
        Some(self)
    }
}
