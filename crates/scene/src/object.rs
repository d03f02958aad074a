use foundation::math::Geodetic;

/// Capability of scene entities that can be repositioned on the globe.
pub trait Movable {
    /// Anchor position of the entity, if it has one yet.
    fn reference_position(&self) -> Option<Geodetic>;

    fn move_to(&mut self, position: Geodetic);
}

/// An object that picking can report under the cursor.
///
/// Capabilities are discovered through accessors rather than downcasts: an
/// entity that can be dragged overrides `as_movable`.
pub trait SceneObject {
    fn as_movable(&mut self) -> Option<&mut dyn Movable> {
        None
    }
}
