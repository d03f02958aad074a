use crate::globe::Globe;
use crate::terrain::Terrain;
use crate::view::View;

/// The viewer surface that interaction handlers bind to.
///
/// Any collaborator may be missing, e.g. before the first frame attaches a
/// camera or while terrain is still loading.
pub trait WorldWindow {
    fn view(&self) -> Option<&dyn View>;

    fn globe(&self) -> Option<&dyn Globe>;

    fn terrain(&self) -> Option<&dyn Terrain>;
}

/// Owns boxed collaborators and exposes them as a `WorldWindow`.
#[derive(Default)]
pub struct SceneWindow {
    view: Option<Box<dyn View>>,
    globe: Option<Box<dyn Globe>>,
    terrain: Option<Box<dyn Terrain>>,
}

impl SceneWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(mut self, view: impl View + 'static) -> Self {
        self.view = Some(Box::new(view));
        self
    }

    pub fn with_globe(mut self, globe: impl Globe + 'static) -> Self {
        self.globe = Some(Box::new(globe));
        self
    }

    pub fn with_terrain(mut self, terrain: impl Terrain + 'static) -> Self {
        self.terrain = Some(Box::new(terrain));
        self
    }
}

impl WorldWindow for SceneWindow {
    fn view(&self) -> Option<&dyn View> {
        self.view.as_deref()
    }

    fn globe(&self) -> Option<&dyn Globe> {
        self.globe.as_deref()
    }

    fn terrain(&self) -> Option<&dyn Terrain> {
        self.terrain.as_deref()
    }
}
