use foundation::math::{Geodetic, Vec3};
use scene::{Globe, Movable, ScreenPoint, Terrain, View, WorldWindow};
use tracing::{debug, trace};

use crate::config::DragConfig;
use crate::error::DragError;
use crate::event::{SelectAction, SelectEvent};
use crate::resolver::TerrainRayResolver;
use crate::session::DragSession;

/// Gesture phase of a [`DragController`].
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Moves the picked entity so its reference point follows the pointer.
///
/// The entity slides over the terrain (or over a sphere at its starting
/// altitude when terrain cannot answer) and keeps its own elevation.
pub struct DragController<'w> {
    view: &'w dyn View,
    globe: &'w dyn Globe,
    terrain: Option<&'w dyn Terrain>,
    config: DragConfig,
    state: DragState,
}

impl<'w> DragController<'w> {
    pub fn new<W: WorldWindow + ?Sized>(window: &'w W) -> Result<Self, DragError> {
        Self::with_config(window, DragConfig::default())
    }

    pub fn with_config<W: WorldWindow + ?Sized>(
        window: &'w W,
        config: DragConfig,
    ) -> Result<Self, DragError> {
        config.validate()?;
        let view = window
            .view()
            .ok_or(DragError::InvalidArgument("world window has no view"))?;
        let globe = window
            .globe()
            .ok_or(DragError::InvalidArgument("world window has no globe"))?;
        Ok(Self {
            view,
            globe,
            terrain: window.terrain(),
            config,
            state: DragState::Idle,
        })
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Feeds one selection event through the gesture state machine.
    ///
    /// Fails only for a drag event that lacks its pick points. Events the
    /// controller acts on are consumed.
    pub fn on_event(&mut self, event: &mut SelectEvent<'_>) -> Result<(), DragError> {
        match event.action() {
            SelectAction::DragEnd => {
                if let DragState::Dragging(session) = self.state {
                    debug!(
                        cursor_x = session.reference_cursor_point.x,
                        cursor_y = session.reference_cursor_point.y,
                        "drag gesture ended"
                    );
                }
                self.state = DragState::Idle;
                event.consume();
                Ok(())
            }
            SelectAction::Drag => {
                let pick = event
                    .pick_point()
                    .ok_or(DragError::InvalidArgument("drag event has no pick point"))?;
                let previous = event.previous_pick_point().ok_or(
                    DragError::InvalidArgument("drag event has no previous pick point"),
                )?;
                let Some(movable) = event.top_object_mut().and_then(|object| object.as_movable())
                else {
                    return Ok(());
                };
                if self.drag(movable, pick, previous) {
                    event.consume();
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Returns whether the event was handled.
    fn drag(&mut self, movable: &mut dyn Movable, pick: ScreenPoint, previous: ScreenPoint) -> bool {
        let Some(reference) = movable.reference_position() else {
            return false;
        };
        let reference_point = self.reference_point(reference);

        let session = match self.state {
            DragState::Dragging(session) => session,
            DragState::Idle => {
                let Some(session) =
                    DragSession::capture(self.view, self.globe, reference_point, previous)
                else {
                    trace!("entity reference point is off screen; drag not started");
                    return false;
                };
                debug!(
                    lat_deg = reference.lat_deg(),
                    lon_deg = reference.lon_deg(),
                    reference_altitude = session.reference_altitude,
                    "drag gesture started"
                );
                self.state = DragState::Dragging(session);
                session
            }
        };

        let target = session.target_screen_point(pick, self.view.viewport_height());
        let Some(ray) = self.view.ray_from_screen_point(target.x, target.y) else {
            trace!(x = target.x, y = target.y, "no pick ray; frame skipped");
            return true;
        };

        let resolver = TerrainRayResolver::new(self.view, self.globe, self.terrain, self.config);
        match resolver.resolve(&ray, session.reference_altitude) {
            Some(hit) => {
                let elevation = movable
                    .reference_position()
                    .map_or(reference.alt_m, |current| current.alt_m);
                let destination = hit.with_alt(elevation);
                movable.move_to(destination);
                trace!(
                    lat_deg = destination.lat_deg(),
                    lon_deg = destination.lon_deg(),
                    alt_m = destination.alt_m,
                    "entity moved"
                );
            }
            None => trace!(x = target.x, y = target.y, "pick ray missed the globe"),
        }
        true
    }

    /// World point of the entity's reference position, on loaded terrain
    /// when the entity sits below the highest terrain.
    fn reference_point(&self, reference: Geodetic) -> Vec3 {
        self.terrain
            .filter(|_| reference.alt_m < self.globe.max_elevation())
            .and_then(|terrain| terrain.surface_point(reference))
            .unwrap_or_else(|| self.globe.point_from_position(reference))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::{DragController, DragState};
    use crate::config::DragConfig;
    use crate::error::DragError;
    use crate::event::{SelectAction, SelectEvent};
    use foundation::math::{Ellipsoid, Geodetic, Vec2, Vec3};
    use scene::prefabs::Placemark;
    use scene::{
        EllipsoidGlobe, FlatElevation, Globe, Intersection, Movable, PerspectiveView, Ray,
        SceneObject, SceneWindow, ScreenPoint, Terrain, View, WorldWindow,
    };

    const R: f64 = 6_371_000.0;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    /// View with a fixed projection and a fixed pick ray that records every
    /// ray request.
    struct ScriptedView {
        projection: Option<Vec2>,
        ray: Option<Ray>,
        requests: RefCell<Vec<(f64, f64)>>,
    }

    impl ScriptedView {
        fn new() -> Self {
            // Straight down onto (0°, 0°) from far above the terrain.
            let origin = Vec3::new(R + 1_000_000.0, 0.0, 0.0);
            Self {
                projection: Some(Vec2::new(300.5, 200.0)),
                ray: Some(Ray::new(origin, Vec3::new(-1.0, 0.0, 0.0))),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl View for ScriptedView {
        fn project(&self, _point: Vec3) -> Option<Vec2> {
            self.projection
        }

        fn ray_from_screen_point(&self, x: f64, y: f64) -> Option<Ray> {
            self.requests.borrow_mut().push((x, y));
            self.ray
        }

        fn eye_position(&self) -> Geodetic {
            Geodetic::from_degrees(0.0, 0.0, 1_000_000.0)
        }

        fn viewport_height(&self) -> u32 {
            800
        }
    }

    /// Terrain that records `surface_point` queries. `ground` is the loaded
    /// tile's height; `None` means no tile is loaded anywhere.
    struct RecordingTerrain {
        ground: Option<f64>,
        queries: RefCell<Vec<Geodetic>>,
    }

    impl Terrain for RecordingTerrain {
        fn surface_point(&self, position: Geodetic) -> Option<Vec3> {
            self.queries.borrow_mut().push(position);
            let ground = self.ground?;
            Some(Ellipsoid::sphere(R).to_cartesian(position.with_alt(ground + position.alt_m)))
        }

        fn intersect(&self, _ray: &Ray) -> Option<Vec<Intersection>> {
            None
        }
    }

    struct TestWindow {
        view: ScriptedView,
        globe: EllipsoidGlobe<FlatElevation>,
        terrain: Option<RecordingTerrain>,
    }

    impl TestWindow {
        fn new() -> Self {
            Self {
                view: ScriptedView::new(),
                globe: EllipsoidGlobe::new(Ellipsoid::sphere(R), FlatElevation(0.0)),
                terrain: None,
            }
        }

        /// Globe whose terrain tops out at `max_elevation`, with a terrain
        /// adapter answering from `ground`.
        fn with_terrain(max_elevation: f64, ground: Option<f64>) -> Self {
            Self {
                globe: EllipsoidGlobe::new(Ellipsoid::sphere(R), FlatElevation(max_elevation)),
                terrain: Some(RecordingTerrain {
                    ground,
                    queries: RefCell::new(Vec::new()),
                }),
                ..Self::new()
            }
        }

        fn requests(&self) -> Vec<(f64, f64)> {
            self.view.requests.borrow().clone()
        }

        fn terrain_queries(&self) -> Vec<Geodetic> {
            self.terrain
                .as_ref()
                .map(|t| t.queries.borrow().clone())
                .unwrap_or_default()
        }
    }

    impl WorldWindow for TestWindow {
        fn view(&self) -> Option<&dyn View> {
            Some(&self.view)
        }

        fn globe(&self) -> Option<&dyn Globe> {
            Some(&self.globe)
        }

        fn terrain(&self) -> Option<&dyn Terrain> {
            self.terrain.as_ref().map(|t| t as &dyn Terrain)
        }
    }

    /// Pickable but not draggable.
    struct Billboard;

    impl SceneObject for Billboard {}

    fn drag(
        controller: &mut DragController<'_>,
        object: &mut dyn SceneObject,
        previous: (i32, i32),
        pick: (i32, i32),
    ) -> bool {
        let mut ev = SelectEvent::drag(
            ScreenPoint::new(pick.0, pick.1),
            ScreenPoint::new(previous.0, previous.1),
            Some(object),
        );
        controller.on_event(&mut ev).expect("drag event");
        ev.is_consumed()
    }

    fn end(controller: &mut DragController<'_>) -> bool {
        let mut ev = SelectEvent::drag_end();
        controller.on_event(&mut ev).expect("drag end");
        ev.is_consumed()
    }

    #[test]
    fn window_without_view_or_globe_is_rejected() {
        let no_view = SceneWindow::new().with_globe(EllipsoidGlobe::wgs84());
        assert!(matches!(
            DragController::new(&no_view),
            Err(DragError::InvalidArgument(_))
        ));

        let no_globe = SceneWindow::new();
        assert!(matches!(
            DragController::new(&no_globe),
            Err(DragError::InvalidArgument(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let window = TestWindow::new();
        let config = DragConfig {
            precision_m: -1.0,
            ..DragConfig::default()
        };
        assert!(matches!(
            DragController::with_config(&window, config),
            Err(DragError::Config(_))
        ));
    }

    #[test]
    fn drag_end_while_idle_is_a_no_op() {
        let window = TestWindow::new();
        let mut controller = DragController::new(&window).expect("controller");
        assert!(end(&mut controller));
        assert!(end(&mut controller));
        assert_eq!(controller.state(), &DragState::Idle);
        assert!(window.requests().is_empty());
    }

    #[test]
    fn session_is_captured_once_per_gesture() {
        let window = TestWindow::new();
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("pin", Geodetic::from_degrees(0.0, 0.0, 5.0));

        assert!(drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        let first = *controller.session().expect("session");
        assert!(drag(&mut controller, &mut pm, (110, 100), (120, 105)));
        assert_eq!(controller.session(), Some(&first));
        assert_eq!(first.reference_cursor_point, ScreenPoint::new(100, 100));
        assert_close(first.reference_altitude, 5.0, 1e-6);

        // Offsets are measured from the gesture start and flipped once.
        assert_eq!(window.requests(), vec![(310.5, 599.0), (320.5, 604.0)]);
        assert_eq!(pm.move_count(), 2);
    }

    #[test]
    fn drag_keeps_the_current_elevation() {
        let window = TestWindow::new();
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("pin", Geodetic::from_degrees(3.0, 4.0, 5.0));

        drag(&mut controller, &mut pm, (100, 100), (110, 100));
        let moved = pm.position().expect("position");
        assert_eq!(moved.alt_m, 5.0);
        assert_close(moved.lat_deg(), 0.0, 1e-9);
        assert_close(moved.lon_deg(), 0.0, 1e-9);

        // Raised mid-gesture: the next step keeps the new elevation.
        pm.move_to(moved.with_alt(50.0));
        drag(&mut controller, &mut pm, (110, 100), (115, 100));
        assert_eq!(pm.position().map(|p| p.alt_m), Some(50.0));
    }

    #[test]
    fn non_movable_top_object_is_ignored() {
        let window = TestWindow::new();
        let mut controller = DragController::new(&window).expect("controller");
        let mut billboard = Billboard;

        assert!(!drag(&mut controller, &mut billboard, (100, 100), (110, 100)));
        assert!(!controller.is_dragging());

        let mut ev = SelectEvent::drag(ScreenPoint::new(1, 1), ScreenPoint::new(0, 0), None);
        controller.on_event(&mut ev).expect("no top object");
        assert!(!ev.is_consumed());
        assert!(window.requests().is_empty());
    }

    #[test]
    fn unplaced_entity_does_not_start_a_gesture() {
        let window = TestWindow::new();
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::unplaced("draft");

        assert!(!drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        assert!(!controller.is_dragging());
        assert_eq!(pm.move_count(), 0);
    }

    #[test]
    fn malformed_drag_event_is_an_error() {
        let window = TestWindow::new();
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("pin", Geodetic::from_degrees(0.0, 0.0, 5.0));

        let mut ev = SelectEvent::new(SelectAction::Drag)
            .with_pick_point(ScreenPoint::new(10, 10))
            .with_top_object(&mut pm);
        assert!(matches!(
            controller.on_event(&mut ev),
            Err(DragError::InvalidArgument(_))
        ));
        assert!(!ev.is_consumed());
        assert!(!controller.is_dragging());
    }

    #[test]
    fn other_actions_are_ignored() {
        let window = TestWindow::new();
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("pin", Geodetic::from_degrees(0.0, 0.0, 5.0));

        let mut ev = SelectEvent::new(SelectAction::LeftClick)
            .with_pick_point(ScreenPoint::new(10, 10))
            .with_previous_pick_point(ScreenPoint::new(0, 0))
            .with_top_object(&mut pm);
        controller.on_event(&mut ev).expect("click");
        assert!(!ev.is_consumed());
        assert!(!controller.is_dragging());
    }

    #[test]
    fn off_screen_reference_point_leaves_controller_idle() {
        let mut window = TestWindow::new();
        window.view.projection = None;
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("pin", Geodetic::from_degrees(0.0, 0.0, 5.0));

        assert!(!drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        assert!(!controller.is_dragging());
        assert!(window.requests().is_empty());
    }

    #[test]
    fn missing_ray_skips_the_frame_but_keeps_dragging() {
        let mut window = TestWindow::new();
        window.view.ray = None;
        let mut controller = DragController::new(&window).expect("controller");
        let start = Geodetic::from_degrees(0.0, 0.0, 5.0);
        let mut pm = Placemark::new("pin", start);

        assert!(drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        assert!(controller.is_dragging());
        assert_eq!(pm.position(), Some(start));
        assert_eq!(window.requests().len(), 1);
    }

    #[test]
    fn ray_that_misses_keeps_the_gesture_active() {
        let mut window = TestWindow::new();
        let away = Ray::new(Vec3::new(R + 1_000.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        window.view.ray = Some(away);
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("pin", Geodetic::from_degrees(0.0, 0.0, 5.0));

        assert!(drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        assert!(controller.is_dragging());
        assert_eq!(pm.move_count(), 0);
    }

    #[test]
    fn drag_end_then_drag_starts_a_fresh_session() {
        let window = TestWindow::new();
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("pin", Geodetic::from_degrees(0.0, 0.0, 5.0));

        drag(&mut controller, &mut pm, (100, 100), (110, 100));
        assert!(end(&mut controller));
        assert!(!controller.is_dragging());

        drag(&mut controller, &mut pm, (400, 300), (405, 300));
        let session = controller.session().expect("session");
        assert_eq!(session.reference_cursor_point, ScreenPoint::new(400, 300));
        assert_eq!(window.requests()[1], (305.5, 599.0));
    }

    #[test]
    fn entity_above_the_terrain_skips_surface_queries() {
        let window = TestWindow::with_terrain(1_000.0, Some(800.0));
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("beacon", Geodetic::from_degrees(0.0, 0.0, 1_000.0));

        assert!(drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        assert!(window.terrain_queries().is_empty());
        let session = controller.session().expect("session");
        assert_close(session.reference_altitude, 1_000.0, 1e-6);
    }

    #[test]
    fn entity_off_the_loaded_tile_uses_the_globe_point() {
        let window = TestWindow::with_terrain(1_000.0, None);
        let mut controller = DragController::new(&window).expect("controller");
        let start = Geodetic::from_degrees(0.0, 0.0, 5.0);
        let mut pm = Placemark::new("pin", start);

        assert!(drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        assert_eq!(window.terrain_queries(), vec![start]);
        let session = controller.session().expect("session");
        assert_close(session.reference_altitude, 5.0, 1e-6);
    }

    #[test]
    fn entity_on_the_tile_takes_terrain_height_plus_offset() {
        let window = TestWindow::with_terrain(1_000.0, Some(800.0));
        let mut controller = DragController::new(&window).expect("controller");
        let start = Geodetic::from_degrees(0.0, 0.0, 5.0);
        let mut pm = Placemark::new("pin", start);

        assert!(drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        assert_eq!(window.terrain_queries(), vec![start]);
        let session = controller.session().expect("session");
        assert_close(session.reference_altitude, 805.0, 1e-6);
        // The elevation handed back is the entity's own, not the terrain's.
        assert_eq!(pm.position().map(|p| p.alt_m), Some(5.0));
    }

    #[test]
    fn placemark_follows_pointer_east_on_wgs84() {
        let ellipsoid = Ellipsoid::WGS84;
        let view = PerspectiveView::look_at(
            &ellipsoid,
            Geodetic::from_degrees(10.0, 20.0, 100_000.0),
            Geodetic::from_degrees(10.0, 20.0, 0.0),
            45.0,
            1200,
            800,
        )
        .expect("view");
        let window = SceneWindow::new()
            .with_view(view)
            .with_globe(EllipsoidGlobe::new(ellipsoid, FlatElevation(0.0)));
        let mut controller = DragController::new(&window).expect("controller");
        let mut pm = Placemark::new("pin", Geodetic::from_degrees(10.0, 20.0, 5.0));

        assert!(drag(&mut controller, &mut pm, (100, 100), (110, 100)));
        let moved = pm.position().expect("position");
        assert_eq!(moved.alt_m, 5.0);
        assert_close(moved.lat_deg(), 10.0, 1e-3);
        assert!(
            moved.lon_deg() > 20.005 && moved.lon_deg() < 20.015,
            "lon {}",
            moved.lon_deg()
        );

        // Back to the starting pointer location: back to the start.
        drag(&mut controller, &mut pm, (110, 100), (100, 100));
        let back = pm.position().expect("position");
        assert_close(back.lat_deg(), 10.0, 1e-4);
        assert_close(back.lon_deg(), 20.0, 1e-4);
    }
}
