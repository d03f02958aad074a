use scene::{SceneObject, ScreenPoint};

/// What the selection pipeline observed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SelectAction {
    Rollover,
    Hover,
    LeftPress,
    LeftClick,
    RightClick,
    /// Pointer moved with a button held; the first one of a gesture starts it.
    Drag,
    DragEnd,
}

/// A selection event as delivered by the input pipeline.
///
/// Handlers that act on an event call `consume` so later handlers can skip it.
pub struct SelectEvent<'a> {
    action: SelectAction,
    pick_point: Option<ScreenPoint>,
    previous_pick_point: Option<ScreenPoint>,
    top_object: Option<&'a mut dyn SceneObject>,
    consumed: bool,
}

impl<'a> SelectEvent<'a> {
    pub fn new(action: SelectAction) -> Self {
        Self {
            action,
            pick_point: None,
            previous_pick_point: None,
            top_object: None,
            consumed: false,
        }
    }

    /// A drag step from `previous` to `pick` over `top_object`.
    pub fn drag(
        pick: ScreenPoint,
        previous: ScreenPoint,
        top_object: Option<&'a mut dyn SceneObject>,
    ) -> Self {
        Self {
            pick_point: Some(pick),
            previous_pick_point: Some(previous),
            top_object,
            ..Self::new(SelectAction::Drag)
        }
    }

    pub fn drag_end() -> Self {
        Self::new(SelectAction::DragEnd)
    }

    pub fn with_pick_point(mut self, point: ScreenPoint) -> Self {
        self.pick_point = Some(point);
        self
    }

    pub fn with_previous_pick_point(mut self, point: ScreenPoint) -> Self {
        self.previous_pick_point = Some(point);
        self
    }

    pub fn with_top_object(mut self, object: &'a mut dyn SceneObject) -> Self {
        self.top_object = Some(object);
        self
    }

    pub fn action(&self) -> SelectAction {
        self.action
    }

    pub fn pick_point(&self) -> Option<ScreenPoint> {
        self.pick_point
    }

    pub fn previous_pick_point(&self) -> Option<ScreenPoint> {
        self.previous_pick_point
    }

    pub fn has_top_object(&self) -> bool {
        self.top_object.is_some()
    }

    pub fn top_object_mut(&mut self) -> Option<&mut (dyn SceneObject + 'a)> {
        self.top_object.as_deref_mut()
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

impl std::fmt::Debug for SelectEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectEvent")
            .field("action", &self.action)
            .field("pick_point", &self.pick_point)
            .field("previous_pick_point", &self.previous_pick_point)
            .field("has_top_object", &self.has_top_object())
            .field("consumed", &self.consumed)
            .finish()
    }
}
