use interaction::{DragConfig, DragController};
use serde::Serialize;
use tracing::{debug, info};

use crate::scenario::{GeoDeg, Scenario, ScenarioError};

/// Outcome of one replayed event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayStep {
    pub index: usize,
    pub action: &'static str,
    pub consumed: bool,
    pub dragging: bool,
    /// Placemark position after the event.
    pub position: Option<GeoDeg>,
}

/// Feeds every scenario event to a fresh [`DragController`] and records where
/// the placemark ends up after each one.
pub fn replay(scenario: &Scenario, config: DragConfig) -> Result<Vec<ReplayStep>, ScenarioError> {
    let window = scenario.build_window()?;
    let mut controller = DragController::with_config(&window, config)?;
    let mut placemark = scenario.placemark.to_placemark();
    info!(
        placemark = %placemark.name,
        events = scenario.events.len(),
        terrain = scenario.terrain.is_some(),
        "replaying gesture"
    );

    let mut steps = Vec::with_capacity(scenario.events.len());
    for (index, gesture) in scenario.events.iter().enumerate() {
        let consumed = {
            let mut event = gesture.to_select_event(&mut placemark);
            controller.on_event(&mut event)?;
            event.is_consumed()
        };
        steps.push(ReplayStep {
            index,
            action: gesture.name(),
            consumed,
            dragging: controller.is_dragging(),
            position: placemark.position().map(GeoDeg::from),
        });
    }

    debug!(moves = placemark.move_count(), "replay finished");
    Ok(steps)
}
