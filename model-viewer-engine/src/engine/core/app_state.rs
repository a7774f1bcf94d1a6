use bevy::prelude::*;

/// Whether a viewer is open. Entering `Running` builds the stage; leaving it
/// releases everything the stage owned.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum ViewerLoop {
    #[default]
    Stopped,
    Running,
}

/// Queue a transition only when the loop is not already where it should be.
pub fn transition_viewer_loop(
    current: &State<ViewerLoop>,
    next_state: &mut NextState<ViewerLoop>,
    target: ViewerLoop,
) {
    if *current.get() == target {
        return;
    }
    match target {
        ViewerLoop::Running => info!("→ Viewer opened, transitioning to Running state"),
        ViewerLoop::Stopped => info!("→ Viewer closed, transitioning to Stopped state"),
    }
    next_state.set(target);
}

/// Leave and re-enter `Running` so a viewer reopened within one frame still
/// releases the old stage and builds a new one.
pub fn restart_viewer_loop(next_state: &mut NextState<ViewerLoop>) {
    info!("→ Viewer reopened, re-entering Running state");
    next_state.set(ViewerLoop::Running);
}
