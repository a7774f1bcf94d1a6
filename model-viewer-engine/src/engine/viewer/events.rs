use bevy::prelude::*;

/// Requests from the host, the keyboard or the window, applied in arrival order.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    Open {
        display_name: String,
        reference: Option<String>,
    },
    Close,
    SetLocalOverride {
        path: String,
    },
    ClearLocalOverride,
}
