//! Interactive view picking.
//!
//! Picking grabs pointer input on every output that lets us activate our grab slot, shows
//! the pick cursor, and waits for the next button press. The press releases all grabs and
//! schedules resolution of the view under the pointer on the next idle point.

use std::collections::HashMap;

use smithay::backend::input::ButtonState;
use smithay::input::pointer::{CursorIcon, CursorImageStatus};
use tracing::{debug, trace};

use super::{schedule_idle_action, PendingAction, WfInfoHandler};
use crate::view_info::InfoOutput as _;

/// Grab held on one output while picking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrabState {
    pub output_id: u32,
    pub output_name: String,
    pub is_activated: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PickState {
    #[default]
    Idle,
    Grabbing,
}

#[derive(Debug)]
pub struct Picker {
    state: PickState,
    /// Grabs of the current pick, keyed by output id.
    grabs: HashMap<u32, GrabState>,
    cursor: CursorIcon,
}

impl Picker {
    pub fn new(cursor: CursorIcon) -> Self {
        Self {
            state: PickState::Idle,
            grabs: HashMap::new(),
            cursor,
        }
    }

    pub fn state(&self) -> PickState {
        self.state
    }

    pub fn is_grabbing(&self) -> bool {
        self.state == PickState::Grabbing
    }

    /// Cursor shown while picking.
    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn grab(&self, output_id: u32) -> Option<&GrabState> {
        self.grabs.get(&output_id)
    }

    pub fn grab_count(&self) -> usize {
        self.grabs.len()
    }

    fn begin(&mut self, grabs: HashMap<u32, GrabState>) {
        self.grabs = grabs;
        self.state = PickState::Grabbing;
    }

    fn finish(&mut self) {
        self.grabs.clear();
        self.state = PickState::Idle;
    }
}

/// Enters picking mode on every output whose grab slot can be activated.
pub fn start_pick<D: WfInfoHandler>(state: &mut D) {
    let _span = tracy_client::span!("wf_info::start_pick");

    if state.wf_info_state().picker.is_grabbing() {
        debug!("new pick requested while picking, releasing previous grabs");
        release_grabs(state);
    }

    let grab_name = state.wf_info_state().grab_name().to_owned();
    // A grab installed from grab_input() must already see a live pick.
    state.wf_info_state().picker.begin(HashMap::new());

    for output in state.outputs() {
        let output_name = output.name();
        if !state.activate_grab(&output, &grab_name) {
            debug!("could not activate {grab_name} on {output_name}, skipping output");
            continue;
        }

        state.wf_info_state().picker.grabs.insert(
            output.id(),
            GrabState {
                output_id: output.id(),
                output_name,
                is_activated: true,
            },
        );
        state.grab_input(&output);
    }

    let picker = &state.wf_info_state().picker;
    trace!("picking on {} outputs", picker.grab_count());
    let cursor = CursorImageStatus::Named(picker.cursor());
    schedule_idle_action(state, PendingAction::SetCursor(cursor));
}

/// Feeds a pointer button event to the picker.
///
/// Returns `true` if the event ended the pick.
pub fn handle_button<D: WfInfoHandler>(state: &mut D, button_state: ButtonState) -> bool {
    if button_state != ButtonState::Pressed {
        return false;
    }

    if !state.wf_info_state().picker.is_grabbing() {
        return false;
    }

    end_pick(state);
    true
}

/// Releases all grabs and schedules resolution of the view under the pointer.
pub fn end_pick<D: WfInfoHandler>(state: &mut D) {
    let _span = tracy_client::span!("wf_info::end_pick");

    release_grabs(state);
    schedule_idle_action(state, PendingAction::ResolvePick);
}

/// Releases the grabs of the current pick without resolving anything.
///
/// Outputs are enumerated anew so that grabs of outputs which disappeared in the meantime
/// are dropped rather than released.
pub(super) fn release_grabs<D: WfInfoHandler>(state: &mut D) {
    for output in state.outputs() {
        let Some(grab) = state.wf_info_state().picker.grabs.get_mut(&output.id()) else {
            continue;
        };
        if !grab.is_activated {
            continue;
        }
        grab.is_activated = false;

        state.deactivate_grab(&output);
        state.ungrab_input(&output);
    }

    state.wf_info_state().picker.finish();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_starts_idle() {
        let picker = Picker::new(CursorIcon::Crosshair);
        assert_eq!(picker.state(), PickState::Idle);
        assert_eq!(picker.grab_count(), 0);
    }

    #[test]
    fn begin_and_finish() {
        let mut picker = Picker::new(CursorIcon::Crosshair);
        let grabs = HashMap::from([(
            1,
            GrabState {
                output_id: 1,
                output_name: String::from("DP-1"),
                is_activated: true,
            },
        )]);

        picker.begin(grabs);
        assert!(picker.is_grabbing());
        assert!(picker.grab(1).is_some());

        picker.finish();
        assert!(!picker.is_grabbing());
        assert!(picker.grab(1).is_none());
    }
}
