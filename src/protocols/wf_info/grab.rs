//! Pointer grab active while picking a view.

use smithay::backend::input::ButtonState;
use smithay::input::pointer::{
    AxisFrame, ButtonEvent, GestureHoldBeginEvent, GestureHoldEndEvent, GesturePinchBeginEvent,
    GesturePinchEndEvent, GesturePinchUpdateEvent, GestureSwipeBeginEvent, GestureSwipeEndEvent,
    GestureSwipeUpdateEvent, GrabStartData as PointerGrabStartData, MotionEvent, PointerGrab,
    PointerInnerHandle, RelativeMotionEvent,
};
use smithay::input::SeatHandler;
use smithay::utils::{Logical, Point};

use super::{handle_button, WfInfoHandler};

/// Keeps pointer input away from clients until a button is pressed, then ends the pick.
///
/// Install it from [`WfInfoHandler::grab_input`]. The grab removes itself on the press. When
/// the pick ends some other way (a new pick, [`shutdown`](super::shutdown)), it removes
/// itself on the next pointer event and passes that event on, so
/// [`WfInfoHandler::ungrab_input`] only has to release compositor-side bookkeeping.
pub struct PickViewGrab<D: SeatHandler> {
    start_data: PointerGrabStartData<D>,
}

impl<D: SeatHandler> PickViewGrab<D> {
    pub fn new(start_data: PointerGrabStartData<D>) -> Self {
        Self { start_data }
    }
}

/// Whether a pick grab outlived its pick.
pub fn is_stale<D: WfInfoHandler>(data: &mut D) -> bool {
    !data.wf_info_state().picker().is_grabbing()
}

impl<D> PointerGrab<D> for PickViewGrab<D>
where
    D: SeatHandler + WfInfoHandler + 'static,
    <D as SeatHandler>::PointerFocus: Send,
{
    fn motion(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        focus: Option<(<D as SeatHandler>::PointerFocus, Point<f64, Logical>)>,
        event: &MotionEvent,
    ) {
        if is_stale(data) {
            handle.unset_grab(self, data, event.serial, event.time, false);
            handle.motion(data, focus, event);
            return;
        }

        handle.motion(data, None, event);
    }

    fn relative_motion(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        _focus: Option<(<D as SeatHandler>::PointerFocus, Point<f64, Logical>)>,
        event: &RelativeMotionEvent,
    ) {
        handle.relative_motion(data, None, event);
    }

    fn button(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &ButtonEvent,
    ) {
        if is_stale(data) {
            handle.unset_grab(self, data, event.serial, event.time, true);
            handle.button(data, event);
            return;
        }

        if event.state != ButtonState::Pressed {
            return;
        }

        handle.unset_grab(self, data, event.serial, event.time, true);
        handle_button(data, event.state);
    }

    fn axis(
        &mut self,
        _data: &mut D,
        _handle: &mut PointerInnerHandle<'_, D>,
        _details: AxisFrame,
    ) {
    }

    fn frame(&mut self, data: &mut D, handle: &mut PointerInnerHandle<'_, D>) {
        handle.frame(data);
    }

    fn gesture_swipe_begin(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &GestureSwipeBeginEvent,
    ) {
        handle.gesture_swipe_begin(data, event);
    }

    fn gesture_swipe_update(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &GestureSwipeUpdateEvent,
    ) {
        handle.gesture_swipe_update(data, event);
    }

    fn gesture_swipe_end(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &GestureSwipeEndEvent,
    ) {
        handle.gesture_swipe_end(data, event);
    }

    fn gesture_pinch_begin(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &GesturePinchBeginEvent,
    ) {
        handle.gesture_pinch_begin(data, event);
    }

    fn gesture_pinch_update(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &GesturePinchUpdateEvent,
    ) {
        handle.gesture_pinch_update(data, event);
    }

    fn gesture_pinch_end(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &GesturePinchEndEvent,
    ) {
        handle.gesture_pinch_end(data, event);
    }

    fn gesture_hold_begin(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &GestureHoldBeginEvent,
    ) {
        handle.gesture_hold_begin(data, event);
    }

    fn gesture_hold_end(
        &mut self,
        data: &mut D,
        handle: &mut PointerInnerHandle<'_, D>,
        event: &GestureHoldEndEvent,
    ) {
        handle.gesture_hold_end(data, event);
    }

    fn start_data(&self) -> &PointerGrabStartData<D> {
        &self.start_data
    }

    fn unset(&mut self, _data: &mut D) {}
}
