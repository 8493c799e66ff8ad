//! `wf_info_base` protocol implementation.
//!
//! Clients bind the global and ask about views in one of three ways: by picking a view with
//! the pointer, by view id, or for the whole list. Answers are broadcast to every bound
//! client as `view_info` events terminated by `done`.
//!
//! The compositor plugs in through [`WfInfoHandler`], which exposes its outputs and views,
//! per-output grab activation, the cursor, and an idle callback. Use [`delegate_wf_info!`]
//! to route the protocol to [`WfInfoManagerState`].

pub mod grab;
pub mod idle;
pub mod picker;
pub mod registry;


use smithay::input::pointer::CursorImageStatus;
use smithay::reexports::calloop::LoopHandle;
use smithay::reexports::wayland_server::backend::{ClientId, GlobalId};
use smithay::reexports::wayland_server::{
    Client, DataInit, Dispatch, DisplayHandle, GlobalDispatch, New, Resource,
};
use tracing::{debug, info, trace};
use wf_info_config::ViewInfoConfig;

use self::idle::IdleSlot;
use self::picker::Picker;
pub use self::picker::{end_pick, handle_button, start_pick, GrabState, PickState};
use self::registry::ClientRegistry;
pub use self::registry::InfoSink;
use crate::protocols::raw::wf_info::wf_info_base::{Request, WfInfoBase};
use crate::view_info::{translate, InfoOutput, InfoView, ViewInfo};

const VERSION: u32 = 1;

/// View id that `view_info_id` resolves to the active view of the active output.
pub const ACTIVE_VIEW_ID: i32 = -1;

/// Compositor side of the view information protocol.
pub trait WfInfoHandler {
    /// Connection handle that receives broadcasts.
    type Sink: InfoSink;
    type Output: InfoOutput;
    type View: InfoView<Output = Self::Output>;

    fn wf_info_state(&mut self) -> &mut WfInfoManagerState<Self::Sink>;

    /// Currently attached outputs.
    fn outputs(&self) -> Vec<Self::Output>;

    /// Every view the compositor knows about, on all outputs.
    fn views(&self) -> Vec<Self::View>;

    fn view_by_id(&self, id: u32) -> Option<Self::View> {
        self.views().into_iter().find(|view| view.id() == id)
    }

    /// Active view of the active output.
    fn active_view(&self) -> Option<Self::View>;

    /// View currently under the pointer.
    fn view_under_pointer(&self) -> Option<Self::View>;

    /// Claims the named activation slot on `output`.
    ///
    /// Returns `false` if the slot cannot be claimed, for example because another exclusive
    /// client owns the output; the output is then left out of the pick.
    fn activate_grab(&mut self, output: &Self::Output, name: &str) -> bool;

    fn deactivate_grab(&mut self, output: &Self::Output);

    /// Redirects pointer input on `output` to the picker.
    ///
    /// Button events must reach [`handle_button`]; [`grab::PickViewGrab`] does that for a
    /// smithay seat.
    fn grab_input(&mut self, output: &Self::Output);

    /// Stops redirecting pointer input on `output`.
    ///
    /// May be called from inside pointer grab dispatch, so it must not re-enter the seat's
    /// pointer handle. A [`grab::PickViewGrab`] left on the seat removes itself on the next
    /// pointer event.
    fn ungrab_input(&mut self, output: &Self::Output);

    fn set_cursor(&mut self, cursor: CursorImageStatus);

    /// Arranges for [`dispatch_idle`] to run once, on the next idle point of the event loop.
    ///
    /// With calloop this is [`insert_idle_dispatch`].
    fn schedule_idle(&mut self);
}

/// Deferred action, run from the idle callback.
#[derive(Debug, Clone)]
pub enum PendingAction {
    SetCursor(CursorImageStatus),
    /// Reset the cursor and answer the pick with the view under the pointer.
    ResolvePick,
}

pub struct WfInfoGlobalData {
    filter: Box<dyn for<'c> Fn(&'c Client) -> bool + Send + Sync>,
}

pub struct WfInfoManagerState<S = WfInfoBase> {
    clients: ClientRegistry<S>,
    picker: Picker,
    idle: IdleSlot<PendingAction>,
    grab_name: String,
    global: Option<GlobalId>,
    is_active: bool,
}

impl WfInfoManagerState<WfInfoBase> {
    /// Creates the manager and advertises the `wf_info_base` global.
    ///
    /// The global is not created when the config turns the protocol off. Only clients for
    /// which `filter` returns `true` can see the global.
    pub fn new<D, F>(display: &DisplayHandle, config: &ViewInfoConfig, filter: F) -> Self
    where
        D: GlobalDispatch<WfInfoBase, WfInfoGlobalData>,
        D: Dispatch<WfInfoBase, ()>,
        D: 'static,
        F: for<'c> Fn(&'c Client) -> bool + Send + Sync + 'static,
    {
        let mut state = Self::without_global(config);

        if config.off {
            info!("wf_info_base is turned off in the config, not advertising it");
            return state;
        }

        let global_data = WfInfoGlobalData {
            filter: Box::new(filter),
        };
        let global = display.create_global::<D, WfInfoBase, _>(VERSION, global_data);
        state.global = Some(global);

        state
    }
}

impl<S: InfoSink> WfInfoManagerState<S> {
    /// Creates the manager without advertising anything.
    pub fn without_global(config: &ViewInfoConfig) -> Self {
        Self {
            clients: ClientRegistry::new(),
            picker: Picker::new(config.pick_cursor.0),
            idle: IdleSlot::new(),
            grab_name: config.grab_name.0.clone(),
            global: None,
            is_active: true,
        }
    }

    pub fn register_client(&mut self, client: S) {
        self.clients.register(client);
    }

    pub fn unregister_client(&mut self, client: &S) {
        self.clients.unregister(client);
    }

    pub fn clients(&self) -> &ClientRegistry<S> {
        &self.clients
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    pub fn grab_name(&self) -> &str {
        &self.grab_name
    }

    pub fn global(&self) -> Option<&GlobalId> {
        self.global.as_ref()
    }

    /// Whether requests are still answered; `false` after [`shutdown`].
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn has_pending_action(&self) -> bool {
        self.idle.is_pending()
    }

    fn broadcast(&self, info: Option<&ViewInfo>) {
        if let Some(info) = info {
            self.clients.broadcast_info(info);
        }
        self.clients.broadcast_done();
    }
}

/// Starts an interactive pick; the answer is sent once a button is pressed.
pub fn request_pick<D: WfInfoHandler>(state: &mut D) {
    if !state.wf_info_state().is_active {
        debug!("ignoring pick request after shutdown");
        return;
    }

    start_pick(state);
}

/// Answers with the view with the given id, or the active view for [`ACTIVE_VIEW_ID`].
///
/// When no view matches, nothing is sent, not even `done`.
pub fn request_by_id<D: WfInfoHandler>(state: &mut D, id: i32) {
    let _span = tracy_client::span!("wf_info::request_by_id");

    if !state.wf_info_state().is_active {
        debug!("ignoring view info request after shutdown");
        return;
    }

    let view = if id == ACTIVE_VIEW_ID {
        state.active_view()
    } else {
        u32::try_from(id)
            .ok()
            .and_then(|id| state.view_by_id(id))
    };

    let Some(info) = translate(view.as_ref()) else {
        debug!("no view matches id {id}");
        return;
    };

    state.wf_info_state().broadcast(Some(&info));
}

/// Answers with every toplevel and desktop-environment view, then `done`.
pub fn request_all<D: WfInfoHandler>(state: &mut D) {
    let _span = tracy_client::span!("wf_info::request_all");

    if !state.wf_info_state().is_active {
        debug!("ignoring view list request after shutdown");
        return;
    }

    let infos: Vec<ViewInfo> = state
        .views()
        .iter()
        .filter(|view| view.role().is_listed())
        .filter_map(|view| translate(Some(view)))
        .collect();

    trace!("answering view list with {} views", infos.len());

    let protocol_state = state.wf_info_state();
    for info in &infos {
        protocol_state.clients.broadcast_info(info);
    }
    protocol_state.clients.broadcast_done();
}

pub(crate) fn schedule_idle_action<D: WfInfoHandler>(state: &mut D, action: PendingAction) {
    if state.wf_info_state().idle.schedule(action) {
        state.schedule_idle();
    }
}

/// Runs the pending deferred action, if any.
pub fn dispatch_idle<D: WfInfoHandler>(state: &mut D) {
    let Some(action) = state.wf_info_state().idle.take() else {
        return;
    };

    match action {
        PendingAction::SetCursor(cursor) => state.set_cursor(cursor),
        PendingAction::ResolvePick => {
            state.set_cursor(CursorImageStatus::default_named());
            let info = translate(state.view_under_pointer().as_ref());
            state.wf_info_state().broadcast(info.as_ref());
        }
    }
}

/// Schedules [`dispatch_idle`] on a calloop event loop.
pub fn insert_idle_dispatch<D: WfInfoHandler + 'static>(handle: &LoopHandle<'static, D>) {
    handle.insert_idle(dispatch_idle::<D>);
}

/// Stops answering requests.
///
/// Drops any in-flight pick and pending action, restoring the default cursor, and forgets
/// every bound client. Clients waiting for an answer do not get one, and later requests are
/// ignored.
pub fn shutdown<D: WfInfoHandler>(state: &mut D) {
    if state.wf_info_state().picker.is_grabbing() {
        picker::release_grabs(state);
        state.set_cursor(CursorImageStatus::default_named());
    }

    let protocol_state = state.wf_info_state();
    protocol_state.idle.take();
    protocol_state.clients.clear();
    protocol_state.is_active = false;
}

/// Shuts the protocol down and withdraws the global so that no new clients can bind.
///
/// Already bound clients keep their objects, but their requests are ignored.
pub fn deactivate<D>(state: &mut D, display: &DisplayHandle)
where
    D: WfInfoHandler<Sink = WfInfoBase>,
    D: GlobalDispatch<WfInfoBase, WfInfoGlobalData>,
    D: 'static,
{
    shutdown(state);

    if let Some(global) = state.wf_info_state().global.take() {
        info!("withdrawing wf_info_base global");
        display.remove_global::<D>(global);
    }
}

impl InfoSink for WfInfoBase {
    fn send_view_info(&self, info: &ViewInfo) {
        self.view_info(
            info.view_id,
            info.owner_pid,
            info.workspace.x,
            info.workspace.y,
            info.app_id.clone(),
            info.title.clone(),
            info.role.as_str().to_owned(),
            info.geometry.x,
            info.geometry.y,
            info.geometry.width,
            info.geometry.height,
            u32::from(info.is_xwayland),
            u32::from(info.is_focused),
            info.output_name.clone(),
            info.output_id,
        );
    }

    fn send_done(&self) {
        self.done();
    }
}

impl<D> GlobalDispatch<WfInfoBase, WfInfoGlobalData, D> for WfInfoManagerState
where
    D: GlobalDispatch<WfInfoBase, WfInfoGlobalData>,
    D: Dispatch<WfInfoBase, ()>,
    D: WfInfoHandler<Sink = WfInfoBase>,
    D: 'static,
{
    fn bind(
        state: &mut D,
        _handle: &DisplayHandle,
        _client: &Client,
        resource: New<WfInfoBase>,
        _global_data: &WfInfoGlobalData,
        data_init: &mut DataInit<'_, D>,
    ) {
        let manager = data_init.init(resource, ());
        trace!("new wf_info_base client {:?}", manager.id());
        state.wf_info_state().register_client(manager);
    }

    fn can_view(client: Client, global_data: &WfInfoGlobalData) -> bool {
        (global_data.filter)(&client)
    }
}

impl<D> Dispatch<WfInfoBase, (), D> for WfInfoManagerState
where
    D: Dispatch<WfInfoBase, ()>,
    D: WfInfoHandler<Sink = WfInfoBase>,
    D: 'static,
{
    fn request(
        state: &mut D,
        _client: &Client,
        resource: &WfInfoBase,
        request: Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        _data_init: &mut DataInit<'_, D>,
    ) {
        trace!("{:?}: {request:?}", resource.id());

        match request {
            Request::ViewInfo => request_pick(state),
            Request::ViewInfoId { id } => request_by_id(state, id),
            Request::ViewInfoList => request_all(state),
            _ => {}
        }
    }

    fn destroyed(state: &mut D, _client: ClientId, resource: &WfInfoBase, _data: &()) {
        state.wf_info_state().unregister_client(resource);
    }
}

#[macro_export]
macro_rules! delegate_wf_info {
    ($(@<$( $lt:tt $( : $clt:tt $(+ $dlt:tt )* )? ),+>)? $ty: ty) => {
        smithay::reexports::wayland_server::delegate_global_dispatch!($(@< $( $lt $( : $clt $(+ $dlt )* )? ),+ >)? $ty: [
            $crate::protocols::raw::wf_info::wf_info_base::WfInfoBase: $crate::protocols::wf_info::WfInfoGlobalData
        ] => $crate::protocols::wf_info::WfInfoManagerState);
        smithay::reexports::wayland_server::delegate_dispatch!($(@< $( $lt $( : $clt $(+ $dlt )* )? ),+ >)? $ty: [
            $crate::protocols::raw::wf_info::wf_info_base::WfInfoBase: ()
        ] => $crate::protocols::wf_info::WfInfoManagerState);
    };
}
