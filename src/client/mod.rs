//! Command-line client for the view information protocol.

use anyhow::Context;
use tracing::{debug, warn};
use wayland_client::protocol::wl_registry;
use wayland_client::{Connection, Dispatch, EventQueue, Proxy, QueueHandle};

use self::protocol::wf_info_base::{self, WfInfoBase};
use crate::cli::Query;
use crate::view_info::{ViewGeometry, ViewInfo, ViewRole, WorkspaceCoords};

pub mod protocol;
pub mod render;

/// Result of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Views(Vec<ViewInfo>),
    /// The compositor does not advertise `wf_info_base`.
    Unavailable,
    /// The global went away before the answer arrived.
    Withdrawn,
}

#[derive(Default)]
struct Collector {
    /// Registry name and bound manager.
    manager: Option<(u32, WfInfoBase)>,
    views: Vec<ViewInfo>,
    done: bool,
    withdrawn: bool,
}

impl Collector {
    fn wait_for_done(&mut self, queue: &mut EventQueue<Self>) -> anyhow::Result<()> {
        while !self.done && !self.withdrawn {
            queue
                .blocking_dispatch(self)
                .context("error dispatching Wayland events")?;
        }
        Ok(())
    }
}

/// Connects to the compositor, sends `query` and collects the answer.
pub fn run(query: &Query) -> anyhow::Result<Answer> {
    let conn = Connection::connect_to_env().context("error connecting to the Wayland display")?;
    run_on(&conn, query)
}

/// Sends `query` over an existing connection and collects the answer.
pub fn run_on(conn: &Connection, query: &Query) -> anyhow::Result<Answer> {
    let mut queue = conn.new_event_queue();
    let qh = queue.handle();
    let _registry = conn.display().get_registry(&qh, ());

    let mut collector = Collector::default();
    queue
        .roundtrip(&mut collector)
        .context("error listing Wayland globals")?;

    let Some((_, manager)) = collector.manager.clone() else {
        return Ok(Answer::Unavailable);
    };

    match query {
        Query::Pick => {
            manager.view_info();
            collector.wait_for_done(&mut queue)?;
        }
        Query::All => {
            manager.view_info_list();
            collector.wait_for_done(&mut queue)?;
        }
        Query::ById(ids) => {
            for id in ids {
                manager.view_info_id(*id);
            }
            // Misses are not answered at all, so a roundtrip is the only way to know that
            // every answer has arrived.
            queue
                .roundtrip(&mut collector)
                .context("error waiting for answers")?;
        }
    }

    if collector.withdrawn {
        return Ok(Answer::Withdrawn);
    }

    let mut views = collector.views;
    if matches!(query, Query::ById(_)) {
        dedup_by_id(&mut views);
    }
    Ok(Answer::Views(views))
}

/// Keeps the first record of every view id, in arrival order.
fn dedup_by_id(views: &mut Vec<ViewInfo>) {
    let mut seen = Vec::with_capacity(views.len());
    views.retain(|info| {
        if seen.contains(&info.view_id) {
            false
        } else {
            seen.push(info.view_id);
            true
        }
    });
}

impl Dispatch<wl_registry::WlRegistry, ()> for Collector {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_registry::Event::Global {
                name,
                interface,
                version,
            } => {
                if interface == WfInfoBase::interface().name {
                    debug!("binding {interface} v{version}");
                    let manager = registry.bind::<WfInfoBase, _, _>(name, 1, qh, ());
                    state.manager = Some((name, manager));
                }
            }
            wl_registry::Event::GlobalRemove { name } => {
                if state.manager.as_ref().is_some_and(|(ours, _)| *ours == name) {
                    warn!("wf_info_base global was removed");
                    state.withdrawn = true;
                }
            }
            _ => (),
        }
    }
}

impl Dispatch<WfInfoBase, ()> for Collector {
    fn event(
        state: &mut Self,
        _: &WfInfoBase,
        event: wf_info_base::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wf_info_base::Event::ViewInfo {
                view_id,
                pid,
                ws_x,
                ws_y,
                app_id,
                title,
                role,
                x,
                y,
                width,
                height,
                xwayland,
                focused,
                output_name,
                output_id,
            } => {
                let role = role.parse().unwrap_or(ViewRole::Unknown);
                state.views.push(ViewInfo {
                    view_id,
                    owner_pid: pid,
                    workspace: WorkspaceCoords { x: ws_x, y: ws_y },
                    app_id,
                    title,
                    role,
                    geometry: ViewGeometry {
                        x,
                        y,
                        width,
                        height,
                    },
                    is_xwayland: xwayland != 0,
                    is_focused: focused != 0,
                    output_name,
                    output_id,
                });
            }
            wf_info_base::Event::Done => state.done = true,
            _ => (),
        }
    }
}
