//! Point-in-time snapshots of compositor views.
//!
//! The compositor exposes its views and outputs through [`InfoView`] and [`InfoOutput`];
//! [`translate`] turns one view into a self-contained [`ViewInfo`] record that is sent over
//! the wire and carries no reference back to the live view.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use smithay::utils::{Logical, Point, Rectangle, Size};

/// Role of a view as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewRole {
    /// Regular application window.
    Toplevel,
    /// Override-redirect or otherwise unmanaged surface.
    Unmanaged,
    /// Panels, backgrounds, docks and the like.
    DesktopEnvironment,
    Unknown,
}

impl ViewRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewRole::Toplevel => "TOPLEVEL",
            ViewRole::Unmanaged => "UNMANAGED",
            ViewRole::DesktopEnvironment => "DESKTOP_ENVIRONMENT",
            ViewRole::Unknown => "UNKNOWN",
        }
    }

    /// Whether `view_info_list` reports views with this role.
    pub fn is_listed(&self) -> bool {
        matches!(self, ViewRole::Toplevel | ViewRole::DesktopEnvironment)
    }
}

impl fmt::Display for ViewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewRole {
    type Err = std::convert::Infallible;

    /// Parses a wire role string. Anything unrecognized is [`ViewRole::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "TOPLEVEL" => ViewRole::Toplevel,
            "UNMANAGED" => ViewRole::Unmanaged,
            "DESKTOP_ENVIRONMENT" => ViewRole::DesktopEnvironment,
            _ => ViewRole::Unknown,
        })
    }
}

/// Workspace grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceCoords {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<Rectangle<i32, Logical>> for ViewGeometry {
    fn from(rect: Rectangle<i32, Logical>) -> Self {
        Self {
            x: rect.loc.x,
            y: rect.loc.y,
            width: rect.size.w,
            height: rect.size.h,
        }
    }
}

/// Snapshot of one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewInfo {
    pub view_id: u32,
    /// Process owning the view's surface, 0 if unknown.
    pub owner_pid: i32,
    pub workspace: WorkspaceCoords,
    pub app_id: String,
    pub title: String,
    pub role: ViewRole,
    pub geometry: ViewGeometry,
    pub is_xwayland: bool,
    pub is_focused: bool,
    pub output_name: String,
    pub output_id: u32,
}

/// Extra data available for surfaces bridged through Xwayland.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XwaylandRecord {
    /// Pid recorded by the X11 window, if the window advertised one.
    pub pid: Option<u32>,
}

/// A display output as seen by the view information protocol.
pub trait InfoOutput {
    /// Stable numeric id of the output.
    fn id(&self) -> u32;

    /// Connector name, e.g. `DP-1`.
    fn name(&self) -> String;

    /// Logical size of the output, which is also the size of one workspace cell.
    fn size(&self) -> Size<i32, Logical>;

    /// Currently shown cell of the output's workspace grid.
    fn current_workspace(&self) -> Point<i32, Logical>;

    /// Id of the view that is active on this output.
    fn active_view_id(&self) -> Option<u32>;
}

/// A compositor view as seen by the view information protocol.
pub trait InfoView {
    type Output: InfoOutput;

    fn id(&self) -> u32;

    /// Output the view is on. Views without an output are never reported.
    fn output(&self) -> Option<Self::Output>;

    fn role(&self) -> ViewRole;

    fn app_id(&self) -> String;

    fn title(&self) -> String;

    /// Bounding geometry in output-local coordinates, with view transforms applied.
    fn bounding_box(&self) -> Rectangle<i32, Logical>;

    /// Pending window geometry, for views that have a toplevel representation.
    fn toplevel_geometry(&self) -> Option<Rectangle<i32, Logical>>;

    /// Xwayland-specific data, for views backed by an X11 window.
    fn xwayland(&self) -> Option<XwaylandRecord>;

    /// Pid from the credentials of the view's Wayland client.
    fn client_pid(&self) -> Option<i32>;
}

/// Translates a view into its wire record.
///
/// Returns `None` if there is no view or the view has no output.
pub fn translate<V: InfoView>(view: Option<&V>) -> Option<ViewInfo> {
    let view = view?;
    let output = view.output()?;

    let xwayland = view.xwayland();
    let owner_pid = match xwayland {
        Some(record) => record
            .pid
            .and_then(|pid| i32::try_from(pid).ok())
            .unwrap_or(0),
        None => view.client_pid().unwrap_or(0),
    };

    let view_id = view.id();

    Some(ViewInfo {
        view_id,
        owner_pid,
        workspace: workspace_of(
            view.bounding_box(),
            output.size(),
            output.current_workspace(),
        ),
        app_id: view.app_id(),
        title: view.title(),
        role: view.role(),
        geometry: view
            .toplevel_geometry()
            .map(ViewGeometry::from)
            .unwrap_or_default(),
        is_xwayland: xwayland.is_some(),
        is_focused: output.active_view_id() == Some(view_id),
        output_name: output.name(),
        output_id: output.id(),
    })
}

/// Returns the workspace cell containing the center of `bbox`.
///
/// Uses the center rather than the origin so that a view straddling a workspace boundary
/// belongs to the cell that shows most of it.
pub fn workspace_of(
    bbox: Rectangle<i32, Logical>,
    output_size: Size<i32, Logical>,
    current: Point<i32, Logical>,
) -> WorkspaceCoords {
    fn axis(loc: i32, len: i32, cell: i32, current: i32) -> i32 {
        if cell <= 0 {
            return current;
        }

        let center = f64::from(loc) + f64::from(len) / 2.;
        let offset = (center / f64::from(cell)).floor();
        current.saturating_add(offset as i32)
    }

    WorkspaceCoords {
        x: axis(bbox.loc.x, bbox.size.w, output_size.w, current.x),
        y: axis(bbox.loc.y, bbox.size.h, output_size.h, current.y),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Clone)]
    struct TestOutput {
        size: (i32, i32),
        workspace: (i32, i32),
        active: Option<u32>,
    }

    impl InfoOutput for TestOutput {
        fn id(&self) -> u32 {
            7
        }

        fn name(&self) -> String {
            String::from("HDMI-A-1")
        }

        fn size(&self) -> Size<i32, Logical> {
            Size::from(self.size)
        }

        fn current_workspace(&self) -> Point<i32, Logical> {
            Point::from(self.workspace)
        }

        fn active_view_id(&self) -> Option<u32> {
            self.active
        }
    }

    struct TestView {
        id: u32,
        output: Option<TestOutput>,
        role: ViewRole,
        bbox: Rectangle<i32, Logical>,
        toplevel: Option<Rectangle<i32, Logical>>,
        xwayland: Option<XwaylandRecord>,
        client_pid: Option<i32>,
    }

    impl TestView {
        fn new(id: u32) -> Self {
            Self {
                id,
                output: Some(TestOutput {
                    size: (1920, 1080),
                    workspace: (0, 0),
                    active: None,
                }),
                role: ViewRole::Toplevel,
                bbox: Rectangle::new(Point::from((100, 100)), Size::from((800, 600))),
                toplevel: Some(Rectangle::new(Point::from((100, 100)), Size::from((800, 600)))),
                xwayland: None,
                client_pid: Some(4242),
            }
        }
    }

    impl InfoView for TestView {
        type Output = TestOutput;

        fn id(&self) -> u32 {
            self.id
        }

        fn output(&self) -> Option<TestOutput> {
            self.output.clone()
        }

        fn role(&self) -> ViewRole {
            self.role
        }

        fn app_id(&self) -> String {
            String::from("foot")
        }

        fn title(&self) -> String {
            String::from("~")
        }

        fn bounding_box(&self) -> Rectangle<i32, Logical> {
            self.bbox
        }

        fn toplevel_geometry(&self) -> Option<Rectangle<i32, Logical>> {
            self.toplevel
        }

        fn xwayland(&self) -> Option<XwaylandRecord> {
            self.xwayland
        }

        fn client_pid(&self) -> Option<i32> {
            self.client_pid
        }
    }

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
        Rectangle::new(Point::from((x, y)), Size::from((w, h)))
    }

    #[test]
    fn no_view_translates_to_nothing() {
        assert_eq!(translate::<TestView>(None), None);
    }

    #[test]
    fn view_without_output_translates_to_nothing() {
        let mut view = TestView::new(1);
        view.output = None;
        assert_eq!(translate(Some(&view)), None);
    }

    #[test]
    fn full_translation() {
        let info = translate(Some(&TestView::new(3))).unwrap();
        assert_eq!(
            info,
            ViewInfo {
                view_id: 3,
                owner_pid: 4242,
                workspace: WorkspaceCoords { x: 0, y: 0 },
                app_id: String::from("foot"),
                title: String::from("~"),
                role: ViewRole::Toplevel,
                geometry: ViewGeometry {
                    x: 100,
                    y: 100,
                    width: 800,
                    height: 600,
                },
                is_xwayland: false,
                is_focused: false,
                output_name: String::from("HDMI-A-1"),
                output_id: 7,
            }
        );
    }

    #[test]
    fn center_on_second_column_maps_to_next_workspace() {
        // Centered at (2880, 540).
        let ws = workspace_of(
            rect(2480, 240, 800, 600),
            Size::from((1920, 1080)),
            Point::from((0, 0)),
        );
        assert_eq!(ws, WorkspaceCoords { x: 1, y: 0 });
    }

    #[test]
    fn straddling_view_uses_center_not_origin() {
        // Origin on workspace 0, but most of the view is on workspace 1.
        let ws = workspace_of(
            rect(1800, 0, 1000, 500),
            Size::from((1920, 1080)),
            Point::from((0, 0)),
        );
        assert_eq!(ws, WorkspaceCoords { x: 1, y: 0 });
    }

    #[test]
    fn negative_offsets_floor_towards_previous_workspace() {
        let ws = workspace_of(
            rect(-1000, -600, 200, 200),
            Size::from((1920, 1080)),
            Point::from((2, 2)),
        );
        assert_eq!(ws, WorkspaceCoords { x: 1, y: 1 });
    }

    #[test]
    fn degenerate_output_keeps_current_workspace() {
        let ws = workspace_of(rect(5000, 5000, 10, 10), Size::from((0, 0)), Point::from((3, 1)));
        assert_eq!(ws, WorkspaceCoords { x: 3, y: 1 });
    }

    #[test]
    fn workspace_is_relative_to_current() {
        let mut view = TestView::new(1);
        view.output.as_mut().unwrap().workspace = (2, 1);
        view.bbox = rect(2480, 240, 800, 600);
        let info = translate(Some(&view)).unwrap();
        assert_eq!(info.workspace, WorkspaceCoords { x: 3, y: 1 });
    }

    #[test]
    fn missing_toplevel_reports_zero_geometry() {
        let mut view = TestView::new(1);
        view.toplevel = None;
        let info = translate(Some(&view)).unwrap();
        assert_eq!(info.geometry, ViewGeometry::default());
    }

    #[test]
    fn xwayland_pid_wins_over_client_credentials() {
        let mut view = TestView::new(1);
        view.xwayland = Some(XwaylandRecord { pid: Some(77) });
        let info = translate(Some(&view)).unwrap();
        assert_eq!(info.owner_pid, 77);
        assert!(info.is_xwayland);
    }

    #[test]
    fn xwayland_without_pid_reports_zero() {
        let mut view = TestView::new(1);
        view.xwayland = Some(XwaylandRecord { pid: None });
        let info = translate(Some(&view)).unwrap();
        assert_eq!(info.owner_pid, 0);
        assert!(info.is_xwayland);
    }

    #[test]
    fn missing_credentials_report_zero() {
        let mut view = TestView::new(1);
        view.client_pid = None;
        assert_eq!(translate(Some(&view)).unwrap().owner_pid, 0);
    }

    #[test]
    fn focus_compares_against_output_active_view() {
        let mut view = TestView::new(5);
        view.output.as_mut().unwrap().active = Some(5);
        assert!(translate(Some(&view)).unwrap().is_focused);

        view.output.as_mut().unwrap().active = Some(6);
        assert!(!translate(Some(&view)).unwrap().is_focused);
    }

    #[test]
    fn role_strings_round_trip() {
        for role in [
            ViewRole::Toplevel,
            ViewRole::Unmanaged,
            ViewRole::DesktopEnvironment,
            ViewRole::Unknown,
        ] {
            assert_eq!(role.as_str().parse::<ViewRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_strings_parse_to_unknown() {
        assert_eq!("toplevel".parse::<ViewRole>().unwrap(), ViewRole::Unknown);
        assert_eq!("".parse::<ViewRole>().unwrap(), ViewRole::Unknown);
        assert_eq!("X-OR".parse::<ViewRole>().unwrap(), ViewRole::Unknown);
    }

    #[test]
    fn only_toplevel_and_desktop_environment_are_listed() {
        assert!(ViewRole::Toplevel.is_listed());
        assert!(ViewRole::DesktopEnvironment.is_listed());
        assert!(!ViewRole::Unmanaged.is_listed());
        assert!(!ViewRole::Unknown.is_listed());
    }

    proptest! {
        #[test]
        fn center_inside_cell_maps_to_that_cell(
            cell_x in -4i32..4,
            cell_y in -4i32..4,
            frac_x in 0i32..1920,
            frac_y in 0i32..1080,
            current_x in -2i32..3,
            current_y in -2i32..3,
        ) {
            // Zero-sized box so the center is exactly the origin.
            let loc = (cell_x * 1920 + frac_x, cell_y * 1080 + frac_y);
            let ws = workspace_of(
                rect(loc.0, loc.1, 0, 0),
                Size::from((1920, 1080)),
                Point::from((current_x, current_y)),
            );
            prop_assert_eq!(ws, WorkspaceCoords { x: current_x + cell_x, y: current_y + cell_y });
        }

        #[test]
        fn role_is_always_a_wire_string(s in ".*") {
            let role = s.parse::<ViewRole>().unwrap();
            prop_assert!(
                ["TOPLEVEL", "UNMANAGED", "DESKTOP_ENVIRONMENT", "UNKNOWN"].contains(&role.as_str())
            );
        }
    }
}
