use std::fmt::Write as _;

use anyhow::Context;

use crate::view_info::ViewInfo;

/// Formats views as labelled lines, one block per view.
pub fn text(views: &[ViewInfo]) -> String {
    let mut out = String::new();

    for (idx, info) in views.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }

        let geo = &info.geometry;
        writeln!(out, "View ID: {}", info.view_id).unwrap();
        writeln!(out, "Client PID: {}", info.owner_pid).unwrap();
        writeln!(out, "Workspace: {},{}", info.workspace.x, info.workspace.y).unwrap();
        writeln!(out, "App ID: {}", info.app_id).unwrap();
        writeln!(out, "Title: {}", info.title).unwrap();
        writeln!(out, "Role: {}", info.role).unwrap();
        writeln!(
            out,
            "Geometry: {},{} {}x{}",
            geo.x, geo.y, geo.width, geo.height
        )
        .unwrap();
        writeln!(out, "Xwayland: {}", info.is_xwayland).unwrap();
        writeln!(out, "Focused: {}", info.is_focused).unwrap();
        writeln!(out, "Output: {} ({})", info.output_name, info.output_id).unwrap();
    }

    out
}

/// Formats views as a pretty-printed JSON array.
pub fn json(views: &[ViewInfo]) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(views).context("error serializing views")?;
    out.push('\n');
    Ok(out)
}
