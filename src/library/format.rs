//! Plain-text rendering of item views.

use crate::domain::ItemView;

/// Render views as `Field: value` lines, one block per item, blocks
/// separated by a blank line.
pub fn render_views(views: &[ItemView]) -> String {
    views
        .iter()
        .map(render_view)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_view(view: &ItemView) -> String {
    view.iter()
        .map(|(field, value)| format!("{}: {}\n", field, value))
        .collect()
}
