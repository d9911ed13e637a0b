//! Window layout: a fixed-height toolbar above the content view.

use winit::dpi::LogicalSize;

/// Height of the toolbar strip in logical pixels.
pub(super) const TOOLBAR_HEIGHT: f64 = 48.0;

/// Toolbar and content rects for a window of `size` (logical pixels).
pub(super) fn split(size: LogicalSize<f64>) -> (wry::Rect, wry::Rect) {
    let toolbar_height = TOOLBAR_HEIGHT.min(size.height.max(0.0));
    let width = size.width.max(0.0);
    let toolbar = logical_rect(0.0, 0.0, width, toolbar_height);
    let content = logical_rect(
        0.0,
        toolbar_height,
        width,
        (size.height - toolbar_height).max(0.0),
    );
    (toolbar, content)
}

fn logical_rect(x: f64, y: f64, width: f64, height: f64) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(x, y)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(width, height)),
    }
}

// =============================================================================
// TESTS
// =============================================================================
