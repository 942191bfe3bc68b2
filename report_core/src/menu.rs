//! # Menu Positioning
//!
//! Keeps context menus and submenus inside the viewport. The host measures the
//! viewport; everything here is a pure calculation.
//!
//! ## Example
//!
//! ```rust
//! use report_core::menu::compute_menu_offset;
//!
//! // 10 items need 352px; only 300px remain below y=500, so the menu is pinned
//! assert_eq!(compute_menu_offset(500.0, 10, 800.0), 448.0);
//! // plenty of room below y=100
//! assert_eq!(compute_menu_offset(100.0, 2, 800.0), 100.0);
//! ```

use serde::{Deserialize, Serialize};

/// Height of a single menu item in pixels
pub const MENU_ITEM_HEIGHT: f32 = 32.0;

/// Extra vertical space taken by menu padding
pub const MENU_VERTICAL_SPACING: f32 = 32.0;

/// Item metrics used to estimate a menu's rendered height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuMetrics {
    pub item_height: f32,
    pub vertical_spacing: f32,
}

impl Default for MenuMetrics {
    fn default() -> Self {
        MenuMetrics {
            item_height: MENU_ITEM_HEIGHT,
            vertical_spacing: MENU_VERTICAL_SPACING,
        }
    }
}

impl MenuMetrics {
    /// Estimated height of a menu with `item_count` entries
    pub fn menu_height(&self, item_count: usize) -> f32 {
        self.item_height * item_count as f32 + self.vertical_spacing
    }
}

/// Adjusted Y offset for a menu opened at `client_y` with default metrics.
pub fn compute_menu_offset(client_y: f32, item_count: usize, viewport_height: f32) -> f32 {
    compute_menu_offset_with(client_y, item_count, viewport_height, MenuMetrics::default())
}

/// Adjusted Y offset for a menu opened at `client_y`.
///
/// If the space below `client_y` is smaller than the menu, the menu bottom is
/// pinned to the viewport bottom; otherwise `client_y` is returned unchanged.
pub fn compute_menu_offset_with(
    client_y: f32,
    item_count: usize,
    viewport_height: f32,
    metrics: MenuMetrics,
) -> f32 {
    let menu_height = metrics.menu_height(item_count);
    if viewport_height - client_y < menu_height {
        viewport_height - menu_height
    } else {
        client_y
    }
}

/// Live viewport height: the larger of the document and window heights.
pub fn viewport_height(document_client_height: f32, window_inner_height: f32) -> f32 {
    document_client_height.max(window_inner_height).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_pinned_to_bottom() {
        assert_eq!(compute_menu_offset(500.0, 10, 800.0), 448.0);
    }

    #[test]
    fn test_menu_keeps_click_position() {
        assert_eq!(compute_menu_offset(100.0, 2, 800.0), 100.0);
    }

    #[test]
    fn test_exact_fit_is_not_moved() {
        // 800 - 704 == 96 == menu height for two items
        assert_eq!(compute_menu_offset(704.0, 2, 800.0), 704.0);
        assert_eq!(compute_menu_offset(705.0, 2, 800.0), 704.0);
    }

    #[test]
    fn test_offset_rule_over_a_range() {
        let vh = 600.0;
        for n in 0..20usize {
            let menu_height = 32.0 * n as f32 + 32.0;
            for y in (0..600).step_by(37) {
                let y = y as f32;
                let expected = if vh - y >= menu_height { y } else { vh - menu_height };
                assert_eq!(compute_menu_offset(y, n, vh), expected, "n={} y={}", n, y);
            }
        }
    }

    #[test]
    fn test_custom_metrics() {
        let metrics = MenuMetrics {
            item_height: 20.0,
            vertical_spacing: 10.0,
        };
        assert_eq!(metrics.menu_height(3), 70.0);
        assert_eq!(compute_menu_offset_with(450.0, 3, 500.0, metrics), 430.0);
    }

    #[test]
    fn test_viewport_height_takes_max() {
        assert_eq!(viewport_height(700.0, 760.0), 760.0);
        assert_eq!(viewport_height(0.0, 0.0), 0.0);
    }
}
