//! Per-frame input handling: drag-to-pan, zoom about the cursor,
//! budget stepping, and strategy selection.
//!
//! The collaborators that own the window poll the devices; this module
//! only sees a [`Controls`] snapshot per frame and keeps the small
//! amount of state that must survive between frames (the drag origin
//! and the active strategy) in an explicit [`InputState`] value.

use num::Complex;

use crate::region::{Region, DEFAULT_FRAC_BR, DEFAULT_FRAC_TL};
use crate::render::Strategy;

/// Fraction of the corner-to-target distance covered by one zoom step.
pub const ZOOM_FACTOR: f64 = 0.2;

/// Step applied to the iteration budget by one press.
pub const BUDGET_STEP: u32 = 16;

/// The budget never goes below this.
pub const BUDGET_FLOOR: u32 = 16;

/// One frame's worth of polled device state.
#[derive(Copy, Clone, Debug, Default)]
pub struct Controls {
    /// The left mouse button is currently held.
    pub left_held: bool,
    /// Cursor position in window pixels.
    pub cursor: (i32, i32),
    /// Zoom toward the point under the cursor this frame.
    pub zoom_in: bool,
    /// Zoom away from the view centre this frame.
    pub zoom_out: bool,
    /// Restore the home view.
    pub reset: bool,
    /// Raise the iteration budget one step.
    pub budget_up: bool,
    /// Lower the iteration budget one step.
    pub budget_down: bool,
    /// Select the strategy with this selector number.
    pub select_method: Option<usize>,
}

/// Input state carried across frames.
#[derive(Debug)]
pub struct InputState {
    holding_click: bool,
    click_origin: (i32, i32),
    method: Strategy,
}

impl InputState {
    /// Fresh state: no drag in progress, the direct scalar strategy
    /// selected.
    pub fn new() -> InputState {
        InputState {
            holding_click: false,
            click_origin: (0, 0),
            method: Strategy::Direct,
        }
    }

    /// Drag-to-pan.  While the button stays held, the cursor's travel
    /// since the previous frame is converted through the Region's
    /// ratios and applied to both fractal corners, so the picture
    /// follows the cursor.
    pub fn handle_move(&mut self, controls: &Controls, region: Region) -> Region {
        if self.holding_click {
            if controls.left_held {
                let dx = (self.click_origin.0 - controls.cursor.0) as f64 * region.x_ratio();
                let dy = (self.click_origin.1 - controls.cursor.1) as f64 * region.y_ratio();
                let translation = Complex::new(dx, dy);
                self.click_origin = controls.cursor;
                return region
                    .with_frac_bounds(region.frac_tl + translation, region.frac_br + translation);
            }
            self.holding_click = false;
        } else if controls.left_held {
            self.holding_click = true;
            self.click_origin = controls.cursor;
        }
        region
    }

    /// Zoom in toward the point under the cursor, out from the view
    /// centre, or snap back to the home view.  Zooming in moves both
    /// corners toward the target by the same fraction of their
    /// distance, which keeps the target under the cursor.
    pub fn handle_zoom(&self, controls: &Controls, region: Region) -> Region {
        if controls.zoom_in {
            let target = cursor_point(controls.cursor, &region);
            let tl = region.frac_tl + (target - region.frac_tl) * 0.5 * ZOOM_FACTOR;
            let br = region.frac_br + (target - region.frac_br) * 0.5 * ZOOM_FACTOR;
            region.with_frac_bounds(tl, br)
        } else if controls.zoom_out {
            let half = (region.frac_br - region.frac_tl) * 0.5;
            region.with_frac_bounds(
                region.frac_tl - half * ZOOM_FACTOR,
                region.frac_br + half * ZOOM_FACTOR,
            )
        } else if controls.reset {
            region.with_frac_bounds(DEFAULT_FRAC_TL, DEFAULT_FRAC_BR)
        } else {
            region
        }
    }

    /// Step the iteration budget, holding it at the floor.
    pub fn handle_precision(&self, controls: &Controls, budget: u32) -> u32 {
        if controls.budget_up {
            budget + BUDGET_STEP
        } else if controls.budget_down && budget > BUDGET_FLOOR {
            budget - BUDGET_STEP
        } else {
            budget
        }
    }

    /// Switch strategies.  Selectors that name no strategy are
    /// ignored; the previous choice stays active until replaced.
    pub fn handle_method(&mut self, controls: &Controls) -> Strategy {
        if let Some(index) = controls.select_method {
            if let Some(strategy) = Strategy::from_index(index) {
                self.method = strategy;
            }
        }
        self.method
    }
}

impl Default for InputState {
    fn default() -> InputState {
        InputState::new()
    }
}

// The fractal point under a cursor, with the cursor clamped into the
// pixel rectangle first so off-window positions zoom toward the
// nearest edge.
fn cursor_point(cursor: (i32, i32), region: &Region) -> Complex<f64> {
    let x = cursor
        .0
        .clamp(region.pixel_tl.0 as i32, region.pixel_br.0 as i32) as usize;
    let y = cursor
        .1
        .clamp(region.pixel_tl.1 as i32, region.pixel_br.1 as i32) as usize;
    region.point_at(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Region {
        Region::default_view(100, 100).unwrap()
    }

    #[test]
    fn first_press_anchors_without_moving() {
        let mut state = InputState::new();
        let controls = Controls {
            left_held: true,
            cursor: (50, 50),
            ..Controls::default()
        };
        let region = state.handle_move(&controls, home());
        assert_eq!(region.frac_tl, home().frac_tl);
        assert_eq!(region.frac_br, home().frac_br);
    }

    #[test]
    fn drag_translates_both_corners() {
        let mut state = InputState::new();
        let press = Controls {
            left_held: true,
            cursor: (50, 50),
            ..Controls::default()
        };
        let region = state.handle_move(&press, home());

        let drag = Controls {
            left_held: true,
            cursor: (40, 45),
            ..Controls::default()
        };
        let moved = state.handle_move(&drag, region);

        let dx = 10.0 * region.x_ratio();
        let dy = 5.0 * region.y_ratio();
        assert_eq!(moved.frac_tl, region.frac_tl + Complex::new(dx, dy));
        assert_eq!(moved.frac_br, region.frac_br + Complex::new(dx, dy));
    }

    #[test]
    fn releasing_the_button_ends_the_drag() {
        let mut state = InputState::new();
        let press = Controls {
            left_held: true,
            cursor: (10, 10),
            ..Controls::default()
        };
        let region = state.handle_move(&press, home());

        let release = Controls::default();
        let region = state.handle_move(&release, region);

        // A new press far away must anchor, not jump.
        let repress = Controls {
            left_held: true,
            cursor: (90, 90),
            ..Controls::default()
        };
        let region = state.handle_move(&repress, region);
        assert_eq!(region.frac_tl, home().frac_tl);
    }

    #[test]
    fn zoom_in_shrinks_around_the_cursor_point() {
        let state = InputState::new();
        let controls = Controls {
            zoom_in: true,
            cursor: (25, 75),
            ..Controls::default()
        };
        let before = home();
        let target = cursor_point(controls.cursor, &before);
        let after = state.handle_zoom(&controls, before);

        let shrink = (after.frac_br.re - after.frac_tl.re) / (before.frac_br.re - before.frac_tl.re);
        assert!((shrink - 0.9).abs() < 1e-12);

        // The targeted point stays at the same relative position.
        let before_frac = (target.re - before.frac_tl.re) / (before.frac_br.re - before.frac_tl.re);
        let after_frac = (target.re - after.frac_tl.re) / (after.frac_br.re - after.frac_tl.re);
        assert!((before_frac - after_frac).abs() < 1e-9);
    }

    #[test]
    fn zoom_out_grows_around_the_centre() {
        let state = InputState::new();
        let controls = Controls {
            zoom_out: true,
            ..Controls::default()
        };
        let before = home();
        let after = state.handle_zoom(&controls, before);

        let grow = (after.frac_br.re - after.frac_tl.re) / (before.frac_br.re - before.frac_tl.re);
        assert!((grow - 1.2).abs() < 1e-12);

        let centre_before = (before.frac_tl + before.frac_br) * 0.5;
        let centre_after = (after.frac_tl + after.frac_br) * 0.5;
        assert!((centre_before - centre_after).norm_sqr() < 1e-18);
    }

    #[test]
    fn reset_restores_the_home_view() {
        let state = InputState::new();
        let zoomed = home().with_frac_bounds(Complex::new(-0.8, 0.3), Complex::new(-0.7, 0.2));
        let controls = Controls {
            reset: true,
            ..Controls::default()
        };
        let region = state.handle_zoom(&controls, zoomed);
        assert_eq!(region.frac_tl, DEFAULT_FRAC_TL);
        assert_eq!(region.frac_br, DEFAULT_FRAC_BR);
    }

    #[test]
    fn budget_steps_and_clamps() {
        let state = InputState::new();
        let up = Controls {
            budget_up: true,
            ..Controls::default()
        };
        let down = Controls {
            budget_down: true,
            ..Controls::default()
        };
        assert_eq!(state.handle_precision(&up, 16), 32);
        assert_eq!(state.handle_precision(&down, 48), 32);
        assert_eq!(state.handle_precision(&down, 16), 16);
        assert_eq!(state.handle_precision(&Controls::default(), 64), 64);
    }

    #[test]
    fn method_selection_sticks_until_changed() {
        let mut state = InputState::new();
        assert_eq!(state.handle_method(&Controls::default()), Strategy::Direct);

        let pick_pool = Controls {
            select_method: Some(5),
            ..Controls::default()
        };
        assert_eq!(state.handle_method(&pick_pool), Strategy::Pool);
        assert_eq!(state.handle_method(&Controls::default()), Strategy::Pool);

        let bogus = Controls {
            select_method: Some(9),
            ..Controls::default()
        };
        assert_eq!(state.handle_method(&bogus), Strategy::Pool);
    }
}
