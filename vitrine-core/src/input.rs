/// Platform-independent input, in the host's pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerUp,
    /// Only meaningful while a drag is active; ignored otherwise.
    PointerMove { x: f32, y: f32 },
    Wheel { delta_y: f32 },
    Resize { width: u32, height: u32 },
}

/// Turns absolute pointer positions into drag deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragTracker {
    last: Option<(f32, f32)>,
}

impl DragTracker {
    pub fn press(&mut self, x: f32, y: f32) {
        self.last = Some((x, y));
    }

    pub fn release(&mut self) {
        self.last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    /// Record a move and return the delta since the previous position, or
    /// `None` when no button is held.
    pub fn moved(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (last_x, last_y) = self.last?;
        self.last = Some((x, y));
        Some((x - last_x, y - last_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut drag = DragTracker::default();
        assert_eq!(drag.moved(10.0, 10.0), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_deltas_are_relative_to_last_move() {
        let mut drag = DragTracker::default();
        drag.press(100.0, 50.0);
        assert_eq!(drag.moved(110.0, 45.0), Some((10.0, -5.0)));
        assert_eq!(drag.moved(111.0, 45.0), Some((1.0, 0.0)));
        drag.release();
        assert_eq!(drag.moved(200.0, 200.0), None);
    }
}
