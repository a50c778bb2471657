use eframe::egui::{Pos2, Vec2};

/// Pointer travel above which a press counts as a drag rather than a click.
pub(in crate::app) const CLICK_SLOP_PX: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum GestureEnd {
    Click,
    Drag,
}

/// One press-move-release sequence on the scene.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct PointerGesture {
    start: Pos2,
    secondary: bool,
    moves_camera: bool,
    dragged: bool,
}

impl PointerGesture {
    /// Presses that land on a node hit-target select on release but never move the camera.
    pub(in crate::app) fn begin(start: Pos2, secondary: bool, moves_camera: bool) -> Self {
        Self {
            start,
            secondary,
            moves_camera,
            dragged: false,
        }
    }

    pub(in crate::app) fn secondary(&self) -> bool {
        self.secondary
    }

    pub(in crate::app) fn dragged(&self) -> bool {
        self.dragged
    }

    /// Returns the total offset the camera should follow, if any.
    pub(in crate::app) fn update(&mut self, pointer: Pos2) -> Option<Vec2> {
        let offset = pointer - self.start;
        if offset.length() > CLICK_SLOP_PX {
            self.dragged = true;
        }
        self.moves_camera.then_some(offset)
    }

    pub(in crate::app) fn finish(mut self, pointer: Pos2) -> GestureEnd {
        self.update(pointer);
        if self.dragged {
            GestureEnd::Drag
        } else {
            GestureEnd::Click
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn small_travel_is_a_click() {
        let mut gesture = PointerGesture::begin(pos2(100.0, 100.0), false, true);
        gesture.update(pos2(101.0, 102.0));
        assert_eq!(gesture.finish(pos2(103.0, 100.0)), GestureEnd::Click);
    }

    #[test]
    fn travel_beyond_slop_is_a_drag() {
        let gesture = PointerGesture::begin(pos2(100.0, 100.0), false, true);
        assert_eq!(gesture.finish(pos2(103.5, 100.0)), GestureEnd::Drag);
    }

    #[test]
    fn returning_to_start_is_still_a_drag() {
        let mut gesture = PointerGesture::begin(pos2(0.0, 0.0), false, true);
        gesture.update(pos2(40.0, 0.0));
        assert!(gesture.dragged());
        assert_eq!(gesture.finish(pos2(0.0, 0.0)), GestureEnd::Drag);
    }

    #[test]
    fn offset_is_total_travel() {
        let mut gesture = PointerGesture::begin(pos2(10.0, 10.0), false, true);
        assert_eq!(gesture.update(pos2(12.0, 10.0)), Some(vec2(2.0, 0.0)));
        assert_eq!(gesture.update(pos2(30.0, 5.0)), Some(vec2(20.0, -5.0)));
    }

    #[test]
    fn presses_on_nodes_do_not_move_the_camera() {
        let mut gesture = PointerGesture::begin(pos2(10.0, 10.0), false, false);
        assert_eq!(gesture.update(pos2(60.0, 10.0)), None);
        assert!(gesture.dragged());
    }
}
