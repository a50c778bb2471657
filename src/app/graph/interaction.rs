use eframe::egui::{self, Key, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::camera::{GestureEnd, PointerGesture};
use super::super::highlight::SelectionEvent;
use super::Hit;

struct PointerInput {
    primary_pressed: bool,
    secondary_pressed: bool,
    released: bool,
    position: Option<Pos2>,
    scroll: f32,
    escape: bool,
}

/// Escape clears the selection unless a text field owns the keyboard.
fn keyboard_intent(escape: bool, typing: bool) -> Option<SelectionEvent> {
    (escape && !typing).then_some(SelectionEvent::SelectionCleared)
}

impl ViewModel {
    /// Feeds raw pointer input to the active camera and turns clicks into selection intents.
    ///
    /// `hit` is what lies under the pointer this frame.
    pub(in crate::app) fn handle_scene_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        hit: Hit,
    ) -> Option<SelectionEvent> {
        let input = ui.input(|input| PointerInput {
            primary_pressed: input.pointer.primary_pressed(),
            secondary_pressed: input.pointer.secondary_pressed(),
            released: input.pointer.any_released(),
            position: input.pointer.interact_pos(),
            scroll: input.raw_scroll_delta.y,
            escape: input.key_pressed(Key::Escape),
        });
        let local = |pointer: Pos2| (pointer - rect.min).to_pos2();

        if response.hovered()
            && self.gesture.is_none()
            && (input.primary_pressed || input.secondary_pressed)
            && let Some(pointer) = input.position
        {
            let secondary = input.secondary_pressed && !input.primary_pressed;
            let moves_camera = hit == Hit::Background;
            self.gesture = Some(PointerGesture::begin(local(pointer), secondary, moves_camera));
            if moves_camera {
                self.camera_mut().begin_drag(secondary);
            }
        }

        let mut event = None;

        if let Some(pointer) = input.position {
            let offset = self
                .gesture
                .as_mut()
                .and_then(|gesture| gesture.update(local(pointer)));
            if let Some(offset) = offset {
                self.camera_mut().drag_to(offset);
            }
        }

        if input.released
            && let Some(gesture) = self.gesture.take()
        {
            self.camera_mut().end_drag();
            let end = match input.position {
                Some(pointer) => gesture.finish(local(pointer)),
                None => GestureEnd::Drag,
            };

            if end == GestureEnd::Click && !gesture.secondary() {
                event = Some(match hit {
                    Hit::Job(index) => SelectionEvent::JobSelected(index),
                    Hit::Cluster(id) => SelectionEvent::ClusterSelected(id),
                    Hit::Background => SelectionEvent::SelectionCleared,
                });
            }
        }

        if response.hovered() && input.scroll.abs() > f32::EPSILON {
            let anchor = input
                .position
                .filter(|pointer| rect.contains(*pointer))
                .unwrap_or_else(|| rect.center());
            self.camera_mut().zoom_at(input.scroll, local(anchor));
        }

        if let Some(cleared) = keyboard_intent(input.escape, ui.ctx().wants_keyboard_input()) {
            event = Some(cleared);
        }

        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_clears_only_outside_text_fields() {
        assert_eq!(
            keyboard_intent(true, false),
            Some(SelectionEvent::SelectionCleared)
        );
        assert_eq!(keyboard_intent(true, true), None);
        assert_eq!(keyboard_intent(false, false), None);
    }
}
