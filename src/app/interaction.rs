use eframe::egui;

use crate::tools::{InputEvent, PointerButton};

use super::TileEditorApp;

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

impl TileEditorApp {
    fn touch_count(&self) -> u8 {
        self.touches.len().min(u8::MAX as usize) as u8
    }

    fn dispatch(&mut self, event: InputEvent) {
        self.with_tools(|tools, cx| tools.handle(&event, cx));
    }

    /// Turn this frame's raw egui input into tool events and view gestures.
    /// `canvas` is the screen rect of the drawing area; positions handed on
    /// are relative to its top-left corner.
    pub(super) fn handle_canvas_input(
        &mut self,
        ctx: &egui::Context,
        canvas: egui::Rect,
        hovered: bool,
    ) {
        let origin = canvas.min.to_vec2();
        let events = ctx.input(|i| i.events.clone());

        for event in &events {
            match event {
                egui::Event::Touch { id, phase, pos, .. } => {
                    self.on_touch(*id, *phase, *pos - origin);
                }
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let Some(button) = map_button(*button) else {
                        continue;
                    };
                    let local = *pos - origin;
                    let touches = self.touch_count();
                    if *pressed {
                        if !hovered || !canvas.contains(*pos) {
                            continue;
                        }
                        if button == PointerButton::Middle {
                            self.drag_pan.begin(local);
                        }
                        self.dispatch(InputEvent::PointerDown {
                            pos: local,
                            button,
                            touches,
                        });
                    } else {
                        if button == PointerButton::Middle {
                            self.drag_pan.end();
                        }
                        self.dispatch(InputEvent::PointerUp {
                            pos: local,
                            button,
                            touches,
                        });
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    let local = *pos - origin;
                    if self.drag_pan.is_active() {
                        self.drag_pan.update(&mut self.view, local);
                        ctx.request_repaint();
                    }
                    self.hover_cell = canvas
                        .contains(*pos)
                        .then(|| self.view.cell_at(local, self.grid.cell_size()));
                    let touches = self.touch_count();
                    self.dispatch(InputEvent::PointerMove {
                        pos: local,
                        touches,
                    });
                }
                egui::Event::PointerGone => self.hover_cell = None,
                _ => {}
            }
        }

        if hovered {
            self.handle_wheel(ctx, canvas);
        }
    }

    fn handle_wheel(&mut self, ctx: &egui::Context, canvas: egui::Rect) {
        let (delta, ctrl, hover) =
            ctx.input(|i| (i.raw_scroll_delta.y, i.modifiers.ctrl, i.pointer.hover_pos()));
        if delta.abs() <= 0.0 {
            return;
        }
        if ctrl {
            self.view.rotate_by(delta * self.settings.rotate_sensitivity);
        } else if let Some(hover) = hover {
            let factor = (1.0 + delta * self.settings.zoom_sensitivity).clamp(0.8, 1.25);
            self.view.zoom_at(hover - canvas.min.to_vec2(), factor);
        }
        ctx.request_repaint();
    }

    fn on_touch(&mut self, id: egui::TouchId, phase: egui::TouchPhase, local: egui::Pos2) {
        match phase {
            egui::TouchPhase::Start | egui::TouchPhase::Move => {
                self.touches.insert(id, local);
            }
            egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                self.touches.remove(&id);
            }
        }

        if self.touches.len() < 2 {
            if self.pinch.is_active() {
                log::debug!("pinch ended");
                self.pinch.end();
            }
            return;
        }
        let mut fingers: Vec<_> = self.touches.iter().map(|(id, p)| (id.0, *p)).collect();
        fingers.sort_by_key(|(id, _)| *id);
        self.pinch.update(&mut self.view, fingers[0].1, fingers[1].1);
    }
}
