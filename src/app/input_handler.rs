use crate::canvas::{PointerButton, PointerEvent};
use crate::utils::vector::Vec2;
use eframe::egui;

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Translate this frame's raw egui events into pointer events local to the
/// canvas rect. Presses and wheel only count while hovering the canvas;
/// leaving the rect ends whatever gesture is in progress.
pub fn pointer_events(ctx: &egui::Context, response: &egui::Response) -> Vec<PointerEvent> {
    let rect = response.rect;
    let local = |pos: egui::Pos2| Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);
    let hovered = response.hovered();
    let events = ctx.input(|i| i.events.clone());

    let mut out = Vec::new();
    for event in events {
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                modifiers,
            } => {
                if !pressed {
                    out.push(PointerEvent::Release);
                } else if hovered && rect.contains(pos) {
                    if let Some(button) = map_button(button) {
                        out.push(PointerEvent::Press {
                            pos: local(pos),
                            button,
                            shift: modifiers.shift,
                        });
                    }
                }
            }
            egui::Event::PointerMoved(pos) => {
                if rect.contains(pos) {
                    out.push(PointerEvent::Move { pos: local(pos) });
                } else {
                    out.push(PointerEvent::Leave);
                }
            }
            egui::Event::PointerGone => out.push(PointerEvent::Leave),
            egui::Event::MouseWheel { unit, delta, .. } => {
                if hovered {
                    let scroll = match unit {
                        egui::MouseWheelUnit::Point => delta.y / 120.0_f32,
                        egui::MouseWheelUnit::Line => delta.y,
                        egui::MouseWheelUnit::Page => delta.y * 10.0_f32,
                    };
                    // egui reports wheel-up as positive; wheel-up zooms in.
                    out.push(PointerEvent::Wheel { delta_y: -scroll });
                }
            }
            _ => {}
        }
    }
    out
}
