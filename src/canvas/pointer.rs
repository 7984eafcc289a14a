//! Pointer state machine: decides whether input pans, zooms or paints.
//!
//! The machine works purely in screen space and emits [`PointerAction`]s;
//! whoever owns the layers converts them with one transform snapshot.

use crate::brush_engine::{MaskMode, StrokeState};
use crate::canvas::viewport::ZoomDirection;
use crate::utils::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press {
        pos: Vec2,
        button: PointerButton,
        shift: bool,
    },
    Move {
        pos: Vec2,
    },
    Release,
    Leave,
    Wheel {
        delta_y: f32,
    },
}

/// What a primary-button stroke does. Chosen when the stroke starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaintMode {
    #[default]
    MaskDraw,
    MaskErase,
    Restore,
}

impl PaintMode {
    /// The mask operation for mask modes, `None` for restore.
    pub fn mask_mode(self) -> Option<MaskMode> {
        match self {
            PaintMode::MaskDraw => Some(MaskMode::Draw),
            PaintMode::MaskErase => Some(MaskMode::Erase),
            PaintMode::Restore => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaintMode::MaskDraw => "Draw",
            PaintMode::MaskErase => "Erase",
            PaintMode::Restore => "Restore",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    Panning {
        last: Vec2,
    },
    Drawing {
        mode: PaintMode,
        stroke: StrokeState,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerAction {
    Pan { dx: f32, dy: f32 },
    Zoom(ZoomDirection),
    /// One brush dab at a screen position.
    Dab { mode: PaintMode, screen: Vec2 },
}

impl PointerState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PointerState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, PointerState::Drawing { .. })
    }

    /// Advance the machine by one event.
    ///
    /// `paint_mode` is only consulted on the Idle -> Drawing transition.
    /// `spacing` gives the screen distance between dabs for a mode.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        paint_mode: PaintMode,
        spacing: impl Fn(PaintMode) -> f32,
    ) -> Vec<PointerAction> {
        let mut actions = Vec::new();
        match event {
            PointerEvent::Press { pos, button, shift } => {
                if !self.is_idle() {
                    return actions;
                }
                match button {
                    PointerButton::Middle => *self = PointerState::Panning { last: pos },
                    PointerButton::Primary if shift => {
                        *self = PointerState::Panning { last: pos }
                    }
                    PointerButton::Primary => {
                        let mut stroke = StrokeState::new();
                        stroke.add_point(pos, spacing(paint_mode), |screen| {
                            actions.push(PointerAction::Dab {
                                mode: paint_mode,
                                screen,
                            })
                        });
                        *self = PointerState::Drawing {
                            mode: paint_mode,
                            stroke,
                        };
                    }
                    PointerButton::Secondary => {}
                }
            }
            PointerEvent::Move { pos } => match self {
                PointerState::Idle => {}
                PointerState::Panning { last } => {
                    let delta = pos - *last;
                    *last = pos;
                    if delta != Vec2::ZERO {
                        actions.push(PointerAction::Pan {
                            dx: delta.x,
                            dy: delta.y,
                        });
                    }
                }
                PointerState::Drawing { mode, stroke } => {
                    let mode = *mode;
                    stroke.add_point(pos, spacing(mode), |screen| {
                        actions.push(PointerAction::Dab { mode, screen })
                    });
                }
            },
            PointerEvent::Release | PointerEvent::Leave => {
                if let PointerState::Drawing { stroke, .. } = self {
                    stroke.end();
                }
                *self = PointerState::Idle;
            }
            PointerEvent::Wheel { delta_y } => {
                if delta_y < 0.0 {
                    actions.push(PointerAction::Zoom(ZoomDirection::In));
                } else if delta_y > 0.0 {
                    actions.push(PointerAction::Zoom(ZoomDirection::Out));
                }
            }
        }
        actions
    }
}
