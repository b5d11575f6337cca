use crate::prelude::*;
use bevy::prelude::*;
use bevy_egui::egui;

/// What a widget reported this frame, reduced to what the commit policy
/// looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditSignal {
    pub changed: bool,
    pub dragged: bool,
    pub drag_stopped: bool,
    pub lost_focus: bool,
    /// A text field or popup is still being edited.
    pub has_focus: bool,
}

impl From<&egui::Response> for EditSignal {
    fn from(response: &egui::Response) -> Self {
        Self {
            changed: response.changed(),
            dragged: response.dragged(),
            drag_stopped: response.drag_stopped(),
            lost_focus: response.lost_focus(),
            has_focus: response.has_focus(),
        }
    }
}

/// Combines the signals of widgets editing the same value.
impl std::ops::BitOr for EditSignal {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            changed: self.changed || rhs.changed,
            dragged: self.dragged || rhs.dragged,
            drag_stopped: self.drag_stopped || rhs.drag_stopped,
            lost_focus: self.lost_focus || rhs.lost_focus,
            has_focus: self.has_focus || rhs.has_focus,
        }
    }
}

impl EditSignal {
    /// Signal of a button that edits through a popup, like the color picker.
    ///
    /// The popup holds focus while open. Pressing the pointer inside it is a
    /// drag, releasing it ends the edit, and so does closing the popup.
    pub fn popup(
        changed: bool,
        was_open: bool,
        is_open: bool,
        pointer_down: bool,
        pointer_released: bool,
    ) -> Self {
        Self {
            changed,
            dragged: is_open && pointer_down,
            drag_stopped: is_open && pointer_released,
            lost_focus: was_open && !is_open,
            has_focus: is_open,
        }
    }

    /// Drag ticks and keystrokes only touch the draft. An edit is final once
    /// the drag is released, the field loses focus, or it changed without a
    /// drag while nothing holds focus (a click).
    pub fn is_commit(&self) -> bool {
        self.drag_stopped
            || self.lost_focus
            || (self.changed && !self.dragged && !self.has_focus)
    }
}

/// Panel-side copy of the parameters that widgets edit freely.
#[derive(Resource, Clone, Debug)]
pub struct ParameterDraft {
    pub draft: GalaxyParameters,
    pending: bool,
}

impl Default for ParameterDraft {
    fn default() -> Self {
        Self::new(GalaxyParameters::default())
    }
}

impl ParameterDraft {
    pub fn new(params: GalaxyParameters) -> Self {
        Self {
            draft: params,
            pending: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Feeds one widget signal. Returns the parameters to apply when it
    /// finalizes a pending edit.
    pub fn observe(&mut self, signal: EditSignal) -> Option<GalaxyParameters> {
        if signal.changed {
            self.pending = true;
        }
        (self.pending && signal.is_commit()).then(|| self.commit())
    }

    /// Clamps the draft into the panel ranges and hands it out.
    pub fn commit(&mut self) -> GalaxyParameters {
        self.pending = false;
        self.draft = self.draft.clamped();
        self.draft.clone()
    }

    /// Follows the applied parameters while nothing is being edited.
    pub fn sync(&mut self, applied: &GalaxyParameters) {
        if !self.pending && self.draft != *applied {
            self.draft = applied.clone();
        }
    }
}
