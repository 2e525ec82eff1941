//! Session events: what the display layer must react to.
//!
//! The engine never calls into the UI. It queues events during an operation
//! and the UI drains them once the operation returns.

use serde::Serialize;
use std::collections::VecDeque;

use crate::search::Candidate;

/// Form contents shown for the selected tool (all empty when nothing is selected).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormFields {
    pub number: String,
    pub name: String,
    pub location: String,
    pub borrower: String,
}

impl FormFields {
    pub fn is_empty(&self) -> bool {
        self.number.is_empty()
            && self.name.is_empty()
            && self.location.is_empty()
            && self.borrower.is_empty()
    }
}

/// Something the UI should redraw or prompt for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A tool became current; repopulate the form.
    SelectionChanged { fields: FormFields },
    /// Nothing is current any more; the form is blank.
    SelectionCleared,
    /// Remove any search highlight from the map.
    HighlightCleared,
    /// Records were added, changed or removed; redraw lists and markers.
    InventoryChanged,
    /// Locations or image bindings changed.
    LocationsChanged,
    /// The viewed page changed.
    PageChanged { page: u32 },
    /// Ask the user to pick one of these.
    CandidatesOffered { candidates: Vec<Candidate> },
}

/// FIFO of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<SessionEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: SessionEvent) {
        tracing::trace!("session_event: {:?}", event);
        self.pending.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<SessionEvent> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
