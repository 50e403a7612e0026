// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Contact-capture state machine: the two-phase (edit → confirm) form bound
//! to an active [`ContactRequest`].
//!
//! The forward transition is gated on completeness of the required fields;
//! the backward transition is unconditional. A server rejection (non-empty
//! `invalid` map on the active request) forces the machine back to edit no
//! matter what phase it is in.

use crate::chat::frame::{ContactInfo, ContactRequest};

/// Form phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapturePhase {
    #[default]
    Edit,
    Confirm,
}

/// The contact-capture form state.
#[derive(Debug, Clone, Default)]
pub struct ContactCapture {
    pub phase: CapturePhase,
    pub values: ContactInfo,
}

impl ContactCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by its wire name. Unknown field names are ignored.
    pub fn set_field(&mut self, field: &str, value: &str) {
        let slot = match field {
            "name" => &mut self.values.name,
            "email" => &mut self.values.email,
            "phone" => &mut self.values.phone,
            _ => return,
        };
        *slot = Some(value.to_owned());
    }

    /// Whether one field is complete: trimmed-non-empty if the request
    /// requires it, vacuously complete otherwise.
    pub fn field_complete(&self, field: &str, request: &ContactRequest) -> bool {
        if !request.fields.iter().any(|f| f == field) {
            return true;
        }
        let value = match field {
            "name" => &self.values.name,
            "email" => &self.values.email,
            "phone" => &self.values.phone,
            // A required field we cannot capture never blocks the form.
            _ => return true,
        };
        value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    /// Whether every required field is complete.
    pub fn all_complete(&self, request: &ContactRequest) -> bool {
        request.fields.iter().all(|f| self.field_complete(f, request))
    }

    /// Edit → confirm, gated on completeness. Returns whether the
    /// transition happened.
    pub fn proceed(&mut self, request: &ContactRequest) -> bool {
        if self.phase == CapturePhase::Edit && self.all_complete(request) {
            self.phase = CapturePhase::Confirm;
            return true;
        }
        false
    }

    /// Confirm → edit, unconditional.
    pub fn back(&mut self) {
        self.phase = CapturePhase::Edit;
    }

    /// Terminal action: yield the current values for submission and reset to
    /// edit, ready for a possible subsequent request.
    pub fn confirm(&mut self) -> ContactInfo {
        self.phase = CapturePhase::Edit;
        self.values.clone()
    }

    /// Sync against the active request. A populated `invalid` map (server
    /// rejected a prior submission) overrides any phase the UI put us in.
    pub fn sync(&mut self, request: Option<&ContactRequest>) {
        if request.is_some_and(|r| !r.invalid.is_empty()) {
            self.phase = CapturePhase::Edit;
        }
    }
}

#[cfg(test)]
#[path = "contact_tests.rs"]
mod tests;
