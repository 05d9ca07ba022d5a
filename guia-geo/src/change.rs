//! Per-field address change detection with transition deduplication

use guia_core::{AddressField, AddressSnapshot};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Everything known about one field transition, for observers and
/// announcement building.
///
/// Built purely from the snapshots handed in; the dedup state is never
/// consulted, so the same details can be produced again even after the
/// transition has already been notified.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeDetails {
    pub field: AddressField,
    pub from: Option<String>,
    pub to: Option<String>,
    pub previous_address: Option<AddressSnapshot>,
    pub current_address: Option<AddressSnapshot>,
    pub previous_raw: Option<Value>,
    pub current_raw: Option<Value>,
}

/// Deduplicates field transitions.
///
/// Remembers the last notified `previous=>current` pair per field so the
/// same transition never fires twice. Signatures persist until explicitly
/// cleared.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    signatures: HashMap<AddressField, String>,
}

fn signature_part(value: Option<&str>) -> &str {
    value.unwrap_or("null")
}

fn signature(previous: Option<&str>, current: Option<&str>) -> String {
    format!("{}=>{}", signature_part(previous), signature_part(current))
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `field` transitioned between the two snapshots and that
    /// transition has not been reported before.
    ///
    /// Returns `false` when either snapshot is absent: without both ends
    /// no change can be asserted. When the transition is new, its
    /// signature is stored and `true` is returned; re-presenting the same
    /// pair afterwards returns `false` and leaves the stored signature
    /// untouched.
    pub fn has_field_changed(
        &mut self,
        field: AddressField,
        current: Option<&AddressSnapshot>,
        previous: Option<&AddressSnapshot>,
    ) -> bool {
        let (current, previous) = match (current, previous) {
            (Some(c), Some(p)) => (c, p),
            _ => return false,
        };

        let sig = signature(previous.get(field), current.get(field));
        if self.signatures.get(&field) == Some(&sig) {
            return false;
        }

        debug!(field = field.name(), signature = %sig, "new field transition");
        self.signatures.insert(field, sig);
        true
    }

    /// Report the transition for `field` without touching dedup state.
    pub fn change_details(
        &self,
        field: AddressField,
        current: Option<&AddressSnapshot>,
        previous: Option<&AddressSnapshot>,
        current_raw: Option<&Value>,
        previous_raw: Option<&Value>,
    ) -> ChangeDetails {
        ChangeDetails {
            field,
            from: previous.and_then(|p| p.get(field)).map(str::to_string),
            to: current.and_then(|c| c.get(field)).map(str::to_string),
            previous_address: previous.cloned(),
            current_address: current.cloned(),
            previous_raw: previous_raw.cloned(),
            current_raw: current_raw.cloned(),
        }
    }

    /// Forget the stored signature for one field, re-arming detection of
    /// the same transition.
    pub fn clear_field_signature(&mut self, field: AddressField) {
        self.signatures.remove(&field);
    }

    /// Forget every stored signature.
    pub fn clear_all_signatures(&mut self) {
        self.signatures.clear();
    }
}
