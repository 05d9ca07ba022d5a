//! Announcement text construction

use crate::queue::Priority;
use guia_core::AddressSnapshot;
use guia_geo::ChangeDetails;

/// Spoken text for a municipality transition.
///
/// With both ends known the full "left X, entered Y" form is used; with no
/// previous value (first visit or cleared signatures) a shorter entry form;
/// with no current municipality at all, a generic fallback.
pub fn municipality_announcement(previous: Option<&str>, current: Option<&str>) -> String {
    match (previous, current) {
        (Some(previous), Some(current)) => {
            format!("Você saiu de {} e entrou em {}", previous, current)
        }
        (None, Some(current)) => format!("Você entrou no município de {}", current),
        (_, None) => "Novo município detectado".to_string(),
    }
}

/// Spoken text for a district (bairro) change. Single-value form, no
/// from/to.
pub fn district_announcement(district: &str) -> String {
    format!("Você está no bairro {}", district)
}

/// Spoken text for a street change. Street values carry their own
/// "Rua"/"Avenida" prefix in the source data.
pub fn street_announcement(street: &str) -> String {
    format!("Você está na {}", street)
}

/// Spoken summary of the whole current address, used by the periodic
/// announcement. `None` when the snapshot has nothing to say.
pub fn full_address_announcement(address: &AddressSnapshot) -> Option<String> {
    address
        .spoken_summary()
        .map(|summary| format!("Você está em {}", summary))
}

/// Turn one detected field transition into ranked announcement text.
///
/// Transitions whose two ends carry the same value have nothing to say
/// and produce `None`, as do district/street transitions into a missing
/// value.
pub fn announcement_for_change(change: &ChangeDetails) -> Option<(String, Priority)> {
    let from = change.from.as_deref();
    let to = change.to.as_deref();
    if from == to {
        return None;
    }

    match change.field {
        guia_core::AddressField::Municipality => {
            Some((municipality_announcement(from, to), Priority::Municipality))
        }
        guia_core::AddressField::District => {
            to.map(|district| (district_announcement(district), Priority::District))
        }
        guia_core::AddressField::Street => {
            to.map(|street| (street_announcement(street), Priority::Street))
        }
    }
}
