//! Resolved address snapshots and the closed set of tracked fields

use serde::{Deserialize, Serialize};

/// Address components watched for transitions.
///
/// Kept closed so change handling can match exhaustively; the snapshot
/// itself carries a few more fields that are only used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressField {
    Municipality,
    District,
    Street,
}

impl AddressField {
    /// All tracked fields, in announcement-priority order (highest first).
    pub const ALL: [AddressField; 3] = [
        AddressField::Municipality,
        AddressField::District,
        AddressField::Street,
    ];

    /// Stable name used in signatures and log output.
    pub fn name(&self) -> &'static str {
        match self {
            AddressField::Municipality => "municipality",
            AddressField::District => "district",
            AddressField::Street => "street",
        }
    }
}

/// One reverse-geocoded address, as delivered by the address-resolution
/// collaborator for an accepted position.
///
/// Field layout follows the Brazilian address format of the original data
/// ("Camping Nozinho, 172, Rua Direita, Milho Verde, Serro, MG, 39150-000").
/// Snapshots are superseded, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressSnapshot {
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub district: Option<String>,
    pub municipality: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl AddressSnapshot {
    /// Value of one tracked field.
    pub fn get(&self, field: AddressField) -> Option<&str> {
        match field {
            AddressField::Municipality => self.municipality.as_deref(),
            AddressField::District => self.district.as_deref(),
            AddressField::Street => self.street.as_deref(),
        }
    }

    /// Street, district and municipality joined for a spoken summary.
    ///
    /// `None` when none of the three is present.
    pub fn spoken_summary(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.street.as_deref(),
            self.district.as_deref(),
            self.municipality.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milho_verde() -> AddressSnapshot {
        AddressSnapshot {
            street: Some("Rua Direita".to_string()),
            house_number: Some("172".to_string()),
            district: Some("Milho Verde".to_string()),
            municipality: Some("Serro".to_string()),
            state: Some("MG".to_string()),
            postal_code: Some("39150-000".to_string()),
        }
    }

    #[test]
    fn test_get_tracked_fields() {
        let addr = milho_verde();
        assert_eq!(addr.get(AddressField::Street), Some("Rua Direita"));
        assert_eq!(addr.get(AddressField::District), Some("Milho Verde"));
        assert_eq!(addr.get(AddressField::Municipality), Some("Serro"));
    }

    #[test]
    fn test_spoken_summary_skips_missing_fields() {
        let mut addr = milho_verde();
        addr.district = None;
        assert_eq!(addr.spoken_summary().unwrap(), "Rua Direita, Serro");

        assert_eq!(AddressSnapshot::default().spoken_summary(), None);
    }
}
