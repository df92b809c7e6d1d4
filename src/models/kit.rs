use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitItemType {
    Tablet,
    Dashcam,
    FuelCard,
    PoloShirt,
    Jacket,
    HiVis,
    IdCardLanyard,
    TradePlates,
}

impl fmt::Display for KitItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KitItemType::Tablet => "Tablet",
            KitItemType::Dashcam => "Dashcam",
            KitItemType::FuelCard => "Fuel Card",
            KitItemType::PoloShirt => "Polo Shirt",
            KitItemType::Jacket => "Jacket",
            KitItemType::HiVis => "Hi-Vis Vest",
            KitItemType::IdCardLanyard => "ID Card & Lanyard",
            KitItemType::TradePlates => "Trade Plates",
        };
        f.write_str(label)
    }
}

/// Type-specific details carried by a kit item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitMetadata {
    pub plate_number: Option<String>,
    /// Last four digits only.
    pub fuel_card_number: Option<String>,
    pub tablet_imei: Option<String>,
    pub sim_number: Option<String>,
    pub sim_provider: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedKitItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kit_type: KitItemType,
    pub assigned_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    /// Garment size, e.g. "M", "L", "XL".
    pub size: Option<String>,
    #[serde(flatten)]
    pub metadata: KitMetadata,
}

impl AssignedKitItem {
    pub fn is_returned(&self) -> bool {
        self.returned_at.is_some()
    }
}

/// An item as requested by the kit form: no identity, no dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredKitItem {
    #[serde(rename = "type")]
    pub kit_type: KitItemType,
    pub size: Option<String>,
    #[serde(flatten)]
    pub metadata: KitMetadata,
}
