//! Domain records as stored in the document store
//!
//! Field names follow the stored documents exactly, which is why the fabric
//! record is camelCase and the machine record is capitalised.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fabric in the showroom catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FabricRecord {
    pub name: String,

    #[serde(rename = "mainImage", default)]
    pub main_image: String,

    #[serde(rename = "menCollection", default)]
    pub men_collection: Vec<String>,

    #[serde(rename = "womenCollection", default)]
    pub women_collection: Vec<String>,

    #[serde(rename = "kidsCollection", default)]
    pub kids_collection: Vec<String>,

    /// Reverse link to machines, written only when a machine is created
    #[serde(rename = "Machines", default, skip_serializing_if = "Vec::is_empty")]
    pub machines: Vec<String>,
}

impl FabricRecord {
    /// Gallery list for a segment
    pub fn gallery(&self, segment: GallerySegment) -> &[String] {
        match segment {
            GallerySegment::Men => &self.men_collection,
            GallerySegment::Women => &self.women_collection,
            GallerySegment::Kids => &self.kids_collection,
        }
    }

    /// Mutable gallery list for a segment
    pub fn gallery_mut(&mut self, segment: GallerySegment) -> &mut Vec<String> {
        match segment {
            GallerySegment::Men => &mut self.men_collection,
            GallerySegment::Women => &mut self.women_collection,
            GallerySegment::Kids => &mut self.kids_collection,
        }
    }
}

/// One of the three per-audience image galleries on a fabric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GallerySegment {
    Men,
    Women,
    Kids,
}

impl GallerySegment {
    pub const ALL: [GallerySegment; 3] = [Self::Men, Self::Women, Self::Kids];

    /// Field holding this gallery in a fabric document
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Men => "menCollection",
            Self::Women => "womenCollection",
            Self::Kids => "kidsCollection",
        }
    }
}

impl From<GallerySegment> for UploadSegment {
    fn from(segment: GallerySegment) -> Self {
        match segment {
            GallerySegment::Men => UploadSegment::Men,
            GallerySegment::Women => UploadSegment::Women,
            GallerySegment::Kids => UploadSegment::Kids,
        }
    }
}

/// Folder segment an uploaded image lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadSegment {
    Main,
    Men,
    Women,
    Kids,
}

impl UploadSegment {
    /// Path component used in blob paths
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Men => "men",
            Self::Women => "women",
            Self::Kids => "kids",
        }
    }
}

impl fmt::Display for UploadSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Knitting machine construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachineType {
    Single,
    Double,
    Interlock,
    Fleece,
}

impl MachineType {
    pub const ALL: [MachineType; 4] = [Self::Single, Self::Double, Self::Interlock, Self::Fleece];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Interlock => "Interlock",
            Self::Fleece => "Fleece",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MachineType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unknown machine type: {}", s)))
    }
}

/// A production machine and what it can knit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(
        rename = "Type",
        default,
        deserialize_with = "deserialize_machine_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub machine_type: Option<MachineType>,

    #[serde(rename = "Dia_Gauge", default)]
    pub dia_gauge: String,

    /// Fabric document ids this machine can produce
    #[serde(rename = "Fabrics", default)]
    pub fabrics: Vec<String>,

    /// Order document ids scheduled on this machine
    #[serde(rename = "Orders", default)]
    pub orders: Vec<String>,
}

impl MachineRecord {
    /// Type label for display, `N/A` when unset
    pub fn type_label(&self) -> &'static str {
        self.machine_type.map(MachineType::as_str).unwrap_or("N/A")
    }
}

/// Stored machines may carry an empty string where no type was picked
fn deserialize_machine_type<'de, D>(deserializer: D) -> Result<Option<MachineType>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A customer order booked against a fabric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub customer: String,

    /// Fabric document id
    pub fabric: String,

    /// Ordered quantity in kg
    pub amount: i64,
}

/// A typed record paired with its document id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}

impl<T> Stored<T> {
    pub fn new(id: impl Into<String>, record: T) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }
}
