use serde::Serialize;

/// A catalog entry from the species reference page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Species {
    pub id: u32,
    pub name: String,
    pub type_1: String,
    /// Absent for single-typed species.
    pub type_2: Option<String>,
    pub img_url: String,
}
