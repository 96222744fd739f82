use serde::Deserialize;

/// One informational topic and its illustrations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Disease {
    pub id: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Navigation entry for a disease, already localized.
#[derive(Debug, Clone)]
pub struct DiseaseSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}
