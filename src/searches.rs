#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDefinition {
    pub query: &'static str,
    pub location: &'static str,
    pub remote_only: bool,
}

impl SearchDefinition {
    const fn new(query: &'static str, location: &'static str, remote_only: bool) -> Self {
        Self { query, location, remote_only }
    }

    /// Label used in progress output, e.g. `brand strategy healthcare (Remote)`.
    pub fn label(&self) -> String {
        if self.remote_only {
            format!("{} (Remote)", self.query)
        } else {
            format!("{} ({})", self.query, self.location)
        }
    }
}

pub const SEARCHES: [SearchDefinition; 8] = [
    SearchDefinition::new("marketing director women's health", "New York, NY", false),
    SearchDefinition::new("marketing director women's health", "United States", true),
    SearchDefinition::new("VP marketing mental health", "New York, NY", false),
    SearchDefinition::new("VP marketing mental health", "United States", true),
    SearchDefinition::new("brand strategy healthcare", "New York, NY", false),
    SearchDefinition::new("brand strategy healthcare", "United States", true),
    SearchDefinition::new("brand director femtech", "New York, NY", false),
    SearchDefinition::new("brand director femtech", "United States", true),
];
