//! Identifier types for packages and fleet agents
//!
//! Package IDs are the first 8 hex chars of a random UUID, e.g. `3f9a0c1e`.
//! Agent IDs are transport addresses such as `coordinator` or `unit-3`.

/// Generate a fresh package ID
pub fn generate_package_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    uuid[..8].to_string()
}

/// Package identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Create a new random package ID
    pub fn generate() -> Self {
        Self(generate_package_id())
    }

    /// Get the full ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PackageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Address of an actor in the fleet (the coordinator or a unit)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the ID of the `index`th unit, e.g. `unit-1`
    pub fn unit(prefix: &str, index: usize) -> Self {
        Self(format!("{}-{}", prefix, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_package_id() {
        let id = generate_package_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_package_ids_differ() {
        let a = PackageId::generate();
        let b = PackageId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unit_agent_id() {
        let id = AgentId::unit("robot", 3);
        assert_eq!(id.as_str(), "robot-3");
        assert_eq!(id.to_string(), "robot-3");
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&AgentId::from("unit-1")).unwrap();
        assert_eq!(json, "\"unit-1\"");

        let id: PackageId = serde_json::from_str("\"abcd1234\"").unwrap();
        assert_eq!(id.as_str(), "abcd1234");
    }
}
