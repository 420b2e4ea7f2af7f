//! ID generation for tasks and task lists.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh task id.
    pub fn generate(title: &str, created_at: DateTime<Utc>) -> Self {
        Self(generate_id("td", title, created_at))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Opaque task list identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl ListId {
    /// Generate a fresh list id.
    pub fn generate(name: &str, created_at: DateTime<Utc>) -> Self {
        Self(generate_id("tl", name, created_at))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Hash content + entropy into "<prefix>-" + 10 hex chars.
fn generate_id(prefix: &str, content: &str, created_at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(created_at.timestamp_nanos_opt().unwrap_or(0).to_le_bytes());
    // 8 random bytes so identical content at the same instant still differs
    hasher.update(rand::rng().random::<[u8; 8]>());
    let hash = hasher.finalize();
    format!(
        "{}-{:010x}",
        prefix,
        u64::from_be_bytes([hash[0], hash[1], hash[2], hash[3], hash[4], 0, 0, 0]) >> 24
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_format() {
        let id = TaskId::generate("Test title", Utc::now());
        assert!(id.as_str().starts_with("td-"));
        assert_eq!(id.as_str().len(), 13);
        assert!(id.as_str()[3..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_list_id_format() {
        let id = ListId::generate("Groceries", Utc::now());
        assert!(id.as_str().starts_with("tl-"));
        assert_eq!(id.as_str().len(), 13);
    }

    #[test]
    fn test_task_id_uniqueness() {
        let now = Utc::now();
        let id1 = TaskId::generate("Same title", now);
        let id2 = TaskId::generate("Same title", now);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_task_id_serializes_as_plain_string() {
        let id = TaskId::from("td-0123456789");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"td-0123456789\"");
    }
}
