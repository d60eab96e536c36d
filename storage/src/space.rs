//! Object spaces
//!
//! A space groups records by owning contract (`zone`) and logical category
//! (`id`), e.g. markets, parameters or account credits.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectSpace {
    pub zone: String,
    pub id: u32,
    pub system: bool,
}

impl ObjectSpace {
    pub fn new(zone: impl Into<String>, id: u32) -> Self {
        Self {
            zone: zone.into(),
            id,
            system: false,
        }
    }

    /// A space owned by a system contract
    pub fn system(zone: impl Into<String>, id: u32) -> Self {
        Self {
            zone: zone.into(),
            id,
            system: true,
        }
    }

    /// Unambiguous byte prefix: system flag, zone length, zone, id
    pub fn prefix(&self) -> Vec<u8> {
        let zone = self.zone.as_bytes();
        let mut prefix = Vec::with_capacity(1 + 4 + zone.len() + 4);
        prefix.push(u8::from(self.system));
        prefix.extend_from_slice(&(zone.len() as u32).to_be_bytes());
        prefix.extend_from_slice(zone);
        prefix.extend_from_slice(&self.id.to_be_bytes());
        prefix
    }

    /// Full storage key of `key` inside this space
    pub fn scoped_key(&self, key: &[u8]) -> Vec<u8> {
        let mut scoped = self.prefix();
        scoped.extend_from_slice(key);
        scoped
    }
}

impl fmt::Display for ObjectSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.system { "system" } else { "user" };
        write!(f, "{}:{}/{}", kind, self.zone, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_do_not_collide() {
        let a = ObjectSpace::system("ab", 1);
        let b = ObjectSpace::system("a", 1);
        let c = ObjectSpace::new("ab", 1);
        let d = ObjectSpace::system("ab", 2);

        assert_ne!(a.prefix(), b.prefix());
        assert_ne!(a.prefix(), c.prefix());
        assert_ne!(a.prefix(), d.prefix());
        assert_ne!(a.scoped_key(b"x"), b.scoped_key(b"bx"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ObjectSpace::system("resources", 2).to_string(), "system:resources/2");
    }
}
