//! Cache key construction for resolved entities

use uuid::Uuid;

/// Key for an entity resolved by identifier alone
///
/// Point reads and warming sweeps share this namespace.
pub fn entity_key(id: &Uuid) -> String {
    id.to_string()
}

/// Key for a specific version of an entity
///
/// Kept apart from [`entity_key`] so a versioned read never serves the
/// contents of whichever version happened to be cached under the bare id.
pub fn versioned_entity_key(id: &Uuid, version_id: &Uuid) -> String {
    format!("{}@{}", id, version_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key_is_plain_id() {
        let id = Uuid::parse_str("c2b9a3f0-0c8f-4b8a-9a57-3bd1d8f2b8e1").unwrap();
        assert_eq!(entity_key(&id), "c2b9a3f0-0c8f-4b8a-9a57-3bd1d8f2b8e1");
    }

    #[test]
    fn test_versioned_key_differs_from_plain_key() {
        let id = Uuid::new_v4();
        let version = Uuid::new_v4();

        assert_ne!(entity_key(&id), versioned_entity_key(&id, &version));
        assert!(versioned_entity_key(&id, &version).starts_with(&entity_key(&id)));
    }
}
