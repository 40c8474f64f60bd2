use axum_helpers::AuthUser;

use crate::error::{MarketplaceError, MarketplaceResult};
use crate::models::Listing;

/// The user performing a request, as far as the domain cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Owner/reviewer id, compared by string equality
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<AuthUser> for Actor {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// Fails with [`MarketplaceError::Forbidden`] unless `actor` owns `listing`.
pub fn ensure_owner<L: Listing>(listing: &L, actor: &Actor) -> MarketplaceResult<()> {
    if listing.owner() == actor.id {
        Ok(())
    } else {
        tracing::info!(
            listing_id = %listing.id(),
            user_id = %actor.id,
            "Rejected change by non-owner"
        );
        Err(MarketplaceError::Forbidden { kind: L::KIND })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeedProduct;
    use serde_json::json;

    fn seed_owned_by(owner: &Actor) -> SeedProduct {
        let fields = json!({
            "name": "Maize",
            "description": "Hybrid",
            "category": "Cereal",
            "price": 12.5,
            "count_in_stock": 3
        });
        SeedProduct::from_fields(owner, fields.as_object().cloned().unwrap_or_default()).unwrap()
    }

    #[test]
    fn test_owner_allowed() {
        let owner = Actor::new("a", "Alice");
        let seed = seed_owned_by(&owner);
        assert!(ensure_owner(&seed, &owner).is_ok());
    }

    #[test]
    fn test_non_owner_forbidden() {
        let owner = Actor::new("a", "Alice");
        let seed = seed_owned_by(&owner);

        let err = ensure_owner(&seed, &Actor::new("c", "Alice")).unwrap_err();
        assert!(matches!(err, MarketplaceError::Forbidden { .. }));
    }

    #[test]
    fn test_from_auth_user() {
        let user = AuthUser {
            id: "u1".into(),
            name: "Grace".into(),
            email: "grace@farm.test".into(),
            roles: vec![],
        };
        assert_eq!(Actor::from(user), Actor::new("u1", "Grace"));
    }
}
