//! # Access Policy
//!
//! Which identity may do what. Every check takes the caller's [`Identity`]
//! explicitly and returns `Ok(())` or a typed [`CoreError`].
//!
//! ```text
//! ┌──────────────────────────┬───────┬───────┬──────────────┬────────┐
//! │ Operation                │ user  │ admin │ manufacturer │ seller │
//! ├──────────────────────────┼───────┼───────┼──────────────┼────────┤
//! │ publish product          │       │   ✓   │      ✓       │        │
//! │ edit / delete product    │       │   ✓   │   own only   │        │
//! │ place order              │   ✓   │   ✓   │      ✓       │   ✓    │
//! │ complete order           │       │   ✓   │ own product  │        │
//! │ cancel order             │ buyer │   ✓   │ own product  │ buyer  │
//! │ create resale listing    │       │   ✓   │              │   ✓    │
//! │ delete resale listing    │       │   ✓   │              │  own   │
//! │ manage users             │       │   ✓   │              │        │
//! └──────────────────────────┴───────┴───────┴──────────────┴────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Identity, Order, OrderStatus, Product, ResellProduct, Role};

/// Roles a visitor may pick at registration.
pub const SELF_REGISTER_ROLES: [Role; 3] = [Role::User, Role::Manufacturer, Role::Seller];

/// Rejects roles that cannot be self-assigned at registration.
pub fn ensure_can_self_register(role: Role) -> CoreResult<()> {
    if SELF_REGISTER_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed {
            field: "role".to_string(),
            allowed: SELF_REGISTER_ROLES
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        }
        .into())
    }
}

pub fn ensure_admin(identity: &Identity, action: &str) -> CoreResult<()> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(CoreError::role_not_allowed(identity.role, action))
    }
}

pub fn ensure_can_publish_product(identity: &Identity) -> CoreResult<()> {
    match identity.role {
        Role::Manufacturer | Role::Admin => Ok(()),
        role => Err(CoreError::role_not_allowed(role, "publish products")),
    }
}

/// Owner manufacturer or admin.
pub fn ensure_can_manage_product(identity: &Identity, product: &Product) -> CoreResult<()> {
    if identity.is_admin() {
        return Ok(());
    }
    if identity.role != Role::Manufacturer {
        return Err(CoreError::role_not_allowed(identity.role, "manage products"));
    }
    if product.owner_id != identity.user_id {
        return Err(CoreError::not_owner("product", &product.id));
    }
    Ok(())
}

pub fn ensure_can_resell(identity: &Identity) -> CoreResult<()> {
    match identity.role {
        Role::Seller | Role::Admin => Ok(()),
        role => Err(CoreError::role_not_allowed(role, "resell products")),
    }
}

pub fn ensure_can_delete_listing(identity: &Identity, listing: &ResellProduct) -> CoreResult<()> {
    if identity.is_admin() || listing.seller_id == identity.user_id {
        Ok(())
    } else {
        Err(CoreError::not_owner("resale listing", &listing.id))
    }
}

/// Whether `identity` may see `order`. `product_owner_id` is the owner of the
/// ordered product, when it still exists.
pub fn can_view_order(identity: &Identity, order: &Order, product_owner_id: Option<&str>) -> bool {
    identity.is_admin()
        || order.user_id == identity.user_id
        || (identity.role == Role::Manufacturer && product_owner_id == Some(identity.user_id.as_str()))
}

/// Checks that `identity` may move `order` to `next`, including the
/// transition itself.
///
/// Callers who cannot see the order get `NotOwner` before anything about
/// its current status is checked.
pub fn ensure_can_set_order_status(
    identity: &Identity,
    order: &Order,
    product_owner_id: Option<&str>,
    next: OrderStatus,
) -> CoreResult<()> {
    if !can_view_order(identity, order, product_owner_id) {
        return Err(CoreError::not_owner("order", &order.id));
    }

    if !order.status.can_transition_to(next) {
        return Err(CoreError::InvalidStatusTransition {
            order_id: order.id.clone(),
            from: order.status,
            to: next,
        });
    }

    let is_seller_side = identity.is_admin()
        || (identity.role == Role::Manufacturer
            && product_owner_id == Some(identity.user_id.as_str()));

    let allowed = match next {
        OrderStatus::Completed => is_seller_side,
        OrderStatus::Cancelled => is_seller_side || order.user_id == identity.user_id,
        OrderStatus::Pending => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::not_owner("order", &order.id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
