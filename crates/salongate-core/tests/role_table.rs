//! Built-in role table and injected test doubles.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use salongate_core::rbac::{Forbidden, Permission, Role, RolePermissions};

#[test]
fn builtin_table_matches_catalogue() {
    let t = RolePermissions::builtin();

    assert!(!t.has_permission(Role::Customer, Permission::PaymentsRefund));
    assert!(t.has_permission(Role::Admin, Permission::PaymentsRefund));
    assert!(t.has_permission(Role::Guest, Permission::BookingsCreate));
    assert!(!t.has_permission(Role::Guest, Permission::BookingsReadOwn));
    assert!(t.has_permission(Role::Staff, Permission::BookingsReadAll));
    assert!(!t.has_permission(Role::Staff, Permission::SystemConfig));
    assert!(t.has_permission(Role::Customer, Permission::BookingsCancelOwn));
    assert!(!t.has_permission(Role::Customer, Permission::BookingsCancelAll));

    assert_eq!(t.permissions_of(Role::Admin).len(), 14);
    assert_eq!(t.permissions_of(Role::Staff).len(), 7);
    assert_eq!(t.permissions_of(Role::Customer).len(), 6);
    assert_eq!(
        t.permissions_of(Role::Guest),
        vec![Permission::BookingsCreate, Permission::ServicesRead]
    );
}

#[test]
fn decisions_are_deterministic() {
    let t = RolePermissions::builtin();
    for role in Role::ALL {
        let granted = t.permissions_of(role);
        for p in Permission::ALL {
            let first = t.has_permission(role, p);
            assert_eq!(first, t.has_permission(role, p));
            assert_eq!(first, granted.contains(&p), "role={role} permission={p}");
        }
    }
}

#[test]
fn staff_holds_no_admin_only_rights_beyond_admin() {
    // Convention, not enforced: staff is a subset of admin.
    let t = RolePermissions::builtin();
    for p in t.permissions_of(Role::Staff) {
        assert!(t.has_permission(Role::Admin, p), "admin lacks {p}");
    }
}

#[test]
fn any_and_all() {
    let t = RolePermissions::builtin();
    let refund_or_read = [Permission::PaymentsRefund, Permission::PaymentsRead];
    assert!(t.has_any_permission(Role::Customer, &refund_or_read));
    assert!(!t.has_all_permissions(Role::Customer, &refund_or_read));
    assert!(t.has_all_permissions(Role::Admin, &refund_or_read));
    assert!(!t.has_any_permission(Role::Admin, &[]));
    assert!(t.has_all_permissions(Role::Guest, &[]));
}

#[test]
fn injected_table_denies_missing_roles() {
    let t = RolePermissions::from_map([(Role::Staff, vec![Permission::LogsRead])]);
    assert!(t.has_permission(Role::Staff, Permission::LogsRead));
    assert!(!t.has_permission(Role::Admin, Permission::LogsRead));
    assert!(t.permissions_of(Role::Admin).is_empty());
}

#[test]
fn serde_uses_wire_names() {
    let p: Permission = serde_json::from_str("\"payments:refund\"").unwrap();
    assert_eq!(p, Permission::PaymentsRefund);
    assert!(serde_json::from_str::<Permission>("\"payments:*\"").is_err());

    let r: Role = serde_json::from_str("\"customer\"").unwrap();
    assert_eq!(r, Role::Customer);

    let body = serde_json::to_value(Forbidden::missing(Permission::PaymentsRefund)).unwrap();
    assert_eq!(body["error"], "Forbidden");
    assert_eq!(body["message"], "Missing required permission: payments:refund");
}
