//! Role-based access control: the role/permission catalogue and the
//! role -> permission table.
//!
//! Both enumerations are closed. The table is data, not code: the built-in
//! one mirrors the booking platform's roles, and callers may inject their own
//! (unknown roles simply hold no permissions).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GateError;

/// Caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Customer,
    Guest,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Staff, Role::Customer, Role::Guest];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Customer => "customer",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| GateError::BadRequest(format!("unknown role: {s}")))
    }
}

/// Fine-grained capability, namespaced by resource (`resource:action`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    UsersRead,
    UsersWrite,
    UsersDelete,
    BookingsReadOwn,
    BookingsReadAll,
    BookingsCreate,
    BookingsUpdateOwn,
    BookingsUpdateAll,
    BookingsCancelOwn,
    BookingsCancelAll,
    ServicesRead,
    ServicesWrite,
    PaymentsRead,
    PaymentsRefund,
    AnalyticsRead,
    SystemConfig,
    LogsRead,
}

impl Permission {
    /// Every permission, in catalogue order.
    pub const ALL: [Permission; 17] = [
        Permission::UsersRead,
        Permission::UsersWrite,
        Permission::UsersDelete,
        Permission::BookingsReadOwn,
        Permission::BookingsReadAll,
        Permission::BookingsCreate,
        Permission::BookingsUpdateOwn,
        Permission::BookingsUpdateAll,
        Permission::BookingsCancelOwn,
        Permission::BookingsCancelAll,
        Permission::ServicesRead,
        Permission::ServicesWrite,
        Permission::PaymentsRead,
        Permission::PaymentsRefund,
        Permission::AnalyticsRead,
        Permission::SystemConfig,
        Permission::LogsRead,
    ];

    /// Wire name (e.g. `bookings:read_all`).
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::UsersRead => "users:read",
            Permission::UsersWrite => "users:write",
            Permission::UsersDelete => "users:delete",
            Permission::BookingsReadOwn => "bookings:read_own",
            Permission::BookingsReadAll => "bookings:read_all",
            Permission::BookingsCreate => "bookings:create",
            Permission::BookingsUpdateOwn => "bookings:update_own",
            Permission::BookingsUpdateAll => "bookings:update_all",
            Permission::BookingsCancelOwn => "bookings:cancel_own",
            Permission::BookingsCancelAll => "bookings:cancel_all",
            Permission::ServicesRead => "services:read",
            Permission::ServicesWrite => "services:write",
            Permission::PaymentsRead => "payments:read",
            Permission::PaymentsRefund => "payments:refund",
            Permission::AnalyticsRead => "analytics:read",
            Permission::SystemConfig => "system:config",
            Permission::LogsRead => "logs:read",
        }
    }

    /// Human-readable label for dashboards.
    pub fn display_name(self) -> &'static str {
        match self {
            Permission::UsersRead => "View Users",
            Permission::UsersWrite => "Edit Users",
            Permission::UsersDelete => "Delete Users",
            Permission::BookingsReadOwn => "View Own Bookings",
            Permission::BookingsReadAll => "View All Bookings",
            Permission::BookingsCreate => "Create Bookings",
            Permission::BookingsUpdateOwn => "Edit Own Bookings",
            Permission::BookingsUpdateAll => "Edit All Bookings",
            Permission::BookingsCancelOwn => "Cancel Own Bookings",
            Permission::BookingsCancelAll => "Cancel All Bookings",
            Permission::ServicesRead => "View Services",
            Permission::ServicesWrite => "Edit Services",
            Permission::PaymentsRead => "View Payments",
            Permission::PaymentsRefund => "Refund Payments",
            Permission::AnalyticsRead => "View Analytics",
            Permission::SystemConfig => "System Configuration",
            Permission::LogsRead => "View Logs",
        }
    }

    /// Resource namespace (the part before `:`).
    pub fn resource(self) -> &'static str {
        self.as_str().split_once(':').map_or("", |(r, _)| r)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| GateError::BadRequest(format!("unknown permission: {s}")))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Role -> permission table. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissions {
    table: HashMap<Role, HashSet<Permission>>,
}

impl RolePermissions {
    /// The booking platform's standard table.
    pub fn builtin() -> Self {
        use Permission::*;

        let mut table = HashMap::new();
        table.insert(
            Role::Admin,
            HashSet::from([
                UsersRead,
                UsersWrite,
                UsersDelete,
                BookingsReadAll,
                BookingsCreate,
                BookingsUpdateAll,
                BookingsCancelAll,
                ServicesRead,
                ServicesWrite,
                PaymentsRead,
                PaymentsRefund,
                AnalyticsRead,
                SystemConfig,
                LogsRead,
            ]),
        );
        table.insert(
            Role::Staff,
            HashSet::from([
                UsersRead,
                BookingsReadAll,
                BookingsCreate,
                BookingsUpdateAll,
                BookingsCancelAll,
                ServicesRead,
                PaymentsRead,
            ]),
        );
        table.insert(
            Role::Customer,
            HashSet::from([
                BookingsReadOwn,
                BookingsCreate,
                BookingsUpdateOwn,
                BookingsCancelOwn,
                ServicesRead,
                PaymentsRead,
            ]),
        );
        // Guest checkout can still book.
        table.insert(Role::Guest, HashSet::from([ServicesRead, BookingsCreate]));

        Self { table }
    }

    /// Build from an explicit table. Roles left out hold no permissions.
    pub fn from_map<I, P>(roles: I) -> Self
    where
        I: IntoIterator<Item = (Role, P)>,
        P: IntoIterator<Item = Permission>,
    {
        let table = roles
            .into_iter()
            .map(|(role, perms)| (role, perms.into_iter().collect()))
            .collect();
        Self { table }
    }

    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.table
            .get(&role)
            .is_some_and(|perms| perms.contains(&permission))
    }

    /// False for an empty list.
    pub fn has_any_permission(&self, role: Role, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(role, *p))
    }

    /// True for an empty list.
    pub fn has_all_permissions(&self, role: Role, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has_permission(role, *p))
    }

    /// Granted permissions in catalogue order.
    pub fn permissions_of(&self, role: Role) -> Vec<Permission> {
        let Some(perms) = self.table.get(&role) else {
            return Vec::new();
        };
        Permission::ALL
            .into_iter()
            .filter(|p| perms.contains(p))
            .collect()
    }
}

impl Default for RolePermissions {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Body returned when a permission gate denies a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forbidden {
    pub error: &'static str,
    pub message: String,
}

impl Forbidden {
    pub fn missing(permission: Permission) -> Self {
        Self {
            error: "Forbidden",
            message: format!("Missing required permission: {permission}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for p in Permission::ALL {
            assert_eq!(p.as_str().parse::<Permission>().ok(), Some(p));
        }
        assert!("payments:steal".parse::<Permission>().is_err());
        assert_eq!("staff".parse::<Role>().ok(), Some(Role::Staff));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn resource_namespace() {
        assert_eq!(Permission::BookingsReadOwn.resource(), "bookings");
        assert_eq!(Permission::SystemConfig.resource(), "system");
    }

    #[test]
    fn forbidden_message_names_permission() {
        let body = Forbidden::missing(Permission::BookingsReadAll);
        assert_eq!(body.error, "Forbidden");
        assert_eq!(body.message, "Missing required permission: bookings:read_all");
    }
}
