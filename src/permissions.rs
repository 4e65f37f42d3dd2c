// Role-based access: which portal capabilities each organization role holds

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    OrgAdmin,
    TravelManager,
    Approver,
    Traveler,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::OrgAdmin,
        Role::TravelManager,
        Role::Approver,
        Role::Traveler,
        Role::Viewer,
    ];

    pub fn has_permission(self, permission: Permission) -> bool {
        use Permission::*;

        match self {
            Role::SuperAdmin => true,
            Role::OrgAdmin => permission != OrgDelete,
            Role::TravelManager => matches!(
                permission,
                UserRead
                    | BookingRead
                    | BookingCreate
                    | BookingUpdate
                    | BookingApprove
                    | FinanceRead
                    | ReportRead
                    | ReportCreate
                    | SettingsRead
            ),
            Role::Approver => matches!(permission, BookingRead | BookingApprove | ReportRead),
            Role::Traveler => matches!(permission, BookingRead | BookingCreate | BookingUpdate),
            Role::Viewer => matches!(permission, BookingRead | ReportRead),
        }
    }

    pub fn has_any_permission(self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|&p| self.has_permission(p))
    }

    // Vacuously true for an empty list
    pub fn has_all_permissions(self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|&p| self.has_permission(p))
    }

    pub fn permissions(self) -> Vec<Permission> {
        Permission::ALL
            .iter()
            .copied()
            .filter(|&p| self.has_permission(p))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Organization,
    User,
    Booking,
    Finance,
    Report,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Approve,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    OrgRead,
    OrgUpdate,
    OrgDelete,
    UserRead,
    UserCreate,
    UserUpdate,
    UserDelete,
    BookingRead,
    BookingCreate,
    BookingUpdate,
    BookingDelete,
    BookingApprove,
    FinanceRead,
    FinanceExport,
    ReportRead,
    ReportCreate,
    ReportExport,
    SettingsRead,
    SettingsUpdate,
}

impl Permission {
    pub const ALL: [Permission; 19] = [
        Permission::OrgRead,
        Permission::OrgUpdate,
        Permission::OrgDelete,
        Permission::UserRead,
        Permission::UserCreate,
        Permission::UserUpdate,
        Permission::UserDelete,
        Permission::BookingRead,
        Permission::BookingCreate,
        Permission::BookingUpdate,
        Permission::BookingDelete,
        Permission::BookingApprove,
        Permission::FinanceRead,
        Permission::FinanceExport,
        Permission::ReportRead,
        Permission::ReportCreate,
        Permission::ReportExport,
        Permission::SettingsRead,
        Permission::SettingsUpdate,
    ];

    /// Stable identifier, e.g. `booking_approve`.
    pub fn id(self) -> &'static str {
        match self {
            Permission::OrgRead => "org_read",
            Permission::OrgUpdate => "org_update",
            Permission::OrgDelete => "org_delete",
            Permission::UserRead => "user_read",
            Permission::UserCreate => "user_create",
            Permission::UserUpdate => "user_update",
            Permission::UserDelete => "user_delete",
            Permission::BookingRead => "booking_read",
            Permission::BookingCreate => "booking_create",
            Permission::BookingUpdate => "booking_update",
            Permission::BookingDelete => "booking_delete",
            Permission::BookingApprove => "booking_approve",
            Permission::FinanceRead => "finance_read",
            Permission::FinanceExport => "finance_export",
            Permission::ReportRead => "report_read",
            Permission::ReportCreate => "report_create",
            Permission::ReportExport => "report_export",
            Permission::SettingsRead => "settings_read",
            Permission::SettingsUpdate => "settings_update",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Permission::OrgRead => "Read Organization",
            Permission::OrgUpdate => "Update Organization",
            Permission::OrgDelete => "Delete Organization",
            Permission::UserRead => "Read Users",
            Permission::UserCreate => "Create Users",
            Permission::UserUpdate => "Update Users",
            Permission::UserDelete => "Delete Users",
            Permission::BookingRead => "Read Bookings",
            Permission::BookingCreate => "Create Bookings",
            Permission::BookingUpdate => "Update Bookings",
            Permission::BookingDelete => "Delete Bookings",
            Permission::BookingApprove => "Approve Bookings",
            Permission::FinanceRead => "Read Financial Data",
            Permission::FinanceExport => "Export Financial Data",
            Permission::ReportRead => "Read Reports",
            Permission::ReportCreate => "Create Reports",
            Permission::ReportExport => "Export Reports",
            Permission::SettingsRead => "Read Settings",
            Permission::SettingsUpdate => "Update Settings",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Permission::OrgRead => "View organization details",
            Permission::OrgUpdate => "Modify organization settings",
            Permission::OrgDelete => "Delete organization",
            Permission::UserRead => "View user information",
            Permission::UserCreate => "Add new users",
            Permission::UserUpdate => "Modify user details",
            Permission::UserDelete => "Remove users",
            Permission::BookingRead => "View bookings",
            Permission::BookingCreate => "Make new bookings",
            Permission::BookingUpdate => "Modify bookings",
            Permission::BookingDelete => "Cancel bookings",
            Permission::BookingApprove => "Approve booking requests",
            Permission::FinanceRead => "View financial reports",
            Permission::FinanceExport => "Export financial data",
            Permission::ReportRead => "View reports",
            Permission::ReportCreate => "Generate reports",
            Permission::ReportExport => "Export reports",
            Permission::SettingsRead => "View settings",
            Permission::SettingsUpdate => "Modify settings",
        }
    }

    pub fn resource(self) -> Resource {
        use Permission::*;
        match self {
            OrgRead | OrgUpdate | OrgDelete => Resource::Organization,
            UserRead | UserCreate | UserUpdate | UserDelete => Resource::User,
            BookingRead | BookingCreate | BookingUpdate | BookingDelete | BookingApprove => {
                Resource::Booking
            }
            FinanceRead | FinanceExport => Resource::Finance,
            ReportRead | ReportCreate | ReportExport => Resource::Report,
            SettingsRead | SettingsUpdate => Resource::Settings,
        }
    }

    pub fn action(self) -> Action {
        use Permission::*;
        match self {
            OrgRead | UserRead | BookingRead | FinanceRead | ReportRead | SettingsRead => {
                Action::Read
            }
            UserCreate | BookingCreate | ReportCreate => Action::Create,
            OrgUpdate | UserUpdate | BookingUpdate | SettingsUpdate => Action::Update,
            OrgDelete | UserDelete | BookingDelete => Action::Delete,
            BookingApprove => Action::Approve,
            FinanceExport | ReportExport => Action::Export,
        }
    }
}

/// Gate for a portal feature. Empty role or permission lists do not restrict;
/// a missing user is always denied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRule {
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub require_all: bool,
}

impl AccessRule {
    pub fn any_of(permissions: &[Permission]) -> Self {
        Self {
            permissions: permissions.to_vec(),
            ..Self::default()
        }
    }

    pub fn all_of(permissions: &[Permission]) -> Self {
        Self {
            permissions: permissions.to_vec(),
            require_all: true,
            ..Self::default()
        }
    }

    pub fn for_roles(roles: &[Role]) -> Self {
        Self {
            roles: roles.to_vec(),
            ..Self::default()
        }
    }

    pub fn allows(&self, role: Option<Role>) -> bool {
        let Some(role) = role else {
            return false;
        };
        if !self.roles.is_empty() && !self.roles.contains(&role) {
            return false;
        }
        if self.permissions.is_empty() {
            return true;
        }
        if self.require_all {
            role.has_all_permissions(&self.permissions)
        } else {
            role.has_any_permission(&self.permissions)
        }
    }
}
