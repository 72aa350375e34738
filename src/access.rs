// 🔐 Access Policy - who may read and write Books
//
// Two independent checks:
// - write: superuser OR admin
// - read scope: staff (or admin) see every book, everyone else only
//   unrestricted ones
//
// A staff-only caller therefore reads everything and writes nothing, and a
// superuser without staff can write but still cannot see restricted books.

use crate::entities::Book;

// ============================================================================
// CAPABILITIES
// ============================================================================

pub const ROLE_STAFF: &str = "staff";
pub const ROLE_SUPERUSER: &str = "superuser";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_admin: bool,
}

impl Capabilities {
    pub fn staff() -> Self {
        Capabilities { is_staff: true, ..Default::default() }
    }

    pub fn superuser() -> Self {
        Capabilities { is_superuser: true, ..Default::default() }
    }

    pub fn admin() -> Self {
        Capabilities { is_admin: true, ..Default::default() }
    }

    /// Parse a comma separated role list. Unknown roles are ignored.
    pub fn from_roles(roles: &str) -> Self {
        let mut caps = Capabilities::default();
        for role in roles.split(',').map(|r| r.trim().to_ascii_lowercase()) {
            match role.as_str() {
                ROLE_STAFF => caps.is_staff = true,
                ROLE_SUPERUSER => caps.is_superuser = true,
                ROLE_ADMIN => caps.is_admin = true,
                _ => {}
            }
        }
        caps
    }

    pub fn can_write(&self) -> bool {
        self.is_superuser || self.is_admin
    }

    pub fn has_elevated_read(&self) -> bool {
        self.is_staff || self.is_admin
    }
}

// ============================================================================
// CALLER
// ============================================================================

/// Identity of whoever issued the request, as asserted upstream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub username: Option<String>,
    pub capabilities: Capabilities,
}

impl Caller {
    pub fn anonymous() -> Self {
        Caller::default()
    }

    pub fn user(username: &str, capabilities: Capabilities) -> Self {
        Caller {
            username: Some(username.to_string()),
            capabilities,
        }
    }

    /// Build a caller from the raw identity header values.
    ///
    /// A blank or missing user name yields an anonymous caller, and roles
    /// are dropped for anonymous callers.
    pub fn from_identity(username: Option<&str>, roles: Option<&str>) -> Self {
        match username.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => Caller::user(name, roles.map(Capabilities::from_roles).unwrap_or_default()),
            None => Caller::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    /// Name used in log lines
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("anonymous")
    }
}

// ============================================================================
// OPERATIONS & DECISIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
    /// The HTML library page
    ViewLibrary,
}

impl Operation {
    pub fn is_write(&self) -> bool {
        matches!(self, Operation::Create | Operation::Update | Operation::Delete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Retrieve => "retrieve",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::ViewLibrary => "view_library",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    InsufficientRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `caller` may perform `op` on the book resource.
///
/// Reads are always allowed here; what a reader can see is narrowed by
/// [`BookScope`].
pub fn authorize(caller: &Caller, op: Operation) -> Decision {
    match op {
        Operation::ViewLibrary if !caller.is_authenticated() => {
            Decision::Deny(DenyReason::Unauthenticated)
        }
        op if op.is_write() && !caller.capabilities.can_write() => {
            Decision::Deny(DenyReason::InsufficientRole)
        }
        _ => Decision::Allow,
    }
}

// ============================================================================
// BOOK SCOPE
// ============================================================================

/// Which books a reader can see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookScope {
    All,
    Unrestricted,
}

impl BookScope {
    pub fn for_caller(caller: &Caller) -> Self {
        if caller.capabilities.has_elevated_read() {
            BookScope::All
        } else {
            BookScope::Unrestricted
        }
    }

    pub fn admits(&self, book: &Book) -> bool {
        match self {
            BookScope::All => true,
            BookScope::Unrestricted => !book.restricted,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
