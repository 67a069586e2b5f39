/// Household-scoped access control
///
/// Every tenant-scoped route in Household Hero passes through [`authorize`]
/// before it touches the database. The decision is a pure function of the
/// already-resolved [`Principal`], the operation being attempted, and the
/// role requirement statically attached to the route.
///
/// # Decision Order
///
/// 1. **Membership**: the principal must belong to a household. Principals
///    without one are rejected with [`AccessError::NoHousehold`] regardless of
///    role, and the role check never runs.
/// 2. **Role**: if the route declares an allow-list, the principal's role must
///    be on it, otherwise [`AccessError::ForbiddenRole`] is returned.
///
/// On success the caller receives a [`HouseholdScope`]. Its household ID is
/// always copied from the principal's own record; there is no constructor that
/// accepts an arbitrary ID, so handlers cannot scope a query to a household
/// taken from request input.
///
/// # Policy Table
///
/// | Capability             | Required roles   |
/// |------------------------|------------------|
/// | `HouseholdResources`   | any member       |
/// | `Finance`              | Admin, Parent    |
/// | `StaffManagement`      | Admin, Parent    |
/// | `MemberManagement`     | Admin, Parent    |
/// | `SystemAdministration` | Admin            |
///
/// # Example
///
/// ```
/// use householdhero_shared::auth::access::{authorize, AccessError, Capability, Principal};
/// use householdhero_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let household_id = Uuid::new_v4();
/// let parent = Principal::new(Uuid::new_v4(), Role::Parent, Some(household_id));
///
/// let scope = authorize(&parent, "budgets.create", Capability::Finance.requirement()).unwrap();
/// assert_eq!(scope.household_id(), household_id);
///
/// let staff = Principal::new(Uuid::new_v4(), Role::Staff, Some(household_id));
/// let denied = authorize(&staff, "budgets.create", Capability::Finance.requirement());
/// assert!(matches!(denied, Err(AccessError::ForbiddenRole { .. })));
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

/// Reason an access decision was denied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Principal has not created or joined a household yet
    #[error("must belong to a household to access this resource")]
    NoHousehold,

    /// Principal's role is not on the operation's allow-list
    #[error("role '{role}' is not permitted to perform '{operation}'")]
    ForbiddenRole {
        /// Operation that was attempted
        operation: String,

        /// Role the principal holds
        role: Role,
    },
}

/// Roles a route accepts beyond plain household membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any member of a household may proceed
    Unrestricted,

    /// Only the listed roles may proceed. An empty list admits nobody.
    AnyOf(&'static [Role]),
}

impl RoleRequirement {
    /// Returns true if `role` satisfies this requirement
    pub fn permits(&self, role: Role) -> bool {
        match self {
            RoleRequirement::Unrestricted => true,
            RoleRequirement::AnyOf(roles) => roles.contains(&role),
        }
    }
}

const GUARDIANS: &[Role] = &[Role::Admin, Role::Parent];
const ADMINS: &[Role] = &[Role::Admin];

/// Classes of routes that share a role requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Tasks, inventory, calendar, recipes, pets, vehicles, household overview
    HouseholdResources,

    /// Budgets and transactions
    Finance,

    /// Employees and payroll details
    StaffManagement,

    /// Issuing household invitations
    MemberManagement,

    /// Changing member roles and account status
    SystemAdministration,
}

impl Capability {
    /// All capabilities, in policy-table order
    pub const ALL: [Capability; 5] = [
        Capability::HouseholdResources,
        Capability::Finance,
        Capability::StaffManagement,
        Capability::MemberManagement,
        Capability::SystemAdministration,
    ];

    /// Role requirement enforced for routes of this capability
    pub const fn requirement(self) -> RoleRequirement {
        match self {
            Capability::HouseholdResources => RoleRequirement::Unrestricted,
            Capability::Finance => RoleRequirement::AnyOf(GUARDIANS),
            Capability::StaffManagement => RoleRequirement::AnyOf(GUARDIANS),
            Capability::MemberManagement => RoleRequirement::AnyOf(GUARDIANS),
            Capability::SystemAdministration => RoleRequirement::AnyOf(ADMINS),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::HouseholdResources => "household_resources",
            Capability::Finance => "finance",
            Capability::StaffManagement => "staff_management",
            Capability::MemberManagement => "member_management",
            Capability::SystemAdministration => "system_administration",
        }
    }
}

/// The authenticated actor of a request
///
/// Built by the authentication layer from the user's database record after the
/// bearer token has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User ID
    pub user_id: Uuid,

    /// Current role
    pub role: Role,

    /// Household the user belongs to, if any
    pub household_id: Option<Uuid>,
}

impl Principal {
    pub fn new(user_id: Uuid, role: Role, household_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            role,
            household_id,
        }
    }

    /// Builds a principal from a stored user record
    pub fn from_user(user: &User) -> Self {
        Self::new(user.id, user.role, user.household_id)
    }
}

/// Household binding produced by a successful access decision
///
/// Handlers read it from request extensions and pass
/// [`HouseholdScope::household_id`] to every model query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseholdScope {
    household_id: Uuid,
    user_id: Uuid,
    role: Role,
}

impl HouseholdScope {
    /// Household every query of this request is restricted to
    pub fn household_id(&self) -> Uuid {
        self.household_id
    }

    /// Acting user
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Acting user's role
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Evaluates membership, then role, for one operation
///
/// # Arguments
///
/// * `principal` - Resolved principal of the request
/// * `operation` - Human-readable operation name, used in denials and logs
/// * `requirement` - Role requirement declared for the route
///
/// # Errors
///
/// - [`AccessError::NoHousehold`] if the principal has no household
/// - [`AccessError::ForbiddenRole`] if the role is not permitted
pub fn authorize(
    principal: &Principal,
    operation: &str,
    requirement: RoleRequirement,
) -> Result<HouseholdScope, AccessError> {
    let household_id = principal.household_id.ok_or(AccessError::NoHousehold)?;

    if !requirement.permits(principal.role) {
        return Err(AccessError::ForbiddenRole {
            operation: operation.to_string(),
            role: principal.role,
        });
    }

    Ok(HouseholdScope {
        household_id,
        user_id: principal.user_id,
        role: principal.role,
    })
}

/// Shorthand for [`authorize`] with a capability's requirement
pub fn authorize_capability(
    principal: &Principal,
    operation: &str,
    capability: Capability,
) -> Result<HouseholdScope, AccessError> {
    authorize(principal, operation, capability.requirement())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 4] = [Role::Admin, Role::Parent, Role::Member, Role::Staff];

    fn principal(role: Role, household_id: Option<Uuid>) -> Principal {
        Principal::new(Uuid::new_v4(), role, household_id)
    }

    #[test]
    fn test_no_household_denied_for_every_role_and_capability() {
        for role in ALL_ROLES {
            for capability in Capability::ALL {
                let result = authorize_capability(&principal(role, None), "any", capability);
                assert_eq!(result, Err(AccessError::NoHousehold));
            }
        }
    }

    #[test]
    fn test_no_household_checked_before_role() {
        // Staff would also fail the role check; membership must win.
        let result = authorize(
            &principal(Role::Staff, None),
            "users.update_status",
            RoleRequirement::AnyOf(&[Role::Admin]),
        );
        assert_eq!(result, Err(AccessError::NoHousehold));
    }

    #[test]
    fn test_allowed_iff_role_permitted() {
        let household_id = Uuid::new_v4();
        for role in ALL_ROLES {
            for capability in Capability::ALL {
                let requirement = capability.requirement();
                let result = authorize(&principal(role, Some(household_id)), "op", requirement);
                let expected = match requirement {
                    RoleRequirement::Unrestricted => true,
                    RoleRequirement::AnyOf(roles) => roles.contains(&role),
                };
                assert_eq!(result.is_ok(), expected, "{:?} on {:?}", role, capability);
            }
        }
    }

    #[test]
    fn test_scope_uses_principal_household() {
        let household_id = Uuid::new_v4();
        let p = principal(Role::Member, Some(household_id));
        let scope = authorize(&p, "tasks.list", RoleRequirement::Unrestricted).unwrap();

        assert_eq!(scope.household_id(), household_id);
        assert_eq!(scope.user_id(), p.user_id);
        assert_eq!(scope.role(), Role::Member);
    }

    #[test]
    fn test_decision_is_idempotent() {
        let p = principal(Role::Parent, Some(Uuid::new_v4()));
        let first = authorize_capability(&p, "employees.create", Capability::StaffManagement);
        let second = authorize_capability(&p, "employees.create", Capability::StaffManagement);
        assert_eq!(first, second);

        let m = principal(Role::Member, Some(Uuid::new_v4()));
        let first = authorize_capability(&m, "budgets.create", Capability::Finance);
        let second = authorize_capability(&m, "budgets.create", Capability::Finance);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_allow_list_admits_nobody() {
        let requirement = RoleRequirement::AnyOf(&[]);
        for role in ALL_ROLES {
            let result = authorize(&principal(role, Some(Uuid::new_v4())), "nothing", requirement);
            assert!(matches!(result, Err(AccessError::ForbiddenRole { .. })));
        }
    }

    #[test]
    fn test_scenario_member_without_household_reads_tasks() {
        let result = authorize_capability(
            &principal(Role::Member, None),
            "tasks.list",
            Capability::HouseholdResources,
        );
        assert_eq!(result, Err(AccessError::NoHousehold));
    }

    #[test]
    fn test_scenario_member_reads_tasks() {
        let h1 = Uuid::new_v4();
        let scope = authorize_capability(
            &principal(Role::Member, Some(h1)),
            "tasks.list",
            Capability::HouseholdResources,
        )
        .unwrap();
        assert_eq!(scope.household_id(), h1);
    }

    #[test]
    fn test_scenario_member_creates_budget() {
        let result = authorize_capability(
            &principal(Role::Member, Some(Uuid::new_v4())),
            "budgets.create",
            Capability::Finance,
        );
        assert_eq!(
            result,
            Err(AccessError::ForbiddenRole {
                operation: "budgets.create".to_string(),
                role: Role::Member,
            })
        );
    }

    #[test]
    fn test_scenario_admin_creates_employee() {
        let h1 = Uuid::new_v4();
        let scope = authorize_capability(
            &principal(Role::Admin, Some(h1)),
            "employees.create",
            Capability::StaffManagement,
        )
        .unwrap();
        assert_eq!(scope.household_id(), h1);
    }

    #[test]
    fn test_scenario_staff_updates_user_status() {
        let result = authorize_capability(
            &principal(Role::Staff, Some(Uuid::new_v4())),
            "users.update_status",
            Capability::SystemAdministration,
        );
        assert!(matches!(
            result,
            Err(AccessError::ForbiddenRole { role: Role::Staff, .. })
        ));
    }

    #[test]
    fn test_forbidden_role_message_names_operation() {
        let err = AccessError::ForbiddenRole {
            operation: "transactions.create".to_string(),
            role: Role::Staff,
        };
        assert!(err.to_string().contains("transactions.create"));
        assert!(err.to_string().contains("staff"));

        assert_eq!(
            AccessError::NoHousehold.to_string(),
            "must belong to a household to access this resource"
        );
    }

    #[test]
    fn test_principal_from_user_record() {
        let user = crate::models::user::tests::sample_user(Role::Parent, Some(Uuid::new_v4()));
        let p = Principal::from_user(&user);
        assert_eq!(p.user_id, user.id);
        assert_eq!(p.role, Role::Parent);
        assert_eq!(p.household_id, user.household_id);
    }
}
