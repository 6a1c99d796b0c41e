//! Per-route access policies.
//!
//! Every protected handler checks its policy before touching any service.

use staffdir_auth::{AccessPolicy, AuthzError, Role};

use crate::context::PrincipalContext;

const STAFF_ADMIN: &[Role] = &[Role::Admin, Role::Hr];
const ANY_EMPLOYEE: &[Role] = &Role::ALL;

pub const CREATE_EMPLOYEE: AccessPolicy = AccessPolicy::new("create employee", STAFF_ADMIN);
pub const LIST_EMPLOYEES: AccessPolicy = AccessPolicy::new("list employees", STAFF_ADMIN);
pub const GET_EMPLOYEE: AccessPolicy = AccessPolicy::new("get employee", ANY_EMPLOYEE);
pub const UPDATE_EMPLOYEE: AccessPolicy = AccessPolicy::new("update employee", STAFF_ADMIN);
pub const DELETE_EMPLOYEE: AccessPolicy = AccessPolicy::new("delete employee", STAFF_ADMIN);

pub const CREATE_ADDRESS: AccessPolicy = AccessPolicy::new("create address", STAFF_ADMIN);
pub const UPDATE_ADDRESS: AccessPolicy = AccessPolicy::new("update address", STAFF_ADMIN);
pub const DELETE_ADDRESS: AccessPolicy = AccessPolicy::new("delete address", STAFF_ADMIN);

pub const CREATE_DEPARTMENT: AccessPolicy = AccessPolicy::new("create department", STAFF_ADMIN);
pub const LIST_DEPARTMENTS: AccessPolicy = AccessPolicy::new("list departments", STAFF_ADMIN);
pub const GET_DEPARTMENT: AccessPolicy = AccessPolicy::new("get department", ANY_EMPLOYEE);
pub const UPDATE_DEPARTMENT: AccessPolicy = AccessPolicy::new("update department", STAFF_ADMIN);
pub const DELETE_DEPARTMENT: AccessPolicy = AccessPolicy::new("delete department", STAFF_ADMIN);

pub const WHOAMI: AccessPolicy = AccessPolicy::new("whoami", ANY_EMPLOYEE);

/// Check the caller against a route policy.
pub fn authorize_route(
    policy: &AccessPolicy,
    principal: Option<&PrincipalContext>,
) -> Result<(), AuthzError> {
    policy.enforce(principal.map(PrincipalContext::claims))
}
