//! Roles and request sessions.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::error::DomainError;

/// Role held by the actor behind a session.
///
/// Roles form a fixed total order used for minimum-privilege checks:
/// `brand_admin > ops_admin > brand_member > creator > fan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    BrandAdmin,
    OpsAdmin,
    BrandMember,
    Creator,
    Fan,
}

impl Role {
    /// Position in the privilege order; higher ranks may do more.
    pub fn rank(self) -> u8 {
        match self {
            Self::BrandAdmin => 5,
            Self::OpsAdmin => 4,
            Self::BrandMember => 3,
            Self::Creator => 2,
            Self::Fan => 1,
        }
    }

    /// Returns the slug used for serialization and session payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BrandAdmin => "brand_admin",
            Self::OpsAdmin => "ops_admin",
            Self::BrandMember => "brand_member",
            Self::Creator => "creator",
            Self::Fan => "fan",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::BrandAdmin => "Brand admin",
            Self::OpsAdmin => "Ops admin",
            Self::BrandMember => "Brand member",
            Self::Creator => "Creator",
            Self::Fan => "Fan",
        }
    }

    /// Returns all roles, highest rank first.
    pub fn all() -> &'static [Role] {
        &[
            Self::BrandAdmin,
            Self::OpsAdmin,
            Self::BrandMember,
            Self::Creator,
            Self::Fan,
        ]
    }

    /// True when this role meets or exceeds `minimum`.
    pub fn at_least(self, minimum: Role) -> bool {
        self.rank() >= minimum.rank()
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brand_admin" => Ok(Self::BrandAdmin),
            "ops_admin" => Ok(Self::OpsAdmin),
            "brand_member" => Ok(Self::BrandMember),
            "creator" => Ok(Self::Creator),
            "fan" => Ok(Self::Fan),
            other => Err(DomainError::unknown_role(other)),
        }
    }
}

/// Request-scoped identity: tenant, user, and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self {
            tenant_id: None,
            user_id: None,
            role,
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Tenant id when present and non-empty.
    pub fn tenant(&self) -> Option<&str> {
        self.tenant_id.as_deref().filter(|id| !id.is_empty())
    }
}
