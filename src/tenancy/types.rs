/*
 * Responsibility
 * - テナント境界の登場人物 (Principal / Organization / RoleAssignment) の型
 * - リクエスト中は不変。永続化は repos 側の責務
 */
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tenancy::grant::PermissionGrant;

/// Organization (tenant) の識別子。形式は不透明な文字列として扱う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

impl OrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrganizationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ロールの割り当て
///
/// - `organization: Some(org)` は org のメンバーとしてのロール
/// - `organization: None` はプラットフォーム全体のロール (メンバーシップにはならない)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub role: RoleName,
    pub organization: Option<OrganizationId>,
}

impl RoleAssignment {
    pub fn in_organization(role: impl Into<String>, organization: impl Into<OrganizationId>) -> Self {
        Self {
            role: RoleName::new(role),
            organization: Some(organization.into()),
        }
    }

    pub fn platform(role: impl Into<String>) -> Self {
        Self {
            role: RoleName::new(role),
            organization: None,
        }
    }

    /// この割り当てが `organization` のコンテキストで有効か
    pub fn applies_to(&self, organization: &OrganizationId) -> bool {
        match &self.organization {
            Some(org) => org == organization,
            None => true,
        }
    }
}

/// 認証済みの主体
///
/// Identity Resolver (middleware) がリクエストごとに組み立て、以降は読み取り専用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub assignments: Vec<RoleAssignment>,
    pub direct_grants: Vec<PermissionGrant>,
}

impl Principal {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            assignments: Vec::new(),
            direct_grants: Vec::new(),
        }
    }

    pub fn with_assignment(mut self, assignment: RoleAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn with_grant(mut self, grant: PermissionGrant) -> Self {
        self.direct_grants.push(grant);
        self
    }

    /// org 内に 1 つ以上ロールを持っていればメンバー
    pub fn is_member_of(&self, organization: &OrganizationId) -> bool {
        self.assignments
            .iter()
            .any(|a| a.organization.as_ref() == Some(organization))
    }
}

impl From<String> for OrganizationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
