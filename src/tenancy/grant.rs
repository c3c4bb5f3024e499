/*
 * Responsibility
 * - 認可の単位 (resource, action, scope) と、その出どころ (direct / role) の型
 * - DB や JWT 由来の文字列はここの FromStr で閉じた集合に変換する
 */
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::tenancy::types::RoleName;

/// Resource types for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Shop,
    Organization,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Shop => "shop",
            Resource::Organization => "organization",
        }
    }
}

/// Actions that can be performed on resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    List,
    Write,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::List => "list",
            Action::Write => "write",
            Action::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantScope {
    OwnOrganization,
    Global,
}

impl GrantScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantScope::OwnOrganization => "own_organization",
            GrantScope::Global => "global",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseGrantError {
    kind: &'static str,
    value: String,
}

impl ParseGrantError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl FromStr for Resource {
    type Err = ParseGrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shop" => Ok(Resource::Shop),
            "organization" => Ok(Resource::Organization),
            other => Err(ParseGrantError::new("resource", other)),
        }
    }
}

impl FromStr for Action {
    type Err = ParseGrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Action::Read),
            "list" => Ok(Action::List),
            "write" => Ok(Action::Write),
            "delete" => Ok(Action::Delete),
            other => Err(ParseGrantError::new("action", other)),
        }
    }
}

impl FromStr for GrantScope {
    type Err = ParseGrantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "own_organization" => Ok(GrantScope::OwnOrganization),
            "global" => Ok(GrantScope::Global),
            other => Err(ParseGrantError::new("scope", other)),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PermissionGrant {
    pub resource: Resource,
    pub action: Action,
    pub scope: GrantScope,
}

impl PermissionGrant {
    pub const fn new(resource: Resource, action: Action, scope: GrantScope) -> Self {
        Self {
            resource,
            action,
            scope,
        }
    }

    pub const fn own(resource: Resource, action: Action) -> Self {
        Self::new(resource, action, GrantScope::OwnOrganization)
    }

    pub const fn global(resource: Resource, action: Action) -> Self {
        Self::new(resource, action, GrantScope::Global)
    }

    /// DB の行 (resource, action, scope) から組み立てる
    pub fn parse(resource: &str, action: &str, scope: &str) -> Result<Self, ParseGrantError> {
        Ok(Self::new(resource.parse()?, action.parse()?, scope.parse()?))
    }

    pub fn matches(&self, resource: Resource, action: Action) -> bool {
        self.resource == resource && self.action == action
    }
}

impl fmt::Display for PermissionGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}:{}",
            self.resource,
            self.action,
            self.scope.as_str()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum GrantSource {
    Direct,
    Role(RoleName),
}

/// リクエスト開始時に 1 度だけ平坦化された grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveGrant {
    #[serde(flatten)]
    pub grant: PermissionGrant,
    pub source: GrantSource,
}
