/*!
 * Multi-tenant request authorization
 *
 * Responsibility:
 * - Tenant Resolver: principal + organization ヘッダ → OrganizationContext
 * - Access Enforcer: (context, resource, action) → ScopeFilter | Forbidden
 * - ロール / リソースの宣言的テーブル
 *
 * HTTP / SQL には依存しない。axum との接続は api::v1::extractors、SQL への変換は repos::scope
 */

pub mod context;
pub mod enforcer;
pub mod error;
pub mod filter;
pub mod grant;
pub mod resolver;
pub mod resources;
pub mod roles;
pub mod store;
pub mod types;

pub use context::OrganizationContext;
pub use enforcer::AccessEnforcer;
pub use error::{StoreError, StoreResult, TenancyError};
pub use filter::ScopeFilter;
pub use grant::{Action, EffectiveGrant, GrantScope, GrantSource, PermissionGrant, Resource};
pub use resolver::TenantResolver;
pub use roles::RoleCatalog;
pub use store::{OrganizationStore, PrincipalStore};
pub use types::{Organization, OrganizationId, Principal, RoleAssignment, RoleName};
