/*
 * Responsibility
 * - SQLx (PostgreSQL) によるストレージ実装
 * - tenancy の store trait と ShopStore を実装する
 */
pub mod error;
pub mod organization_repo;
pub mod principal_repo;
pub mod scope;
pub mod shop_repo;

pub use organization_repo::PgOrganizationRepo;
pub use principal_repo::PgPrincipalRepo;
pub use shop_repo::{PgShopRepo, ShopStore};
