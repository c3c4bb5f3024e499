/*
 * Responsibility
 * - resource tag → {テーブル, テナント列, 必要な scope} の宣言的テーブル
 * - Enforcer (filter の列名) と repos (SQL) が同じ定義を参照する
 *
 * 置かないもの
 * - 動的なモデル生成。リソースが増えたらここに 1 行足す
 */
use crate::tenancy::grant::{GrantScope, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    pub resource: Resource,
    pub table: &'static str,
    /// ScopeFilter が等値比較する列
    pub tenant_column: &'static str,
    /// 要求を満たせる最も狭い scope。Global なら own-organization grant では足りない
    pub required_scope: GrantScope,
}

const SHOP: ResourceSpec = ResourceSpec {
    resource: Resource::Shop,
    table: "shops",
    tenant_column: "organization_id",
    required_scope: GrantScope::OwnOrganization,
};

// organization 自身は id 列がテナント境界
const ORGANIZATION: ResourceSpec = ResourceSpec {
    resource: Resource::Organization,
    table: "organizations",
    tenant_column: "id",
    required_scope: GrantScope::OwnOrganization,
};

const SPECS: &[ResourceSpec] = &[SHOP, ORGANIZATION];

/// Resource は閉じた enum なので、ここは網羅 match で必ず引ける
pub const fn spec_for(resource: Resource) -> &'static ResourceSpec {
    match resource {
        Resource::Shop => &SHOP,
        Resource::Organization => &ORGANIZATION,
    }
}

pub fn all() -> &'static [ResourceSpec] {
    SPECS
}
