/*
 * Responsibility
 * - ScopeFilter を SQL の WHERE 句に束ねる (実行前に絞る。取得後に捨てない)
 */
use sqlx::{Postgres, QueryBuilder};

use crate::tenancy::ScopeFilter;

/// `WHERE ...` の後ろに ` AND <tenant column> = $n` を足す。Unrestricted なら何もしない
///
/// 列名は resource registry の `&'static str` なので、そのまま SQL に埋めてよい。
pub fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &ScopeFilter) {
    if let ScopeFilter::Organization {
        column,
        organization_id,
    } = scope
    {
        qb.push(" AND ")
            .push(*column)
            .push(" = ")
            .push_bind(organization_id.as_str().to_owned());
    }
}
