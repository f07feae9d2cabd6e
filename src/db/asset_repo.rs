// src/db/asset_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::asset::{Asset, AssetChanges, AssetFilter, ColumnValue},
};

#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

// Bind tipado de um valor já convertido
fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &ColumnValue) {
    match value.clone() {
        ColumnValue::Text(v) => qb.push_bind(v),
        ColumnValue::Boolean(v) => qb.push_bind(v),
        ColumnValue::Timestamp(v) => qb.push_bind(v),
        ColumnValue::Decimal(v) => qb.push_bind(v),
        ColumnValue::Integer(v) => qb.push_bind(v),
        ColumnValue::Json(v) => qb.push_bind(v),
    };
}

// Escapa os curingas do LIKE para que a busca seja por substring literal
pub(crate) fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    /// Ativos não excluídos, com filtros de status/tipo e busca textual (OR).
    pub async fn list(&self, filter: &AssetFilter) -> Result<Vec<Asset>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM assets WHERE is_deleted = FALSE");

        if let Some(status) = &filter.status {
            qb.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(asset_type) = &filter.asset_type {
            qb.push(" AND type = ").push_bind(asset_type.clone());
        }
        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR address ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR city ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let assets = qb.build_query_as::<Asset>().fetch_all(&self.pool).await?;
        Ok(assets)
    }

    /// Busca por ID, inclusive ativos excluídos logicamente.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(asset)
    }

    // ---
    // Escrita (aceitam a transação do serviço como executor)
    // ---

    pub async fn insert<'e, E>(&self, executor: E, changes: &AssetChanges) -> Result<Asset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO assets (");
        let mut columns = qb.separated(", ");
        for (column, _) in changes.iter() {
            columns.push(column);
        }

        qb.push(") VALUES (");
        for (index, (_, value)) in changes.iter().enumerate() {
            if index > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, value);
        }
        qb.push(") RETURNING *");

        let asset = qb.build_query_as::<Asset>().fetch_one(executor).await?;
        Ok(asset)
    }

    /// Aplica as alterações a um ativo não excluído. `None` se nada casou.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &AssetChanges,
    ) -> Result<Option<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE assets SET ");
        for (column, value) in changes.iter() {
            qb.push(column).push(" = ");
            push_value(&mut qb, value);
            qb.push(", ");
        }
        qb.push("updated_at = NOW() WHERE id = ")
            .push_bind(id)
            .push(" AND is_deleted = FALSE RETURNING *");

        let asset = qb.build_query_as::<Asset>().fetch_optional(executor).await?;
        Ok(asset)
    }

    /// Marca como excluído. Retorna `false` se o ativo não existe ou já estava excluído.
    pub async fn soft_delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE assets SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a linha definitivamente (inclusive se já excluída logicamente).
    pub async fn hard_delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_is_wrapped_and_escaped() {
        assert_eq!(like_pattern("lekki"), "%lekki%");
        assert_eq!(like_pattern(" 100%_off "), "%100\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
