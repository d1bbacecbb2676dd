use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::criteria::Criteria;
use crate::database::manager::DatabaseError;
use crate::database::pagination::{Page, PageRequest, SortOrder};

/// A row type backed by one table.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Human-readable name used in not-found messages.
    const LABEL: &'static str;
    /// `(api field, column)` pairs accepted by `sort=`.
    const SORTABLE: &'static [(&'static str, &'static str)];
}

/// Generic read/delete access for an [`Entity`]. Inserts and updates live in
/// the per-entity repositories.
pub struct Repository<T> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        self.find_one(&Criteria::new().eq("id", id)).await
    }

    /// Like `find_by_id`, but absent rows become `DatabaseError::NotFound`.
    pub async fn get(&self, id: Uuid) -> Result<T, DatabaseError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found with id: {}", T::LABEL, id)))
    }

    pub async fn find_one(&self, criteria: &Criteria) -> Result<Option<T>, DatabaseError> {
        let mut qb = self.select(criteria);
        qb.push(" LIMIT 1");
        let row = qb.build_query_as::<T>().fetch_optional(&self.pool).await?;
        Ok(row)
    }

    pub async fn find_all(&self, criteria: &Criteria) -> Result<Vec<T>, DatabaseError> {
        let mut qb = self.select(criteria);
        qb.push(" ORDER BY ").push(SortOrder::NEWEST_FIRST.to_sql()).push(", id");
        let rows = qb.build_query_as::<T>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn find_page(&self, criteria: &Criteria, request: &PageRequest) -> Result<Page<T>, DatabaseError> {
        let total = self.count(criteria).await?;

        let mut qb = self.select(criteria);
        qb.push(" ORDER BY ").push(request.sort.to_sql()).push(", id");
        qb.push(" LIMIT ").push_bind(request.limit());
        qb.push(" OFFSET ").push_bind(request.offset());
        let rows = qb.build_query_as::<T>().fetch_all(&self.pool).await?;

        Ok(Page::new(rows, total, request))
    }

    pub async fn count(&self, criteria: &Criteria) -> Result<i64, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        qb.push(T::TABLE);
        criteria.push_where(&mut qb);
        let (count,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(count)
    }

    pub async fn exists(&self, criteria: &Criteria) -> Result<bool, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT EXISTS (SELECT 1 FROM ");
        qb.push(T::TABLE);
        criteria.push_where(&mut qb);
        qb.push(")");
        let (exists,): (bool,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(exists)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.exists(&Criteria::new().eq("id", id)).await
    }

    /// Returns whether a row was removed.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.delete_where(&Criteria::new().eq("id", id)).await? > 0)
    }

    pub async fn delete_where(&self, criteria: &Criteria) -> Result<u64, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        qb.push(T::TABLE);
        criteria.push_where(&mut qb);
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    fn select(&self, criteria: &Criteria) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        qb.push(T::TABLE);
        criteria.push_where(&mut qb);
        qb
    }
}
