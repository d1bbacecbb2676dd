use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::criteria::{escape_like, Criteria};
use crate::database::models::{Pet, PetGender, PetSize, PetSpecies, PetStatus};
use crate::database::pagination::{Page, PageRequest};
use crate::database::repository::Repository;
use crate::database::DatabaseError;

#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub foundation_id: Option<Uuid>,
    pub status: Option<PetStatus>,
    pub species: Option<PetSpecies>,
    pub breed: Option<String>,
    pub gender: Option<PetGender>,
    pub size: Option<PetSize>,
    pub name: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    /// City of the owning foundation.
    pub city: Option<String>,
}

impl PetFilter {
    fn criteria(&self) -> Criteria {
        Criteria::new()
            .eq_opt("foundation_id", self.foundation_id)
            .eq_opt("status", self.status)
            .eq_opt("species", self.species)
            .eq_ignore_case_opt("breed", self.breed.clone())
            .eq_opt("gender", self.gender)
            .eq_opt("size", self.size)
            .contains_opt("name", self.name.clone())
            .gte_opt("age", self.min_age)
            .lte_opt("age", self.max_age)
            .in_subquery_opt(
                "foundation_id",
                "SELECT id FROM foundations WHERE city ILIKE ",
                self.city.as_deref().map(escape_like),
            )
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetStatistics {
    pub total_pets: i64,
    pub available_pets: i64,
    pub pending_pets: i64,
    pub adopted_pets: i64,
    pub unavailable_pets: i64,
}

#[derive(Clone)]
pub struct PetRepository {
    rows: Repository<Pet>,
}

impl PetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { rows: Repository::new(pool) }
    }

    pub async fn get(&self, id: Uuid) -> Result<Pet, DatabaseError> {
        self.rows.get(id).await
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.exists_by_id(id).await
    }

    pub async fn find(&self, filter: &PetFilter) -> Result<Vec<Pet>, DatabaseError> {
        self.rows.find_all(&filter.criteria()).await
    }

    pub async fn find_page(&self, filter: &PetFilter, page: &PageRequest) -> Result<Page<Pet>, DatabaseError> {
        self.rows.find_page(&filter.criteria(), page).await
    }

    pub async fn count(&self, filter: &PetFilter) -> Result<i64, DatabaseError> {
        self.rows.count(&filter.criteria()).await
    }

    pub async fn insert(&self, pet: &Pet) -> Result<Pet, DatabaseError> {
        let row = sqlx::query_as::<_, Pet>(
            "INSERT INTO pets (id, name, species, breed, age, gender, size, description, status, foundation_id, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(pet.id)
        .bind(&pet.name)
        .bind(pet.species)
        .bind(&pet.breed)
        .bind(pet.age)
        .bind(pet.gender)
        .bind(pet.size)
        .bind(&pet.description)
        .bind(pet.status)
        .bind(pet.foundation_id)
        .bind(pet.created_at)
        .bind(pet.updated_at)
        .fetch_one(self.rows.pool())
        .await?;
        Ok(row)
    }

    pub async fn update(&self, pet: &Pet) -> Result<Pet, DatabaseError> {
        let row = sqlx::query_as::<_, Pet>(
            "UPDATE pets SET name = $2, species = $3, breed = $4, age = $5, gender = $6, size = $7, \
             description = $8, status = $9, foundation_id = $10, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(pet.id)
        .bind(&pet.name)
        .bind(pet.species)
        .bind(&pet.breed)
        .bind(pet.age)
        .bind(pet.gender)
        .bind(pet.size)
        .bind(&pet.description)
        .bind(pet.status)
        .bind(pet.foundation_id)
        .fetch_optional(self.rows.pool())
        .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Pet not found with id: {}", pet.id)))
    }

    pub async fn update_status(&self, id: Uuid, status: PetStatus) -> Result<Pet, DatabaseError> {
        let row = sqlx::query_as::<_, Pet>("UPDATE pets SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(self.rows.pool())
            .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Pet not found with id: {}", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.delete_by_id(id).await
    }

    pub async fn statistics(&self, filter: &PetFilter) -> Result<PetStatistics, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) AS total_pets, \
             COUNT(*) FILTER (WHERE status = 'AVAILABLE') AS available_pets, \
             COUNT(*) FILTER (WHERE status = 'PENDING') AS pending_pets, \
             COUNT(*) FILTER (WHERE status = 'ADOPTED') AS adopted_pets, \
             COUNT(*) FILTER (WHERE status = 'UNAVAILABLE') AS unavailable_pets \
             FROM pets",
        );
        filter.criteria().push_where(&mut qb);
        let stats = qb.build_query_as::<PetStatistics>().fetch_one(self.rows.pool()).await?;
        Ok(stats)
    }
}
