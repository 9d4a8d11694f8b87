use crate::models::{
    Blog, Career, Developer, LocationSummary, Property, PropertyFilter, Task, Testimonial, User,
};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::{PgPool, query_builder::QueryBuilder, types::Json};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

mod memory;

pub use memory::MemoryRepository;

/// RepoError
///
/// Failures of the persistence layer. Handlers never inspect the variants,
/// they only map them to a 500.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Collection
///
/// The document collections of the site. Each one is a table holding a JSONB
/// document per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Properties,
    Developers,
    Blogs,
    Careers,
    Users,
    Tasks,
    Testimonials,
}

impl Collection {
    /// Collections the admin "delete anything by id" action searches.
    pub const DELETABLE: [Collection; 5] = [
        Collection::Properties,
        Collection::Developers,
        Collection::Testimonials,
        Collection::Blogs,
        Collection::Careers,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Collection::Properties => "properties",
            Collection::Developers => "developers",
            Collection::Blogs => "blogs",
            Collection::Careers => "careers",
            Collection::Users => "users",
            Collection::Tasks => "tasks",
            Collection::Testimonials => "testimonials",
        }
    }
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. Handlers only
/// talk to `Arc<dyn Repository>`, so the Postgres store and the in-memory
/// store are interchangeable.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Listings ---
    /// Newest first.
    async fn list_properties(&self, filter: PropertyFilter) -> Result<Vec<Property>, RepoError>;
    async fn get_property(&self, id: Uuid) -> Result<Option<Property>, RepoError>;
    async fn create_property(&self, property: Property) -> Result<Property, RepoError>;
    /// Replaces the stored document. `None` when the id is unknown.
    async fn update_property(&self, property: Property) -> Result<Option<Property>, RepoError>;
    async fn properties_by_location(&self, location: &str) -> Result<Vec<Property>, RepoError>;
    /// One row per distinct location, sorted by location ascending.
    async fn location_summaries(&self) -> Result<Vec<LocationSummary>, RepoError>;

    // --- Developers ---
    async fn list_developers(&self) -> Result<Vec<Developer>, RepoError>;
    async fn get_developer(&self, id: Uuid) -> Result<Option<Developer>, RepoError>;
    async fn create_developer(&self, developer: Developer) -> Result<Developer, RepoError>;
    async fn update_developer(&self, developer: Developer) -> Result<Option<Developer>, RepoError>;

    // --- Blog ---
    /// Newest first.
    async fn list_blogs(&self) -> Result<Vec<Blog>, RepoError>;
    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, RepoError>;
    async fn create_blog(&self, blog: Blog) -> Result<Blog, RepoError>;
    async fn update_blog(&self, blog: Blog) -> Result<Option<Blog>, RepoError>;

    // --- Careers, leads, tasks ---
    async fn list_careers(&self) -> Result<Vec<Career>, RepoError>;
    async fn create_career(&self, career: Career) -> Result<Career, RepoError>;
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
    async fn create_user(&self, user: User) -> Result<User, RepoError>;
    async fn list_tasks(&self) -> Result<Vec<Task>, RepoError>;

    // --- Testimonials ---
    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, RepoError>;
    async fn get_testimonial(&self, id: Uuid) -> Result<Option<Testimonial>, RepoError>;
    async fn create_testimonial(&self, testimonial: Testimonial) -> Result<Testimonial, RepoError>;
    async fn update_testimonial(
        &self,
        testimonial: Testimonial,
    ) -> Result<Option<Testimonial>, RepoError>;

    // --- Any collection ---
    async fn exists(&self, collection: Collection, id: Uuid) -> Result<bool, RepoError>;
    /// Returns true if a record was removed.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, RepoError>;

    /// All listings of one developer, newest first.
    async fn properties_by_developer(&self, developer: Uuid) -> Result<Vec<Property>, RepoError> {
        self.list_properties(PropertyFilter {
            developer: Some(developer.to_string()),
            ..PropertyFilter::default()
        })
        .await
    }

    /// search_properties
    ///
    /// Literal, case-insensitive substring search over listing name and about
    /// text. An empty query returns every listing.
    async fn search_properties(&self, query: &str) -> Result<Vec<Property>, RepoError> {
        let search = Some(query.trim().to_string()).filter(|q| !q.is_empty());
        self.list_properties(PropertyFilter {
            search,
            ..PropertyFilter::default()
        })
        .await
    }

    async fn delete_property(&self, id: Uuid) -> Result<bool, RepoError> {
        self.delete(Collection::Properties, id).await
    }

    async fn delete_developer(&self, id: Uuid) -> Result<bool, RepoError> {
        self.delete(Collection::Developers, id).await
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, RepoError> {
        self.delete(Collection::Blogs, id).await
    }

    async fn delete_career(&self, id: Uuid) -> Result<bool, RepoError> {
        self.delete(Collection::Careers, id).await
    }

    async fn delete_testimonial(&self, id: Uuid) -> Result<bool, RepoError> {
        self.delete(Collection::Testimonials, id).await
    }

    /// delete_any
    ///
    /// Looks the id up in every deletable collection at once and removes it
    /// wherever it exists. Returns the collections that held it; an empty
    /// result means the id was unknown.
    async fn delete_any(&self, id: Uuid) -> Result<Vec<Collection>, RepoError> {
        let [a, b, c, d, e] = Collection::DELETABLE;
        let found = tokio::try_join!(
            self.exists(a, id),
            self.exists(b, id),
            self.exists(c, id),
            self.exists(d, id),
            self.exists(e, id),
        )?;
        let found = [found.0, found.1, found.2, found.3, found.4];

        let mut removed = Vec::new();
        for (collection, present) in Collection::DELETABLE.into_iter().zip(found) {
            if present && self.delete(collection, id).await? {
                removed.push(collection);
            }
        }
        Ok(removed)
    }
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// like_pattern
///
/// Wraps user text in `%...%` for ILIKE, escaping the LIKE metacharacters so
/// the match stays a literal substring.
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// PostgresRepository
///
/// `Repository` over PostgreSQL. Every collection is a table of
/// `(id, doc JSONB, created_at, updated_at)`; see `migrations/`.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_all<T>(&self, collection: Collection, order: &str) -> Result<Vec<T>, RepoError>
    where
        T: DeserializeOwned + Send + Unpin + 'static,
    {
        let sql = format!("SELECT doc FROM {} ORDER BY {}", collection.table(), order);
        let rows = sqlx::query_scalar::<_, Json<T>>(&sql)
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("{} list error: {:?}", collection.table(), e))?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn fetch_one<T>(&self, collection: Collection, id: Uuid) -> Result<Option<T>, RepoError>
    where
        T: DeserializeOwned + Send + Unpin + 'static,
    {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", collection.table());
        let row = sqlx::query_scalar::<_, Json<T>>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("{} get error: {:?}", collection.table(), e))?;
        Ok(row.map(|Json(doc)| doc))
    }

    async fn insert<T>(&self, collection: Collection, id: Uuid, doc: &T) -> Result<(), RepoError>
    where
        T: Serialize + Sync,
    {
        let sql = format!(
            "INSERT INTO {} (id, doc, created_at, updated_at) VALUES ($1, $2, NOW(), NOW())",
            collection.table()
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("{} insert error: {:?}", collection.table(), e))?;
        Ok(())
    }

    async fn replace<T>(&self, collection: Collection, id: Uuid, doc: &T) -> Result<bool, RepoError>
    where
        T: Serialize + Sync,
    {
        let sql = format!(
            "UPDATE {} SET doc = $2, updated_at = NOW() WHERE id = $1",
            collection.table()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Json(doc))
            .execute(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("{} update error: {:?}", collection.table(), e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// list_properties
    ///
    /// Builds the WHERE clause with QueryBuilder so every user value is bound,
    /// never interpolated.
    async fn list_properties(&self, filter: PropertyFilter) -> Result<Vec<Property>, RepoError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT doc FROM properties WHERE TRUE");

        if !filter.categories.is_empty() {
            builder.push(" AND doc->'categories' ?| ");
            builder.push_bind(filter.categories);
        }
        if let Some(search) = filter.search {
            let pattern = like_pattern(&search);
            builder.push(" AND (doc->>'name' ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR doc->>'about' ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
        if let Some(developer) = filter.developer {
            builder.push(" AND doc->>'developer' = ");
            builder.push_bind(developer);
        }
        if let Some(status) = filter.status {
            builder.push(" AND doc->>'status' = ");
            builder.push_bind(status);
        }
        if let Some(name) = filter.name {
            builder.push(" AND doc->>'name' ILIKE ");
            builder.push_bind(like_pattern(&name));
        }
        builder.push(" ORDER BY created_at DESC");

        let rows = builder
            .build_query_scalar::<Json<Property>>()
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("list_properties error: {:?}", e))?;
        Ok(rows.into_iter().map(|Json(p)| p).collect())
    }

    async fn get_property(&self, id: Uuid) -> Result<Option<Property>, RepoError> {
        self.fetch_one(Collection::Properties, id).await
    }

    async fn create_property(&self, property: Property) -> Result<Property, RepoError> {
        self.insert(Collection::Properties, property.id, &property).await?;
        Ok(property)
    }

    async fn update_property(&self, property: Property) -> Result<Option<Property>, RepoError> {
        let found = self.replace(Collection::Properties, property.id, &property).await?;
        Ok(found.then_some(property))
    }

    async fn properties_by_location(&self, location: &str) -> Result<Vec<Property>, RepoError> {
        let rows = sqlx::query_scalar::<_, Json<Property>>(
            "SELECT doc FROM properties WHERE doc->>'location' = $1 ORDER BY created_at DESC",
        )
        .bind(location)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!("properties_by_location error: {:?}", e))?;
        Ok(rows.into_iter().map(|Json(p)| p).collect())
    }

    /// location_summaries
    ///
    /// Groups listings by location; the image is the first listing's (by
    /// creation time) location image.
    async fn location_summaries(&self) -> Result<Vec<LocationSummary>, RepoError> {
        sqlx::query_as::<_, LocationSummary>(
            r#"
            SELECT
                COALESCE(doc->>'location', '') AS location,
                COUNT(*) AS count,
                COALESCE((array_agg(doc->>'location_image' ORDER BY created_at))[1], '') AS location_image
            FROM properties
            GROUP BY COALESCE(doc->>'location', '')
            ORDER BY location ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("location_summaries error: {:?}", e);
            RepoError::from(e)
        })
    }

    async fn list_developers(&self) -> Result<Vec<Developer>, RepoError> {
        self.fetch_all(Collection::Developers, "created_at ASC").await
    }

    async fn get_developer(&self, id: Uuid) -> Result<Option<Developer>, RepoError> {
        self.fetch_one(Collection::Developers, id).await
    }

    async fn create_developer(&self, developer: Developer) -> Result<Developer, RepoError> {
        self.insert(Collection::Developers, developer.id, &developer).await?;
        Ok(developer)
    }

    async fn update_developer(&self, developer: Developer) -> Result<Option<Developer>, RepoError> {
        let found = self.replace(Collection::Developers, developer.id, &developer).await?;
        Ok(found.then_some(developer))
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, RepoError> {
        self.fetch_all(Collection::Blogs, "created_at DESC").await
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        self.fetch_one(Collection::Blogs, id).await
    }

    async fn create_blog(&self, blog: Blog) -> Result<Blog, RepoError> {
        self.insert(Collection::Blogs, blog.id, &blog).await?;
        Ok(blog)
    }

    async fn update_blog(&self, blog: Blog) -> Result<Option<Blog>, RepoError> {
        let found = self.replace(Collection::Blogs, blog.id, &blog).await?;
        Ok(found.then_some(blog))
    }

    async fn list_careers(&self) -> Result<Vec<Career>, RepoError> {
        self.fetch_all(Collection::Careers, "created_at ASC").await
    }

    async fn create_career(&self, career: Career) -> Result<Career, RepoError> {
        self.insert(Collection::Careers, career.id, &career).await?;
        Ok(career)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        self.fetch_all(Collection::Users, "created_at DESC").await
    }

    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        self.insert(Collection::Users, user.id, &user).await?;
        Ok(user)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, RepoError> {
        self.fetch_all(Collection::Tasks, "created_at DESC").await
    }

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, RepoError> {
        self.fetch_all(Collection::Testimonials, "created_at ASC").await
    }

    async fn get_testimonial(&self, id: Uuid) -> Result<Option<Testimonial>, RepoError> {
        self.fetch_one(Collection::Testimonials, id).await
    }

    async fn create_testimonial(&self, testimonial: Testimonial) -> Result<Testimonial, RepoError> {
        self.insert(Collection::Testimonials, testimonial.id, &testimonial).await?;
        Ok(testimonial)
    }

    async fn update_testimonial(
        &self,
        testimonial: Testimonial,
    ) -> Result<Option<Testimonial>, RepoError> {
        let found = self
            .replace(Collection::Testimonials, testimonial.id, &testimonial)
            .await?;
        Ok(found.then_some(testimonial))
    }

    async fn exists(&self, collection: Collection, id: Uuid) -> Result<bool, RepoError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", collection.table());
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("{} exists error: {:?}", collection.table(), e);
                RepoError::from(e)
            })
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, RepoError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .inspect_err(|e| tracing::error!("{} delete error: {:?}", collection.table(), e))?;
        Ok(result.rows_affected() > 0)
    }
}
