use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, RepoError, Repository};
use crate::models::{
    Blog, Career, Developer, LocationSummary, Property, PropertyFilter, Task, Testimonial, User,
};

/// MemoryRepository
///
/// `Repository` kept entirely in process. Records are stored in insertion
/// order, which stands in for `created_at` ordering. Used by the test suite
/// and handy for running the site without a database.
#[derive(Default)]
pub struct MemoryRepository {
    properties: RwLock<Vec<Property>>,
    developers: RwLock<Vec<Developer>>,
    blogs: RwLock<Vec<Blog>>,
    careers: RwLock<Vec<Career>>,
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<Task>>,
    testimonials: RwLock<Vec<Testimonial>>,
    /// When true, every operation fails as if the database were down.
    pub should_fail: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Seeds tasks, which have no write path of their own.
    pub async fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.write().await = tasks;
        self
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.should_fail {
            return Err(RepoError::Unavailable("memory repository set to fail".to_string()));
        }
        Ok(())
    }
}

/// Record access shared by every stored entity.
trait Record: Clone {
    fn id(&self) -> Uuid;
}

macro_rules! record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

record!(Property, Developer, Blog, Career, User, Task, Testimonial);

async fn find<T: Record>(store: &RwLock<Vec<T>>, id: Uuid) -> Option<T> {
    store.read().await.iter().find(|r| r.id() == id).cloned()
}

async fn replace<T: Record>(store: &RwLock<Vec<T>>, record: T) -> Option<T> {
    let mut records = store.write().await;
    let slot = records.iter_mut().find(|r| r.id() == record.id())?;
    *slot = record.clone();
    Some(record)
}

async fn remove<T: Record>(store: &RwLock<Vec<T>>, id: Uuid) -> bool {
    let mut records = store.write().await;
    let before = records.len();
    records.retain(|r| r.id() != id);
    records.len() != before
}

async fn newest_first<T: Record>(store: &RwLock<Vec<T>>) -> Vec<T> {
    store.read().await.iter().rev().cloned().collect()
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_properties(&self, filter: PropertyFilter) -> Result<Vec<Property>, RepoError> {
        self.check()?;
        Ok(self
            .properties
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn get_property(&self, id: Uuid) -> Result<Option<Property>, RepoError> {
        self.check()?;
        Ok(find(&self.properties, id).await)
    }

    async fn create_property(&self, property: Property) -> Result<Property, RepoError> {
        self.check()?;
        self.properties.write().await.push(property.clone());
        Ok(property)
    }

    async fn update_property(&self, property: Property) -> Result<Option<Property>, RepoError> {
        self.check()?;
        Ok(replace(&self.properties, property).await)
    }

    async fn properties_by_location(&self, location: &str) -> Result<Vec<Property>, RepoError> {
        self.check()?;
        Ok(self
            .properties
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| p.details.location == location)
            .cloned()
            .collect())
    }

    async fn location_summaries(&self) -> Result<Vec<LocationSummary>, RepoError> {
        self.check()?;
        let mut groups: BTreeMap<String, LocationSummary> = BTreeMap::new();
        for property in self.properties.read().await.iter() {
            let summary = groups
                .entry(property.details.location.clone())
                .or_insert_with(|| LocationSummary {
                    location: property.details.location.clone(),
                    count: 0,
                    location_image: property.media.location_image.clone(),
                });
            summary.count += 1;
        }
        Ok(groups.into_values().collect())
    }

    async fn list_developers(&self) -> Result<Vec<Developer>, RepoError> {
        self.check()?;
        Ok(self.developers.read().await.clone())
    }

    async fn get_developer(&self, id: Uuid) -> Result<Option<Developer>, RepoError> {
        self.check()?;
        Ok(find(&self.developers, id).await)
    }

    async fn create_developer(&self, developer: Developer) -> Result<Developer, RepoError> {
        self.check()?;
        self.developers.write().await.push(developer.clone());
        Ok(developer)
    }

    async fn update_developer(&self, developer: Developer) -> Result<Option<Developer>, RepoError> {
        self.check()?;
        Ok(replace(&self.developers, developer).await)
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, RepoError> {
        self.check()?;
        Ok(newest_first(&self.blogs).await)
    }

    async fn get_blog(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        self.check()?;
        Ok(find(&self.blogs, id).await)
    }

    async fn create_blog(&self, blog: Blog) -> Result<Blog, RepoError> {
        self.check()?;
        self.blogs.write().await.push(blog.clone());
        Ok(blog)
    }

    async fn update_blog(&self, blog: Blog) -> Result<Option<Blog>, RepoError> {
        self.check()?;
        Ok(replace(&self.blogs, blog).await)
    }

    async fn list_careers(&self) -> Result<Vec<Career>, RepoError> {
        self.check()?;
        Ok(self.careers.read().await.clone())
    }

    async fn create_career(&self, career: Career) -> Result<Career, RepoError> {
        self.check()?;
        self.careers.write().await.push(career.clone());
        Ok(career)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        self.check()?;
        Ok(newest_first(&self.users).await)
    }

    async fn create_user(&self, user: User) -> Result<User, RepoError> {
        self.check()?;
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, RepoError> {
        self.check()?;
        Ok(newest_first(&self.tasks).await)
    }

    async fn list_testimonials(&self) -> Result<Vec<Testimonial>, RepoError> {
        self.check()?;
        Ok(self.testimonials.read().await.clone())
    }

    async fn get_testimonial(&self, id: Uuid) -> Result<Option<Testimonial>, RepoError> {
        self.check()?;
        Ok(find(&self.testimonials, id).await)
    }

    async fn create_testimonial(&self, testimonial: Testimonial) -> Result<Testimonial, RepoError> {
        self.check()?;
        self.testimonials.write().await.push(testimonial.clone());
        Ok(testimonial)
    }

    async fn update_testimonial(
        &self,
        testimonial: Testimonial,
    ) -> Result<Option<Testimonial>, RepoError> {
        self.check()?;
        Ok(replace(&self.testimonials, testimonial).await)
    }

    async fn exists(&self, collection: Collection, id: Uuid) -> Result<bool, RepoError> {
        self.check()?;
        let found = match collection {
            Collection::Properties => find(&self.properties, id).await.is_some(),
            Collection::Developers => find(&self.developers, id).await.is_some(),
            Collection::Blogs => find(&self.blogs, id).await.is_some(),
            Collection::Careers => find(&self.careers, id).await.is_some(),
            Collection::Users => find(&self.users, id).await.is_some(),
            Collection::Tasks => find(&self.tasks, id).await.is_some(),
            Collection::Testimonials => find(&self.testimonials, id).await.is_some(),
        };
        Ok(found)
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, RepoError> {
        self.check()?;
        let removed = match collection {
            Collection::Properties => remove(&self.properties, id).await,
            Collection::Developers => remove(&self.developers, id).await,
            Collection::Blogs => remove(&self.blogs, id).await,
            Collection::Careers => remove(&self.careers, id).await,
            Collection::Users => remove(&self.users, id).await,
            Collection::Tasks => remove(&self.tasks, id).await,
            Collection::Testimonials => remove(&self.testimonials, id).await,
        };
        Ok(removed)
    }
}
