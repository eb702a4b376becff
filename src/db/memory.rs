// src/db/memory.rs
// DOCUMENTATION: Process-local store implementing every repository
// PURPOSE: STORE_BACKEND=memory for local runs without PostgreSQL, and the test harness

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{CampgroundRepository, ReviewRepository, SessionRepository, UserRepository};
use crate::errors::AppError;
use crate::models::*;

#[derive(Default)]
struct MemoryData {
    users: HashMap<Uuid, User>,
    /// Insertion order
    campgrounds: Vec<Campground>,
    /// Insertion order
    reviews: Vec<Review>,
    sessions: HashMap<String, SessionRecord>,
}

/// In-memory store; every operation takes the single lock once
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn campground_count(&self) -> usize {
        self.data.read().await.campgrounds.len()
    }

    pub async fn review_count(&self) -> usize {
        self.data.read().await.reviews.len()
    }
}

fn campground_not_found() -> AppError {
    AppError::ResourceNotFound("Cannot find that campground!".to_string())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, AppError> {
        let mut data = self.data.write().await;

        if data.users.values().any(|u| u.username == user.username) {
            return Err(AppError::ValidationFailed(
                "A user with the given username is already registered".to_string(),
            ));
        }
        if data.users.values().any(|u| u.email == user.email) {
            return Err(AppError::ValidationFailed(
                "A user with the given email is already registered".to_string(),
            ));
        }

        let created = User {
            id: Uuid::new_v4(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: Utc::now(),
        };
        data.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let data = self.data.read().await;
        Ok(data.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.data.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl CampgroundRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Campground>, AppError> {
        let data = self.data.read().await;
        Ok(data.campgrounds.iter().rev().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Campground>, AppError> {
        let data = self.data.read().await;
        Ok(data.campgrounds.iter().find(|c| c.id == id).cloned())
    }

    async fn author_of(&self, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let data = self.data.read().await;
        Ok(data.campgrounds.iter().find(|c| c.id == id).map(|c| c.author_id))
    }

    async fn create(&self, campground: &NewCampground) -> Result<Campground, AppError> {
        let mut data = self.data.write().await;

        let author_username = data
            .users
            .get(&campground.author_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| {
                AppError::UpstreamStoreFailure(format!(
                    "author {} does not exist",
                    campground.author_id
                ))
            })?;

        let now = Utc::now();
        let created = Campground {
            id: Uuid::new_v4(),
            title: campground.title.clone(),
            description: campground.description.clone(),
            price: campground.price,
            location: campground.location.clone(),
            geometry: campground.geometry,
            images: campground.images.clone(),
            author_id: campground.author_id,
            author_username,
            created_at: now,
            updated_at: now,
        };
        data.campgrounds.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: &CampgroundChanges) -> Result<Campground, AppError> {
        let mut data = self.data.write().await;
        let campground = data
            .campgrounds
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(campground_not_found)?;

        campground.title = changes.title.clone();
        campground.description = changes.description.clone();
        campground.price = changes.price;
        campground.location = changes.location.clone();
        if let Some(point) = changes.geometry {
            campground.geometry = point;
        }
        campground.images.extend(changes.add_images.iter().cloned());
        campground
            .images
            .retain(|image| !changes.delete_images.contains(&image.filename));
        campground.updated_at = Utc::now();

        Ok(campground.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let mut data = self.data.write().await;
        let before = data.campgrounds.len();
        data.campgrounds.retain(|c| c.id != id);
        if data.campgrounds.len() == before {
            return Err(campground_not_found());
        }

        let reviews_before = data.reviews.len();
        data.reviews.retain(|r| r.campground_id != id);
        Ok((reviews_before - data.reviews.len()) as u64)
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn list_for_campground(&self, campground_id: Uuid) -> Result<Vec<Review>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .reviews
            .iter()
            .filter(|r| r.campground_id == campground_id)
            .cloned()
            .collect())
    }

    async fn author_of(&self, campground_id: Uuid, review_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .reviews
            .iter()
            .find(|r| r.id == review_id && r.campground_id == campground_id)
            .map(|r| r.author_id))
    }

    async fn create(&self, review: &NewReview) -> Result<Review, AppError> {
        let mut data = self.data.write().await;

        if !data.campgrounds.iter().any(|c| c.id == review.campground_id) {
            return Err(campground_not_found());
        }
        let author_username = data
            .users
            .get(&review.author_id)
            .map(|u| u.username.clone())
            .ok_or_else(|| {
                AppError::UpstreamStoreFailure(format!("author {} does not exist", review.author_id))
            })?;

        let created = Review {
            id: Uuid::new_v4(),
            campground_id: review.campground_id,
            body: review.body.clone(),
            rating: review.rating,
            author_id: review.author_id,
            author_username,
            created_at: Utc::now(),
        };
        data.reviews.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, campground_id: Uuid, review_id: Uuid) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        let before = data.reviews.len();
        data.reviews
            .retain(|r| !(r.id == review_id && r.campground_id == campground_id));
        if data.reviews.len() == before {
            return Err(AppError::ResourceNotFound("Cannot find that review!".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn load(&self, id: &str) -> Result<Option<SessionRecord>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .sessions
            .get(id)
            .filter(|s| !s.is_expired(Utc::now()))
            .cloned())
    }

    async fn save(&self, record: &SessionRecord) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        data.sessions.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), AppError> {
        self.data.write().await.sessions.remove(id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, AppError> {
        let mut data = self.data.write().await;
        let now = Utc::now();
        let before = data.sessions.len();
        data.sessions.retain(|_, s| !s.is_expired(now));
        Ok((before - data.sessions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use geo_types::Point;
    use tokio_test::{assert_err, assert_ok};

    async fn user(store: &MemoryStore, name: &str) -> User {
        store
            .create_user(&NewUser {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    fn new_campground(author_id: Uuid) -> NewCampground {
        NewCampground {
            title: "Ridge".into(),
            description: "Windy".into(),
            price: 10.0,
            location: "Boulder, Colorado".into(),
            geometry: Point::new(-105.27, 40.01),
            images: vec![
                Image { url: "https://cdn.test/upload/a.jpg".into(), filename: "a".into() },
                Image { url: "https://cdn.test/upload/b.jpg".into(), filename: "b".into() },
            ],
            author_id,
        }
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let store = MemoryStore::new();
        user(&store, "falcon").await;
        let err = store
            .create_user(&NewUser {
                username: "falcon".into(),
                email: "other@example.com".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn deleting_a_campground_removes_its_reviews() {
        let store = MemoryStore::new();
        let author = user(&store, "falcon").await;
        let keep = CampgroundRepository::create(&store, &new_campground(author.id))
            .await
            .unwrap();
        let doomed = CampgroundRepository::create(&store, &new_campground(author.id))
            .await
            .unwrap();

        for campground_id in [keep.id, doomed.id, doomed.id] {
            ReviewRepository::create(
                &store,
                &NewReview { campground_id, body: "ok".into(), rating: 4, author_id: author.id },
            )
            .await
            .unwrap();
        }

        let removed = CampgroundRepository::delete(&store, doomed.id).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.review_count().await, 1);
        assert_eq!(store.list_for_campground(doomed.id).await.unwrap().len(), 0);
        assert_err!(CampgroundRepository::delete(&store, doomed.id).await);
    }

    #[tokio::test]
    async fn update_appends_then_removes_images_and_keeps_author() {
        let store = MemoryStore::new();
        let author = user(&store, "falcon").await;
        let created = CampgroundRepository::create(&store, &new_campground(author.id))
            .await
            .unwrap();

        let updated = store
            .update(
                created.id,
                &CampgroundChanges {
                    title: "Ridge Top".into(),
                    description: "Windier".into(),
                    price: 15.0,
                    location: "Boulder, Colorado".into(),
                    geometry: None,
                    add_images: vec![Image {
                        url: "https://cdn.test/upload/c.jpg".into(),
                        filename: "c".into(),
                    }],
                    delete_images: vec!["a".into()],
                },
            )
            .await
            .unwrap();

        let filenames: Vec<_> = updated.images.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(filenames, vec!["b", "c"]);
        assert_eq!(updated.author_id, author.id);
        assert_eq!(updated.geometry, created.geometry);
    }

    #[tokio::test]
    async fn review_on_missing_campground_is_not_found() {
        let store = MemoryStore::new();
        let author = user(&store, "falcon").await;
        let err = ReviewRepository::create(
            &store,
            &NewReview { campground_id: Uuid::new_v4(), body: "hi".into(), rating: 3, author_id: author.id },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn expired_sessions_are_invisible_and_purged() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let record = |id: &str, expires_at| SessionRecord {
            id: id.to_string(),
            user_id: None,
            flash: vec![],
            return_to: None,
            expires_at,
            updated_at: now,
        };

        assert_ok!(store.save(&record("live", now + Duration::hours(1))).await);
        assert_ok!(store.save(&record("stale", now - Duration::seconds(1))).await);

        assert!(store.load("live").await.unwrap().is_some());
        assert!(store.load("stale").await.unwrap().is_none());
        assert_eq!(store.purge_expired().await.unwrap(), 1);
    }
}
