//! Newsletter service

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::validation::{is_unique_violation, required_email, FieldErrors, SubmissionError};
use crate::db::repositories::NewsletterRepository;
use crate::models::Subscriber;

pub const ALREADY_SUBSCRIBED: &str = "Newsletter with this Email already exists.";

/// Raw newsletter signup form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterForm {
    pub email: Option<String>,
}

pub struct NewsletterService {
    repo: Arc<dyn NewsletterRepository>,
}

impl NewsletterService {
    pub fn new(repo: Arc<dyn NewsletterRepository>) -> Self {
        Self { repo }
    }

    /// Subscribe an email address that is not yet on the list
    pub async fn subscribe(&self, form: &NewsletterForm) -> Result<Subscriber, SubmissionError> {
        let mut errors = FieldErrors::new();
        let Some(email) = required_email(&mut errors, "email", form.email.as_deref()) else {
            return Err(SubmissionError::Invalid(errors));
        };

        if self.repo.exists_by_email(&email).await? {
            errors.add("email", ALREADY_SUBSCRIBED);
            return Err(SubmissionError::Invalid(errors));
        }

        match self.repo.create(&email).await {
            Ok(subscriber) => {
                tracing::info!("New newsletter subscriber {}", subscriber.id);
                Ok(subscriber)
            }
            // lost a race with a concurrent signup for the same address
            Err(err) if is_unique_violation(&err) => {
                errors.add("email", ALREADY_SUBSCRIBED);
                Err(SubmissionError::Invalid(errors))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxNewsletterRepository;
    use crate::db::{create_test_pool, migrations};

    async fn service() -> NewsletterService {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        NewsletterService::new(SqlxNewsletterRepository::boxed(pool))
    }

    fn form(email: &str) -> NewsletterForm {
        NewsletterForm {
            email: Some(email.to_string()),
        }
    }

    #[tokio::test]
    async fn test_subscribe() {
        let service = service().await;
        let subscriber = service.subscribe(&form("new@example.com")).await.unwrap();
        assert_eq!(subscriber.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_subscribe_twice_is_invalid() {
        let service = service().await;
        service.subscribe(&form("twice@example.com")).await.unwrap();

        match service.subscribe(&form("twice@example.com")).await {
            Err(SubmissionError::Invalid(errors)) => {
                assert_eq!(errors.get("email").unwrap()[0], ALREADY_SUBSCRIBED);
            }
            other => panic!("expected invalid submission, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_or_malformed_email() {
        let service = service().await;
        assert!(matches!(
            service.subscribe(&NewsletterForm::default()).await,
            Err(SubmissionError::Invalid(_))
        ));
        assert!(matches!(
            service.subscribe(&form("nope")).await,
            Err(SubmissionError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_unique_violation_detected() {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        let repo = SqlxNewsletterRepository::new(pool);
        repo.create("x@example.com").await.unwrap();

        let err = repo.create("x@example.com").await.unwrap_err();
        assert!(is_unique_violation(&err));
    }
}
