use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::SubscriberEmail;

/// Newsletter subscription, immutable once created
#[derive(Debug, Clone, serde::Serialize)]
pub struct Subscription {
    id: Uuid,
    email: SubscriberEmail,
    subscribed_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a subscription with a fresh id, stamped with the current UTC time
    pub fn new(email: SubscriberEmail) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            subscribed_at: Utc::now(),
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn email(&self) -> &SubscriberEmail {
        &self.email
    }

    pub const fn subscribed_at(&self) -> DateTime<Utc> {
        self.subscribed_at
    }
}
