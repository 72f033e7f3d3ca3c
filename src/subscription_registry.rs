use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{SubscriberEmail, Subscription};

/// Outcome of a registration attempt
#[derive(Debug)]
pub enum Registration {
    /// The email was new and a subscription has been stored
    Created(Subscription),
    /// A subscription for the same normalized email already exists
    AlreadyExists,
}

/// In-memory subscription store, one record per normalized email
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: DashMap<String, Subscription>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber unless the email is already subscribed
    #[tracing::instrument(
        name = "Registering a subscription",
        skip_all,
        fields(subscriber_email = %email)
    )]
    pub fn register(&self, email: SubscriberEmail) -> Registration {
        match self.subscriptions.entry(email.normalized()) {
            Entry::Occupied(_) => Registration::AlreadyExists,
            Entry::Vacant(slot) => {
                let subscription = Subscription::new(email);
                slot.insert(subscription.clone());
                Registration::Created(subscription)
            }
        }
    }

    /// Look up the subscription of an email, regardless of case
    pub fn find(&self, email: &SubscriberEmail) -> Option<Subscription> {
        self.subscriptions
            .get(&email.normalized())
            .map(|s| s.value().clone())
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
