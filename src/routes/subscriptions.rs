use std::fmt;
use std::time::Duration;

use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use crate::domain::{SubscriberEmail, Subscription};
use crate::rate_limiter::{RateLimitDecision, RateLimiter};
use crate::subscription_registry::{Registration, SubscriptionRegistry};
use crate::utils::{client_key, error_chain_fmt};

/// Subscription request body
#[derive(serde::Deserialize)]
pub struct SubscriptionRequest {
    email: String,
}

/// Error body returned to clients
#[derive(serde::Serialize)]
struct ErrorBody {
    detail: String,
}

/// Subscription error
#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: Duration },
    #[error("{0}")]
    InvalidEmail(String),
    #[error("This email address is already subscribed.")]
    DuplicateEmail,
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidEmail(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Self::RateLimited { retry_after } = self {
            // Round up so clients never retry before the window has room
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response.insert_header((header::RETRY_AFTER, HeaderValue::from(secs.max(1))));
        }
        response.json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

/// Subscriptions handler
#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(req, payload, rate_limiter, registry),
    fields(
        client_key = tracing::field::Empty,
        subscriber_email = %payload.email
    )
)]
pub async fn subscribe(
    req: HttpRequest,
    payload: web::Json<SubscriptionRequest>,
    rate_limiter: web::Data<RateLimiter>,
    registry: web::Data<SubscriptionRegistry>,
) -> Result<HttpResponse, SubscribeError> {
    // Throttle the client before looking at the payload
    let client_key = client_key(&req);
    tracing::Span::current().record("client_key", tracing::field::display(&client_key));
    if let RateLimitDecision::Deny { retry_after } = rate_limiter.check(&client_key) {
        tracing::warn!(?retry_after, "Rejecting subscription attempt over the rate limit");
        return Err(SubscribeError::RateLimited { retry_after });
    }

    // Parse subscriber email
    let email =
        SubscriberEmail::parse(payload.into_inner().email).map_err(SubscribeError::InvalidEmail)?;

    // Store the subscription unless the email is already known
    let subscription = register_subscriber(&registry, email)?;
    Ok(HttpResponse::Created().json(subscription))
}

/// Register a subscriber, mapping an existing subscription to a conflict
fn register_subscriber(
    registry: &SubscriptionRegistry,
    email: SubscriberEmail,
) -> Result<Subscription, SubscribeError> {
    match registry.register(email) {
        Registration::Created(subscription) => {
            tracing::info!(subscriber_id = %subscription.id(), "New subscriber registered");
            Ok(subscription)
        }
        Registration::AlreadyExists => {
            tracing::info!("Email address is already subscribed");
            Err(SubscribeError::DuplicateEmail)
        }
    }
}
