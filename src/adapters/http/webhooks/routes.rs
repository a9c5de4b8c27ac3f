//! Axum router configuration for the webhook endpoints.
//!
//! Webhooks carry no user authentication; deliveries are authenticated by
//! signature inside the handlers.

use axum::routing::post;
use axum::Router;

use super::handlers::{handle_identity_webhook, handle_stripe_webhook, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
///
/// - `POST /stripe` - payment provider events (signature in `Stripe-Signature`)
/// - `POST /identity` - identity provider events (signature in svix headers)
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/stripe", post(handle_stripe_webhook))
        .route("/identity", post(handle_identity_webhook))
}

/// Create the webhook module router for mounting at `/api`.
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new().nest("/webhooks", webhook_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::enrollment::{
        test_course, test_purchase, test_user, Course, Purchase, PurchaseStatus, StripeEvent,
        StripeEventData, User,
    };
    use crate::domain::foundation::{CourseId, DomainError, PurchaseId, UserId};
    use crate::domain::identity::{compute_test_signature, IdentityWebhookVerifier};
    use crate::ports::{
        CourseRepository, EnrollmentUnitOfWork, PurchaseRepository, UserRepository,
    };

    // "identity-test-key" base64-encoded
    const IDENTITY_SECRET: &str = "whsec_aWRlbnRpdHktdGVzdC1rZXk=";

    /// In-memory store backing all persistence ports.
    #[derive(Default)]
    struct InMemoryStore {
        purchases: Mutex<HashMap<String, Purchase>>,
        users: Mutex<HashMap<String, User>>,
        courses: Mutex<HashMap<String, Course>>,
        fail_commits: Mutex<bool>,
    }

    impl InMemoryStore {
        fn with_scenario() -> Arc<Self> {
            let store = Self::default();
            store
                .purchases
                .lock()
                .unwrap()
                .insert("P1".to_string(), test_purchase("P1", "U1", "C1"));
            store
                .users
                .lock()
                .unwrap()
                .insert("U1".to_string(), test_user("U1"));
            store
                .courses
                .lock()
                .unwrap()
                .insert("C1".to_string(), test_course("C1"));
            Arc::new(store)
        }
    }

    #[async_trait]
    impl PurchaseRepository for InMemoryStore {
        async fn find_by_id(&self, id: &PurchaseId) -> Result<Option<Purchase>, DomainError> {
            Ok(self.purchases.lock().unwrap().get(id.as_str()).cloned())
        }

        async fn update(&self, purchase: &Purchase) -> Result<(), DomainError> {
            self.purchases
                .lock()
                .unwrap()
                .insert(purchase.id.to_string(), purchase.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryStore {
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
            Ok(self.users.lock().unwrap().get(id.as_str()).cloned())
        }

        async fn upsert(&self, user: &User) -> Result<(), DomainError> {
            self.users
                .lock()
                .unwrap()
                .insert(user.id.to_string(), user.clone());
            Ok(())
        }

        async fn update_profile(&self, user: &User) -> Result<(), DomainError> {
            self.upsert(user).await
        }

        async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
            self.users.lock().unwrap().remove(id.as_str());
            Ok(())
        }
    }

    #[async_trait]
    impl CourseRepository for InMemoryStore {
        async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
            Ok(self.courses.lock().unwrap().get(id.as_str()).cloned())
        }
    }

    #[async_trait]
    impl EnrollmentUnitOfWork for InMemoryStore {
        async fn commit_completion(
            &self,
            purchase: &Purchase,
            user: &User,
            course: &Course,
        ) -> Result<(), DomainError> {
            if *self.fail_commits.lock().unwrap() {
                return Err(DomainError::database("connection lost"));
            }
            self.purchases
                .lock()
                .unwrap()
                .insert(purchase.id.to_string(), purchase.clone());
            self.users
                .lock()
                .unwrap()
                .insert(user.id.to_string(), user.clone());
            self.courses
                .lock()
                .unwrap()
                .insert(course.id.to_string(), course.clone());
            Ok(())
        }
    }

    fn completion_event(purchase_id: &str) -> StripeEvent {
        StripeEvent {
            id: "evt_1".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: chrono::Utc::now().timestamp(),
            data: StripeEventData {
                object: json!({
                    "id": "cs_1",
                    "metadata": { "purchaseId": purchase_id }
                }),
            },
            livemode: false,
            api_version: None,
        }
    }

    fn app(store: Arc<InMemoryStore>, provider: Arc<MockPaymentProvider>) -> Router {
        let state = WebhookAppState {
            purchases: store.clone(),
            users: store.clone(),
            courses: store.clone(),
            enrollment_uow: store,
            payment_provider: provider,
            identity_verifier: Arc::new(IdentityWebhookVerifier::new(IDENTITY_SECRET)),
        };
        webhook_router().with_state(state)
    }

    fn stripe_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhooks/stripe")
            .header("Stripe-Signature", "t=0,v1=00")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn completion_returns_received_true() {
        let store = InMemoryStore::with_scenario();
        let provider = Arc::new(MockPaymentProvider::new());
        provider.set_event(completion_event("P1"));

        let response = app(store.clone(), provider)
            .oneshot(stripe_request("{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"received": true}));
        assert_eq!(
            store.purchases.lock().unwrap().get("P1").unwrap().status,
            PurchaseStatus::Completed
        );
    }

    #[tokio::test]
    async fn missing_signature_header_is_bad_request() {
        let store = InMemoryStore::with_scenario();
        let provider = Arc::new(MockPaymentProvider::new());
        provider.set_event(completion_event("P1"));

        let request = Request::builder()
            .method("POST")
            .uri("/webhooks/stripe")
            .body(Body::from("{}"))
            .unwrap();
        let response = app(store.clone(), provider).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            store.purchases.lock().unwrap().get("P1").unwrap().status,
            PurchaseStatus::Pending
        );
    }

    #[tokio::test]
    async fn failed_verification_is_bad_request() {
        let store = InMemoryStore::with_scenario();
        let provider = Arc::new(MockPaymentProvider::new());
        provider.fail_verification(crate::ports::PaymentError::invalid_webhook("bad sig"));

        let response = app(store.clone(), provider)
            .oneshot(stripe_request("{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn unknown_purchase_is_not_found() {
        let store = InMemoryStore::with_scenario();
        let provider = Arc::new(MockPaymentProvider::new());
        provider.set_event(completion_event("P999"));

        let response = app(store, provider)
            .oneshot(stripe_request("{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn commit_failure_is_internal_error() {
        let store = InMemoryStore::with_scenario();
        *store.fail_commits.lock().unwrap() = true;
        let provider = Arc::new(MockPaymentProvider::new());
        provider.set_event(completion_event("P1"));

        let response = app(store, provider)
            .oneshot(stripe_request("{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["message"].as_str().unwrap().contains("connection lost"));
    }

    #[tokio::test]
    async fn unrecognized_event_is_acknowledged() {
        let store = InMemoryStore::with_scenario();
        let provider = Arc::new(MockPaymentProvider::new());
        provider.set_event(StripeEvent {
            id: "evt_other".to_string(),
            event_type: "customer.created".to_string(),
            created: chrono::Utc::now().timestamp(),
            data: StripeEventData { object: json!({}) },
            livemode: false,
            api_version: None,
        });

        let response = app(store.clone(), provider)
            .oneshot(stripe_request("{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"received": true}));
        assert_eq!(
            store.purchases.lock().unwrap().get("P1").unwrap().status,
            PurchaseStatus::Pending
        );
    }

    #[tokio::test]
    async fn identity_create_returns_empty_object() {
        let store = InMemoryStore::with_scenario();
        let provider = Arc::new(MockPaymentProvider::new());

        let payload = serde_json::to_vec(&json!({
            "type": "user.created",
            "data": {
                "id": "user_new",
                "email_addresses": [{"email_address": "new@example.com"}],
                "first_name": "New",
                "last_name": "User"
            }
        }))
        .unwrap();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = compute_test_signature(IDENTITY_SECRET, "msg_1", timestamp, &payload);

        let request = Request::builder()
            .method("POST")
            .uri("/webhooks/identity")
            .header("svix-id", "msg_1")
            .header("svix-timestamp", timestamp.to_string())
            .header("svix-signature", format!("v1,{}", signature))
            .body(Body::from(payload))
            .unwrap();
        let response = app(store.clone(), provider).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({}));
        assert!(store.users.lock().unwrap().contains_key("user_new"));
    }

    #[tokio::test]
    async fn identity_without_svix_headers_is_bad_request() {
        let store = InMemoryStore::with_scenario();
        let provider = Arc::new(MockPaymentProvider::new());

        let request = Request::builder()
            .method("POST")
            .uri("/webhooks/identity")
            .body(Body::from("{}"))
            .unwrap();
        let response = app(store, provider).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn identity_with_bad_signature_is_bad_request() {
        let store = InMemoryStore::with_scenario();
        let provider = Arc::new(MockPaymentProvider::new());

        let request = Request::builder()
            .method("POST")
            .uri("/webhooks/identity")
            .header("svix-id", "msg_1")
            .header("svix-timestamp", chrono::Utc::now().timestamp().to_string())
            .header("svix-signature", "v1,AAAA")
            .body(Body::from(r#"{"type":"user.created","data":{"id":"user_x"}}"#))
            .unwrap();
        let response = app(store.clone(), provider).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!store.users.lock().unwrap().contains_key("user_x"));
    }
}
