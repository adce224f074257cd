use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Url;
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{OrderInput, OrderPlacement};
use super::repository::OrderRepository;
use crate::auth::domain::{AuthContext, Role};
use crate::errors::ServiceError;

pub struct OrderService<R: OrderRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: OrderRepository + ?Sized> OrderService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a PENDING order for the calling client and build a WhatsApp
    /// deep link to the worker when the worker has a phone number.
    #[instrument(skip(self, ctx, input), fields(user_id = %ctx.user_id, worker_id = %input.worker_id))]
    pub async fn place(&self, ctx: &AuthContext, input: OrderInput) -> Result<OrderPlacement, ServiceError> {
        ctx.require_role(&[Role::Client])?;
        let worker = self
            .repo
            .find_worker(input.worker_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Worker"))?;
        let phone = self.repo.find_user(worker.user_id).await?.and_then(|u| u.phone);

        let input = OrderInput { note: input.note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()), ..input };
        let order = self.repo.create_order(ctx.user_id, &input).await?;
        let whatsapp_url = phone.as_deref().and_then(|p| whatsapp_url(p, order.id, order.service_date));
        info!(order_id = %order.id, has_whatsapp = whatsapp_url.is_some(), "order_placed");
        Ok(OrderPlacement { order, whatsapp_url })
    }
}

/// `https://wa.me/<digits>?text=Order ID: <id> - Date: <date>`, `None` when
/// the phone holds no digits.
pub fn whatsapp_url(phone: &str, order_id: Uuid, service_date: DateTime<Utc>) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let text = format!(
        "Order ID: {} - Date: {}",
        order_id,
        service_date.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    Url::parse_with_params(&format!("https://wa.me/{digits}"), &[("text", text)])
        .ok()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::errors::AuthError;
    use crate::mock::InMemoryStore;
    use chrono::TimeZone;

    #[test]
    fn whatsapp_url_encodes_text_and_keeps_digits() {
        let id = Uuid::nil();
        let date = Utc.with_ymd_and_hms(2025, 9, 1, 10, 0, 0).unwrap();
        let url = whatsapp_url("+62 812-3456", id, date).unwrap();
        assert!(url.starts_with("https://wa.me/628123456?text="));
        let parsed = Url::parse(&url).unwrap();
        let (_, text) = parsed.query_pairs().next().unwrap();
        assert_eq!(text, format!("Order ID: {id} - Date: 2025-09-01T10:00:00Z"));
        assert!(whatsapp_url("n/a", id, date).is_none());
    }

    #[tokio::test]
    async fn placing_an_order_links_to_the_worker() {
        let store = Arc::new(InMemoryStore::default());
        let (worker_user, worker_id) = store.put_worker("Tono", "tono@example.com");
        store.set_phone(worker_user, "6281111");
        let client = store.put_user("Lia", "lia@example.com", Role::Client);
        let svc = OrderService::new(store.clone());

        let placed = svc
            .place(
                &AuthContext::new(client, Role::Client),
                OrderInput { worker_id, service_date: Utc::now(), note: Some("  ".into()) },
            )
            .await
            .unwrap();
        assert_eq!(placed.order.status, "PENDING");
        assert_eq!(placed.order.client_id, client);
        assert!(placed.order.note.is_none());
        assert!(placed.whatsapp_url.unwrap().starts_with("https://wa.me/6281111?text=Order+ID"));
    }

    #[tokio::test]
    async fn worker_without_phone_has_no_link() {
        let store = Arc::new(InMemoryStore::default());
        let (_, worker_id) = store.put_worker("Tono", "tono@example.com");
        let client = store.put_user("Lia", "lia@example.com", Role::Client);
        let placed = OrderService::new(store.clone())
            .place(&AuthContext::new(client, Role::Client), OrderInput { worker_id, service_date: Utc::now(), note: None })
            .await
            .unwrap();
        assert!(placed.whatsapp_url.is_none());
    }

    #[tokio::test]
    async fn unknown_worker_and_wrong_role_are_rejected() {
        let store = Arc::new(InMemoryStore::default());
        let svc = OrderService::new(store.clone());
        let input = OrderInput { worker_id: Uuid::new_v4(), service_date: Utc::now(), note: None };

        let err = svc.place(&AuthContext::new(Uuid::new_v4(), Role::Client), input.clone()).await.unwrap_err();
        assert_eq!(err.to_string(), "Worker not found");
        let err = svc.place(&AuthContext::new(Uuid::new_v4(), Role::Worker), input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Auth(AuthError::Forbidden)));
    }
}
