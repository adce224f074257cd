use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::domain::Role;
use crate::proximity::GeoPoint;

/// Public view of a user attached to other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub user_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A service a worker offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListing {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Worker joined with its user and the user's location, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatedWorker {
    #[serde(flatten)]
    pub worker: Worker,
    pub user: UserSummary,
    pub location: Option<Location>,
}

impl LocatedWorker {
    pub fn point(&self) -> Option<GeoPoint> {
        self.location.as_ref().map(Location::point)
    }

    pub fn card(&self) -> WorkerCard {
        WorkerCard {
            id: self.worker.id,
            user_id: self.worker.user_id,
            name: self.user.name.clone(),
            email: self.user.email.clone(),
            phone: self.user.phone.clone(),
            location: self.location.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    #[serde(flatten)]
    pub worker: Worker,
    pub user: UserSummary,
    pub skills: Vec<String>,
    pub services: Vec<ServiceListing>,
    pub location: Option<Location>,
}

/// Worker details embedded in nearby listing results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerCard {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyListing {
    #[serde(flatten)]
    pub listing: ServiceListing,
    pub worker: WorkerCard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationWithUser {
    #[serde(flatten)]
    pub location: Location,
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub worker_id: Uuid,
    pub service_date: DateTime<Utc>,
    pub status: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacement {
    pub order: Order,
    pub whatsapp_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfileInput {
    pub bio: Option<String>,
    pub price: Option<f64>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub worker_id: Uuid,
    pub service_date: DateTime<Utc>,
    pub note: Option<String>,
}

pub(crate) fn to_utc(t: chrono::DateTime<chrono::FixedOffset>) -> DateTime<Utc> {
    t.with_timezone(&Utc)
}

impl From<models::location::Model> for Location {
    fn from(m: models::location::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            latitude: m.latitude,
            longitude: m.longitude,
            address: m.address,
            created_at: to_utc(m.created_at),
            updated_at: to_utc(m.updated_at),
        }
    }
}

impl From<models::worker::Model> for Worker {
    fn from(m: models::worker::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            bio: m.bio,
            price: m.price,
            created_at: to_utc(m.created_at),
            updated_at: to_utc(m.updated_at),
        }
    }
}

impl From<models::service_listing::Model> for ServiceListing {
    fn from(m: models::service_listing::Model) -> Self {
        Self {
            id: m.id,
            worker_id: m.worker_id,
            title: m.title,
            description: m.description,
            price: m.price,
            created_at: to_utc(m.created_at),
            updated_at: to_utc(m.updated_at),
        }
    }
}

impl From<models::service_order::Model> for Order {
    fn from(m: models::service_order::Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            worker_id: m.worker_id,
            service_date: to_utc(m.service_date),
            status: m.status,
            note: m.note,
            created_at: to_utc(m.created_at),
            updated_at: to_utc(m.updated_at),
        }
    }
}
