//! Domain records exchanged with the restaurant API.
//!
//! The request client treats entities as opaque JSON; these types are the
//! typed view used by the convenience calls and the CLI.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned record identifier
pub type RecordId = i64;

/// The four collections exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Customers,
    Restaurants,
    Tables,
    Reservations,
}

impl Entity {
    pub const ALL: [Entity; 4] = [
        Entity::Customers,
        Entity::Restaurants,
        Entity::Tables,
        Entity::Reservations,
    ];

    /// Collection path relative to the API root
    pub fn collection_path(&self) -> &'static str {
        match self {
            Entity::Customers => "/customers",
            Entity::Restaurants => "/restaurants",
            Entity::Tables => "/tables",
            Entity::Reservations => "/reservations",
        }
    }

    pub fn item_path(&self, id: RecordId) -> String {
        format!("{}/{}", self.collection_path(), id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_path().trim_start_matches('/'))
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_matches('/').to_ascii_lowercase();
        Entity::ALL
            .into_iter()
            .find(|e| e.to_string() == wanted)
            .ok_or_else(|| format!("unknown entity '{}'", s))
    }
}

/// Binds a typed record to the collection it lives in.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    const ENTITY: Entity;

    fn id(&self) -> Option<RecordId>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub restaurant_id: Option<RecordId>,
    pub table_number: i32,
    pub capacity: i32,
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub customer_id: Option<RecordId>,
    pub table_id: Option<RecordId>,
    /// Local wall-clock time, serialized without a zone (`2024-05-01T19:30:00`)
    pub reservation_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub duration_minutes: i32,
    pub status: Option<String>,
    #[serde(default)]
    pub num_guests: i32,
}

impl Resource for Customer {
    const ENTITY: Entity = Entity::Customers;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}

impl Resource for Restaurant {
    const ENTITY: Entity = Entity::Restaurants;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}

impl Resource for Table {
    const ENTITY: Entity = Entity::Tables;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}

impl Resource for Reservation {
    const ENTITY: Entity = Entity::Reservations;

    fn id(&self) -> Option<RecordId> {
        self.id
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_paths() {
        assert_eq!(Entity::Customers.collection_path(), "/customers");
        assert_eq!(Entity::Reservations.item_path(42), "/reservations/42");
    }

    #[test]
    fn test_entity_from_str() {
        assert_eq!("tables".parse::<Entity>().unwrap(), Entity::Tables);
        assert_eq!("/Restaurants".parse::<Entity>().unwrap(), Entity::Restaurants);
        assert!("waiters".parse::<Entity>().is_err());
    }

    #[test]
    fn test_reservation_uses_backend_field_names() {
        let json = serde_json::json!({
            "id": 7,
            "customerId": 1,
            "tableId": 3,
            "reservationTime": "2024-05-01T19:30:00",
            "durationMinutes": 90,
            "status": "CONFIRMED",
            "numGuests": 4
        });
        let reservation: Reservation = serde_json::from_value(json).unwrap();
        assert_eq!(reservation.id(), Some(7));
        assert_eq!(reservation.num_guests, 4);
        assert_eq!(
            reservation.reservation_time.unwrap().to_string(),
            "2024-05-01 19:30:00"
        );
    }

    #[test]
    fn test_new_record_omits_id() {
        let customer = Customer {
            id: None,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
        };
        let json = serde_json::to_value(&customer).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_table_field_names() {
        let table: Table = serde_json::from_str(
            r#"{"id":2,"restaurantId":1,"tableNumber":12,"capacity":6,"available":true}"#,
        )
        .unwrap();
        assert_eq!(table.restaurant_id, Some(1));
        assert_eq!(table.table_number, 12);
        assert!(table.available);
    }
}
