use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub connection_id: Uuid,
    pub sender: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// The two ends of a vendor/client thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Vendor,
    Client,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Vendor => "vendor",
            Sender::Client => "client",
        }
    }

    /// The side whose messages this side reads.
    pub fn counterpart(&self) -> Sender {
        match self {
            Sender::Vendor => Sender::Client,
            Sender::Client => Sender::Vendor,
        }
    }
}

#[derive(Debug)]
pub struct CreateMessage {
    pub connection_id: Uuid,
    pub sender: Sender,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_side_reads_the_other() {
        assert_eq!(Sender::Vendor.counterpart(), Sender::Client);
        assert_eq!(Sender::Client.counterpart().as_str(), "vendor");
    }

    #[test]
    fn sender_serializes_as_stored() {
        assert_eq!(serde_json::to_value(Sender::Client).unwrap(), "client");
    }
}
