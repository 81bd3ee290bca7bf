//! P2P purchase orders and the dashboard figures derived from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle state of a P2P order.
///
/// PENDING -> PAID -> CONFIRMED, or PENDING/PAID -> CANCELLED. Transitions
/// are owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Paid,
    Confirmed,
    Cancelled,
    /// A status this console does not know about. No actions are offered.
    Unknown,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable badge text.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }

    /// Confirmation is only offered once the buyer has paid.
    pub const fn can_confirm(self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Cancellation is offered until the order is settled.
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PENDING" => Self::Pending,
            "PAID" => Self::Paid,
            "CONFIRMED" => Self::Confirmed,
            "CANCELLED" => Self::Cancelled,
            _ => Self::Unknown,
        })
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Unknown))
    }
}

/// A P2P USDT purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Requested USDT quantity.
    pub amount: Decimal,
    /// Destination wallet (hex).
    pub wallet_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Pagination block of `GET /admin/p2p/orders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
}

/// One page of orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl OrderPage {
    /// Total number of pages, never below one.
    pub fn total_pages(&self) -> u32 {
        self.pagination
            .as_ref()
            .and_then(|p| p.total_pages)
            .filter(|&n| n > 0)
            .unwrap_or(1)
    }

    /// Server-reported order count, if it reported a non-zero one.
    pub fn server_total(&self) -> Option<u64> {
        self.pagination
            .as_ref()
            .and_then(|p| p.total)
            .filter(|&n| n > 0)
    }
}

/// Body of `POST /admin/p2p/orders/:id/confirm`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<&'a str>,
}

/// Counters shown on the dashboard.
///
/// Derived from a single fetched page: `pending`, `confirmed` and
/// `cancelled` only cover that page, while `total` prefers the server count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub cancelled: u64,
}

impl DashboardStats {
    pub fn from_page(page: &OrderPage) -> Self {
        let count = |status: OrderStatus| {
            page.orders.iter().filter(|o| o.status == status).count() as u64
        };
        Self {
            total: page
                .server_total()
                .unwrap_or(page.orders.len() as u64),
            pending: count(OrderStatus::Pending),
            confirmed: count(OrderStatus::Confirmed),
            cancelled: count(OrderStatus::Cancelled),
        }
    }
}
