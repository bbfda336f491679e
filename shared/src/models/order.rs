//! Order models
//!
//! An order is a retailer's pledge of quantity against an offer. The unit
//! price is snapshotted at placement time from the zone's prospective
//! aggregated quantity and is never recomputed afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery lifecycle of an individual order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    ReadyToPack,
    PickedUp,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::ReadyToPack => "ready_to_pack",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
        }
    }

    fn position(&self) -> usize {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::ReadyToPack => 1,
            OrderStatus::PickedUp => 2,
            OrderStatus::OutForDelivery => 3,
            OrderStatus::Delivered => 4,
        }
    }

    /// Delivery status only moves forward, one step at a time
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        next.position() == self.position() + 1
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "ready_to_pack" => Ok(OrderStatus::ReadyToPack),
            "picked_up" => Ok(OrderStatus::PickedUp),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err("unknown order status"),
        }
    }
}

/// A retailer's order against a supplier offer
///
/// Product/supplier/retailer names are denormalized at placement so order
/// history survives later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub retailer_id: Uuid,
    pub retailer_name: String,
    pub zone_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_brand: String,
    pub product_unit: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub supplier_code: String,
    pub quantity: i64,
    /// Snapshotted at placement from the prospective zone-wide quantity
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
