//! P2P order endpoints.

use super::client::{ApiClient, encode_segment};
use crate::error::Result;
use crate::models::{ConfirmOrderRequest, OrderPage};

/// P2P purchase order endpoints.
#[derive(Debug, Clone, Copy)]
pub struct P2pApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub const fn p2p(&self) -> P2pApi<'_> {
        P2pApi { client: self }
    }
}

impl P2pApi<'_> {
    /// `GET /admin/p2p/orders?page=&limit=`
    pub async fn get_orders(&self, page: u32, limit: u32) -> Result<OrderPage> {
        self.client
            .get(&format!("/admin/p2p/orders?page={page}&limit={limit}"))
            .await
    }

    /// `POST /admin/p2p/orders/:id/confirm`, optionally recording the
    /// on-chain transaction hash.
    pub async fn confirm_order(
        &self,
        order_id: &str,
        tx_hash: Option<&str>,
    ) -> Result<serde_json::Value> {
        let path = format!("/admin/p2p/orders/{}/confirm", encode_segment(order_id));
        self.client
            .post(&path, Some(&ConfirmOrderRequest { tx_hash }))
            .await
    }

    /// `POST /admin/p2p/orders/:id/cancel`
    pub async fn cancel_order(&self, order_id: &str) -> Result<serde_json::Value> {
        let path = format!("/admin/p2p/orders/{}/cancel", encode_segment(order_id));
        self.client.post::<(), _>(&path, None).await
    }
}
