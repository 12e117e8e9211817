//! Order assembly and lifecycle service
//!
//! Placement turns the cart into an order of frozen line-item
//! snapshots, reserving stock per line as it goes. Reservations are
//! compensated in reverse when a later line fails, so placement is
//! all-or-nothing. Ownership checks happen here, at the service entry
//! points.

use super::transitions::{self, OrderAction, StockEffect};
use super::{OrderError, OrderResult, StockLedger};
use crate::db::models::{Order, OrderItem, OrderStatus, PaymentMethod, ShippingAddress};
use crate::db::repository::{CartRepository, OrderRepository};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use surrealdb::RecordId;
use tracing::{debug, info, warn};

pub struct OrderService {
    orders: OrderRepository,
    carts: CartRepository,
    ledger: Arc<StockLedger>,
}

impl OrderService {
    pub fn new(orders: OrderRepository, carts: CartRepository, ledger: Arc<StockLedger>) -> Self {
        Self {
            orders,
            carts,
            ledger,
        }
    }

    /// Place an order from the user's cart.
    ///
    /// Cart lines whose product has been deleted are dropped silently.
    /// Each surviving line reserves stock; the first failure releases
    /// everything reserved so far, in reverse order, and aborts.
    pub async fn place_order(
        &self,
        user_id: &RecordId,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> OrderResult<Order> {
        let cart = self
            .carts
            .find_by_user(user_id)
            .await?
            .ok_or(OrderError::EmptyCart)?;
        if cart.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let mut reserved: Vec<OrderItem> = Vec::new();
        let mut total = Decimal::ZERO;

        for line in &cart.items {
            let product = match self
                .ledger
                .reserve(&line.product, &line.color, &line.size, line.quantity)
                .await
            {
                Ok(product) => product,
                Err(OrderError::ProductGone(id)) => {
                    debug!(product = %id, "Dropping cart line for deleted product");
                    continue;
                }
                Err(err) => {
                    self.rollback(&reserved).await;
                    return Err(err);
                }
            };

            // Snapshot from the same read the reservation used
            let image = product
                .variants
                .iter()
                .find(|v| v.color == line.color)
                .and_then(|v| v.images.first().cloned())
                .or_else(|| product.cover_image());

            total += product.price * Decimal::from(line.quantity);
            reserved.push(OrderItem {
                product: line.product.clone(),
                name: product.name.clone(),
                price: product.price,
                image,
                color: line.color.clone(),
                size: line.size.clone(),
                quantity: line.quantity,
                returned_qty: 0,
                restocked_qty: 0,
            });
        }

        // Every line pointed at a deleted product
        if reserved.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let order = Order {
            id: None,
            user: user_id.clone(),
            items: reserved.clone(),
            total_amount: total,
            shipping_address,
            payment_method,
            status: OrderStatus::Placed,
            created_at: Some(Utc::now()),
        };

        let created = match self.orders.create(order).await {
            Ok(order) => order,
            Err(err) => {
                self.rollback(&reserved).await;
                return Err(err.into());
            }
        };

        if let Some(cart_id) = &cart.id {
            self.carts.clear(cart_id).await?;
        }

        info!(
            order = %created.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            user = %user_id,
            total = %created.total_amount,
            items = created.items.len(),
            "Order placed"
        );
        Ok(created)
    }

    /// Release already-reserved lines in reverse order
    async fn rollback(&self, reserved: &[OrderItem]) {
        for item in reserved.iter().rev() {
            if let Err(err) = self
                .ledger
                .release(&item.product, &item.color, &item.size, item.quantity)
                .await
            {
                warn!(product = %item.product, error = %err, "Rollback release failed");
            }
        }
    }

    pub async fn my_orders(&self, user_id: &RecordId) -> OrderResult<Vec<Order>> {
        Ok(self.orders.find_by_user(user_id).await?)
    }

    pub async fn all_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(self.orders.find_all().await?)
    }

    /// Load an order, enforcing ownership
    pub async fn get_order(&self, order_id: &str, user_id: &RecordId) -> OrderResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        if order.user != *user_id {
            return Err(OrderError::Forbidden);
        }
        Ok(order)
    }

    /// Customer cancellation: PLACED only, releases all line items in
    /// order-sequence order.
    pub async fn cancel_order(&self, order_id: &str, user_id: &RecordId) -> OrderResult<Order> {
        let mut order = self.get_order(order_id, user_id).await?;
        let (next, effect) = transitions::apply(order.status, OrderAction::Cancel)?;
        debug_assert_eq!(effect, StockEffect::ReleaseAll);

        for item in &order.items {
            self.ledger
                .release(&item.product, &item.color, &item.size, item.quantity)
                .await?;
        }

        let id = order
            .id
            .clone()
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        self.orders.set_status(&id, next).await?;
        order.status = next;
        info!(order = %id, "Order cancelled, stock released");
        Ok(order)
    }

    /// Customer return request: DELIVERED only. Bumps the line item's
    /// returned quantity; no stock moves until an admin accepts.
    pub async fn request_return(
        &self,
        order_id: &str,
        user_id: &RecordId,
        product_id: &RecordId,
        quantity: u32,
    ) -> OrderResult<Order> {
        let mut order = self.get_order(order_id, user_id).await?;
        let (next, effect) = transitions::apply(order.status, OrderAction::RequestReturn)?;
        debug_assert_eq!(effect, StockEffect::None);

        let item = order
            .items
            .iter_mut()
            .find(|item| item.product == *product_id)
            .ok_or_else(|| OrderError::ItemNotFound(product_id.to_string()))?;

        let returnable = item.quantity - item.returned_qty;
        if quantity == 0 || quantity > returnable {
            return Err(OrderError::InvalidReturnQuantity(format!(
                "requested {quantity}, returnable {returnable}"
            )));
        }
        item.returned_qty += quantity;

        let id = order
            .id
            .clone()
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        self.orders
            .save_items_and_status(&id, &order.items, next)
            .await?;
        order.status = next;
        info!(order = %id, product = %product_id, quantity, "Return requested");
        Ok(order)
    }

    /// Admin status change. Accepting a return (RETURN_REQUESTED ->
    /// RETURN_ACCEPTED) restocks each line's returned quantity; no
    /// other admin move touches stock.
    ///
    /// Each returned unit is restocked at most once: the accept edge
    /// only releases `returned_qty - restocked_qty` and bumps the
    /// restocked counter, so replaying the edge is a no-op for stock.
    pub async fn set_status(&self, order_id: &str, new_status: OrderStatus) -> OrderResult<Order> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let (next, effect) = transitions::apply(order.status, OrderAction::SetStatus(new_status))?;

        let id = order
            .id
            .clone()
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        if effect == StockEffect::RestockReturned {
            for item in &mut order.items {
                let pending = item.returned_qty - item.restocked_qty;
                if pending > 0 {
                    self.ledger
                        .release(&item.product, &item.color, &item.size, pending)
                        .await?;
                    item.restocked_qty = item.returned_qty;
                }
            }
            self.orders
                .save_items_and_status(&id, &order.items, next)
                .await?;
        } else {
            self.orders.set_status(&id, next).await?;
        }

        let previous = order.status;
        order.status = next;
        info!(order = %id, from = %previous, to = %next, "Order status updated");
        Ok(order)
    }
}
