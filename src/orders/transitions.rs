//! Order status transition table
//!
//! Every lifecycle change goes through [`apply`]: it maps
//! (current status, action) to (next status, stock effect). The stock
//! effect is the only coupling between order status and inventory, and
//! exactly one edge carries a restock: RETURN_REQUESTED accepted by an
//! admin.

use super::{OrderError, OrderResult};
use crate::db::models::OrderStatus;

/// Lifecycle action on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Customer cancels (only while PLACED)
    Cancel,
    /// Customer requests a return (only while DELIVERED)
    RequestReturn,
    /// Admin moves the order to an arbitrary declared status
    SetStatus(OrderStatus),
}

/// Inventory consequence of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    None,
    /// Put every line item's quantity back (cancellation)
    ReleaseAll,
    /// Put every line item's returned quantity back (return accepted)
    RestockReturned,
}

/// Resolve a transition. Fails without side effects when the action is
/// not allowed from the current status.
pub fn apply(current: OrderStatus, action: OrderAction) -> OrderResult<(OrderStatus, StockEffect)> {
    match action {
        OrderAction::Cancel => match current {
            OrderStatus::Placed => Ok((OrderStatus::Cancelled, StockEffect::ReleaseAll)),
            _ => Err(OrderError::InvalidTransition { current }),
        },
        OrderAction::RequestReturn => match current {
            OrderStatus::Delivered => Ok((OrderStatus::ReturnRequested, StockEffect::None)),
            _ => Err(OrderError::InvalidTransition { current }),
        },
        // Admin moves are unrestricted within the declared statuses;
        // the RETURN_REQUESTED -> RETURN_ACCEPTED edge is where
        // returned stock flows back.
        OrderAction::SetStatus(next) => {
            let effect = match (current, next) {
                (OrderStatus::ReturnRequested, OrderStatus::ReturnAccepted) => {
                    StockEffect::RestockReturned
                }
                _ => StockEffect::None,
            };
            Ok((next, effect))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_only_from_placed() {
        let (next, effect) = apply(OrderStatus::Placed, OrderAction::Cancel).unwrap();
        assert_eq!(next, OrderStatus::Cancelled);
        assert_eq!(effect, StockEffect::ReleaseAll);

        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Cancelled,
            OrderStatus::Delivered,
            OrderStatus::ReturnRequested,
            OrderStatus::ReturnAccepted,
            OrderStatus::Returned,
        ] {
            let err = apply(status, OrderAction::Cancel).unwrap_err();
            match err {
                OrderError::InvalidTransition { current } => assert_eq!(current, status),
                other => panic!("expected InvalidTransition, got {other:?}"),
            }
        }
    }

    #[test]
    fn return_request_only_from_delivered() {
        let (next, effect) = apply(OrderStatus::Delivered, OrderAction::RequestReturn).unwrap();
        assert_eq!(next, OrderStatus::ReturnRequested);
        assert_eq!(effect, StockEffect::None);

        assert!(apply(OrderStatus::Shipped, OrderAction::RequestReturn).is_err());
        assert!(apply(OrderStatus::ReturnRequested, OrderAction::RequestReturn).is_err());
    }

    #[test]
    fn accepting_a_return_is_the_only_restock_edge() {
        for current in OrderStatus::ALL {
            for next in OrderStatus::ALL {
                let (_, effect) = apply(current, OrderAction::SetStatus(next)).unwrap();
                let expected = if current == OrderStatus::ReturnRequested
                    && next == OrderStatus::ReturnAccepted
                {
                    StockEffect::RestockReturned
                } else {
                    StockEffect::None
                };
                assert_eq!(effect, expected, "{current} -> {next}");
            }
        }
    }

    #[test]
    fn admin_can_mark_returned_terminal_without_stock_movement() {
        let (next, effect) = apply(
            OrderStatus::ReturnAccepted,
            OrderAction::SetStatus(OrderStatus::Returned),
        )
        .unwrap();
        assert_eq!(next, OrderStatus::Returned);
        assert_eq!(effect, StockEffect::None);
    }
}
