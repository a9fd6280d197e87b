//! Order mutability guard.

use crate::order::{MutationBlock, SalesOrder};
use crate::scan::result::ScanRejection;

/// Reject scans against frozen orders.
///
/// Pure function of the order's current state; re-evaluate on every scan.
pub fn check_mutable(order: &SalesOrder) -> Result<(), ScanRejection> {
    match order.mutation_block() {
        None => Ok(()),
        Some(MutationBlock::Cancelled) => Err(ScanRejection::order_cancelled()),
        Some(MutationBlock::Locked) => Err(ScanRejection::order_locked()),
    }
}

/// Capability query for UI layers. Same rule as [`check_mutable`].
pub fn can_scan(order: &SalesOrder) -> bool {
    check_mutable(order).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{CreateSalesOrder, OrderTransition, SalesOrderCommand, SalesOrderId};
    use crate::scan::result::RejectReason;
    use chrono::Utc;
    use orderscan_core::{Aggregate, AggregateId, CompanyId};
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Target {
        Draft,
        Confirmed,
        Done,
        Cancelled,
        CancelledFromConfirmed,
    }

    fn order_in(target: Target, locked: bool) -> SalesOrder {
        let company_id = CompanyId::new();
        let order_id = SalesOrderId::new(AggregateId::new());
        let t = || OrderTransition {
            company_id,
            order_id,
            occurred_at: Utc::now(),
        };

        let mut order = SalesOrder::empty(order_id);
        order
            .execute(&SalesOrderCommand::CreateSalesOrder(CreateSalesOrder {
                company_id,
                order_id,
                occurred_at: Utc::now(),
            }))
            .unwrap();

        let mut steps = match target {
            Target::Draft => vec![],
            Target::Confirmed => vec![SalesOrderCommand::ConfirmOrder(t())],
            Target::Done => vec![
                SalesOrderCommand::ConfirmOrder(t()),
                SalesOrderCommand::MarkDone(t()),
            ],
            Target::Cancelled => vec![SalesOrderCommand::CancelOrder(t())],
            Target::CancelledFromConfirmed => vec![
                SalesOrderCommand::ConfirmOrder(t()),
                SalesOrderCommand::CancelOrder(t()),
            ],
        };
        if locked && matches!(target, Target::Confirmed | Target::Done) {
            steps.push(SalesOrderCommand::LockOrder(t()));
        }
        for cmd in &steps {
            order.execute(cmd).unwrap();
        }
        order
    }

    #[test]
    fn draft_order_passes() {
        assert!(check_mutable(&order_in(Target::Draft, false)).is_ok());
    }

    #[test]
    fn cancelled_order_is_rejected_as_cancelled() {
        let err = check_mutable(&order_in(Target::Cancelled, false)).unwrap_err();
        assert_eq!(err.reason, RejectReason::OrderCancelled);
        assert_eq!(err.title, "Order Cancelled");
    }

    #[test]
    fn locked_confirmed_order_is_rejected_as_locked() {
        let err = check_mutable(&order_in(Target::Confirmed, true)).unwrap_err();
        assert_eq!(err.reason, RejectReason::OrderLocked);
    }

    #[test]
    fn unlocked_done_order_passes() {
        let order = order_in(Target::Done, false);
        assert!(check_mutable(&order).is_ok());
        assert!(can_scan(&order));
    }

    #[test]
    fn can_scan_follows_guard_for_cancelled_orders() {
        assert!(!can_scan(&order_in(Target::CancelledFromConfirmed, false)));
    }

    fn any_target() -> impl Strategy<Value = Target> {
        prop_oneof![
            Just(Target::Draft),
            Just(Target::Confirmed),
            Just(Target::Done),
            Just(Target::Cancelled),
            Just(Target::CancelledFromConfirmed),
        ]
    }

    proptest! {
        /// Property: the guard verdict is stable for an unchanged order.
        #[test]
        fn guard_is_idempotent(target in any_target(), locked in any::<bool>()) {
            let order = order_in(target, locked);
            let first = check_mutable(&order);
            let second = check_mutable(&order);
            prop_assert_eq!(first, second);
        }

        /// Property: cancelled always wins, locked confirmed/done always rejects,
        /// unlocked confirmed/done always passes.
        #[test]
        fn verdict_matches_state_and_lock(target in any_target(), locked in any::<bool>()) {
            let order = order_in(target, locked);
            let verdict = check_mutable(&order).map_err(|r| r.reason);
            match target {
                Target::Cancelled | Target::CancelledFromConfirmed => {
                    prop_assert_eq!(verdict, Err(RejectReason::OrderCancelled));
                }
                Target::Confirmed | Target::Done if locked => {
                    prop_assert_eq!(verdict, Err(RejectReason::OrderLocked));
                }
                _ => prop_assert_eq!(verdict, Ok(())),
            }
            prop_assert_eq!(can_scan(&order), verdict.is_ok());
        }
    }
}
