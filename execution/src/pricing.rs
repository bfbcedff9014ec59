//! Bulk ticket pricing.
//!
//! `price(n) = ticket_price * n * (D + 1 - n) / D` with `D = DISCOUNT_DIVISOR`, truncated.
//! The first ticket costs `ticket_price`; each extra ticket in the same batch lowers the
//! average price by roughly `1 / D`.

use luckybox_types::lottery::DISCOUNT_DIVISOR;

use crate::LotteryError;

/// Price of a purchase of `count` tickets, enforcing the per-batch cap.
pub fn batch_price(ticket_price: u64, count: usize, max_per_batch: u32) -> Result<u64, LotteryError> {
    if count == 0 {
        return Err(LotteryError::EmptyPurchase);
    }
    if count > max_per_batch as usize {
        return Err(LotteryError::BatchTooLarge {
            requested: count,
            max: max_per_batch,
        });
    }
    total_price(ticket_price, count as u64)
}

/// Discounted price of `count` tickets, without cap checks.
pub fn total_price(ticket_price: u64, count: u64) -> Result<u64, LotteryError> {
    // Floor at the D-th ticket.
    let factor = (DISCOUNT_DIVISOR + 1).saturating_sub(count).max(1);
    let price = (ticket_price as u128)
        .checked_mul(count as u128)
        .and_then(|value| value.checked_mul(factor as u128))
        .ok_or(LotteryError::Overflow)?
        / DISCOUNT_DIVISOR as u128;
    u64::try_from(price).map_err(|_| LotteryError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEN: u64 = 10_000_000;

    #[test]
    fn single_ticket_costs_full_price() {
        assert_eq!(total_price(TEN, 1), Ok(TEN));
    }

    #[test]
    fn bulk_purchase_is_discounted() {
        // 10 * 9 * 90 / 98, truncated.
        assert_eq!(total_price(TEN, 9), Ok(82_653_061));
        assert_eq!(total_price(TEN, 10), Ok(90_816_326));
    }

    #[test]
    fn batch_price_rejects_empty_and_oversized_batches() {
        assert_eq!(batch_price(TEN, 0, 10), Err(LotteryError::EmptyPurchase));
        assert_eq!(
            batch_price(TEN, 11, 10),
            Err(LotteryError::BatchTooLarge {
                requested: 11,
                max: 10
            })
        );
        assert!(batch_price(TEN, 11, 11).is_ok());
    }

    #[test]
    fn total_price_reports_overflow() {
        assert_eq!(total_price(u64::MAX, 2), Err(LotteryError::Overflow));
    }

    proptest! {
        #[test]
        fn price_stays_within_discount_bounds(
            ticket_price in 1u64..1_000_000_000_000,
            count in 1u64..=DISCOUNT_DIVISOR,
        ) {
            let price = total_price(ticket_price, count).unwrap() as u128;
            let full = ticket_price as u128 * count as u128;
            prop_assert!(price <= full);
            prop_assert!(price >= full / DISCOUNT_DIVISOR as u128);
        }
    }
}
