//! Box-spread payoff math.
//!
//! A long box at (lower, higher) buys the lower-strike call and the
//! higher-strike put while selling the higher-strike call and the
//! lower-strike put. Its payoff at expiry is fixed at `higher - lower`
//! regardless of where the underlying settles, so any cost below that is
//! riskless profit.

use crate::quotes::QuoteBook;
use crate::types::{OptionType, Payoff};

/// Profit of the long box at (lower, higher) for the current snapshot.
///
/// cost = ask(call, lower) + ask(put, higher) - bid(call, higher) - bid(put, lower)
/// profit = (higher - lower) - cost
///
/// Only the long side is evaluated: the short side's profit cannot be judged
/// reliably from top-of-book quotes alone. If any of the four legs has no
/// quote this cycle, the result is `Payoff::Unknown`. Pure function of its
/// inputs.
pub fn box_payoff(lower: u32, higher: u32, book: &QuoteBook) -> Payoff {
    debug_assert!(lower < higher);

    let legs = (
        book.get(lower, OptionType::Call),
        book.get(lower, OptionType::Put),
        book.get(higher, OptionType::Call),
        book.get(higher, OptionType::Put),
    );
    let (Some(call_lower), Some(put_lower), Some(call_higher), Some(put_higher)) = legs else {
        return Payoff::Unknown;
    };

    let cost = call_lower.ask + put_higher.ask - (call_higher.bid + put_lower.bid);
    Payoff::Known((higher - lower) as f64 - cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_book() -> QuoteBook {
        let mut book = QuoteBook::default();
        // Pair (35000, 35500): cost = 810 + 450 - (520 + 290) = 450
        // payoff = 500 - 450 = 50
        book.insert(35000, OptionType::Call, 800.0, 810.0);
        book.insert(35000, OptionType::Put, 290.0, 295.0);
        book.insert(35500, OptionType::Call, 520.0, 530.0);
        book.insert(35500, OptionType::Put, 445.0, 450.0);
        book
    }

    #[test]
    fn test_long_box_profit() {
        assert_eq!(box_payoff(35000, 35500, &full_book()), Payoff::Known(50.0));
    }

    #[test]
    fn test_any_missing_leg_is_unknown() {
        for missing in [
            (35000, OptionType::Call),
            (35000, OptionType::Put),
            (35500, OptionType::Call),
            (35500, OptionType::Put),
        ] {
            let mut book = QuoteBook::default();
            for (strike, ty, bid, ask) in [
                (35000, OptionType::Call, 800.0, 810.0),
                (35000, OptionType::Put, 290.0, 295.0),
                (35500, OptionType::Call, 520.0, 530.0),
                (35500, OptionType::Put, 445.0, 450.0),
            ] {
                if (strike, ty) != missing {
                    book.insert(strike, ty, bid, ask);
                }
            }
            assert_eq!(box_payoff(35000, 35500, &book), Payoff::Unknown);
        }
    }

    #[test]
    fn test_negative_profit_is_still_known() {
        let mut book = full_book();
        // Make the lower call expensive enough to sink the box.
        book.insert(35000, OptionType::Call, 800.0, 910.0);
        assert_eq!(box_payoff(35000, 35500, &book), Payoff::Known(-50.0));
    }

    #[test]
    fn test_idempotent_over_same_snapshot() {
        let book = full_book();
        let first = box_payoff(35000, 35500, &book);
        let second = box_payoff(35000, 35500, &book);
        assert_eq!(first, second);
    }
}
