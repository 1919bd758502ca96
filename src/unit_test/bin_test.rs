use crate::bin::{amount_as_l, Bin};
use crate::math::Fp;

fn fp(n: u64, d: u64) -> Fp {
    Fp::from_fraction(n, d).unwrap()
}

/// A bin at price 0.5 with the given balances, all of it provided.
fn bin_with(price: Fp, left: u64, right: u64) -> Bin {
    let mut bin = Bin::new(price);
    bin.deposit(left, right).unwrap();
    bin
}

mod amount_as_l_tests {
    use super::*;

    #[test]
    fn test_left_only() {
        assert_eq!(amount_as_l(fp(1, 2), 100, 0).unwrap(), 100);
    }

    #[test]
    fn test_right_converts_at_price() {
        // 100 R at price 0.5 is worth 200 L
        assert_eq!(amount_as_l(fp(1, 2), 0, 100).unwrap(), 200);
        assert_eq!(amount_as_l(fp(1, 2), 50, 100).unwrap(), 250);
    }

    #[test]
    fn test_truncates() {
        // 10 R at price 3 is worth 3.33 L, truncated to 3
        assert_eq!(amount_as_l(Fp::from_int(3), 0, 10).unwrap(), 3);
    }

    #[test]
    fn test_price_above_one_compresses_small_right() {
        // the documented regime: right amounts below the price floor to zero
        assert_eq!(amount_as_l(Fp::from_int(2), 7, 1).unwrap(), 7);
    }
}

mod deposit_tests {
    use super::*;

    #[test]
    fn test_deposit_updates_balances_and_provided() {
        let mut bin = Bin::new(fp(1, 2));
        bin.deposit(10, 20).unwrap();
        bin.deposit(1, 2).unwrap();
        assert_eq!(bin.balance_left(), 11);
        assert_eq!(bin.balance_right(), 22);
        assert_eq!(bin.provided_left(), 11);
        assert_eq!(bin.provided_right(), 22);
    }

    #[test]
    fn test_provided_as_l() {
        let bin = bin_with(fp(1, 2), 10, 20);
        assert_eq!(bin.provided_as_l().unwrap(), 10 + 40);
    }

    #[test]
    fn test_is_empty() {
        let mut bin = Bin::new(fp(1, 2));
        assert!(bin.is_empty());
        bin.deposit(1, 0).unwrap();
        assert!(!bin.is_empty());
    }
}

mod fee_log_tests {
    use super::*;

    #[test]
    fn test_swap_leg_appends_fee_entry() {
        let mut bin = bin_with(fp(1, 2), 1_000, 1_000);
        bin.apply_swap_ltr(100, 49, 2, 7_000, 3_000);
        assert_eq!(bin.balance_left(), 1_100);
        assert_eq!(bin.balance_right(), 951);
        let entry = &bin.fee_log_left()[0];
        assert_eq!(entry.amount, 2);
        assert_eq!(entry.timestamp_ms, 7_000);
        assert_eq!(entry.total_bin_size_as_l, 3_000);
        assert!(bin.fee_log_right().is_empty());
    }

    #[test]
    fn test_zero_fee_is_not_logged() {
        let mut bin = bin_with(fp(1, 2), 1_000, 1_000);
        bin.apply_swap_ltr(10, 5, 0, 7_000, 3_000);
        assert!(bin.fee_log_left().is_empty());
    }

    #[test]
    fn test_accrue_takes_pro_rata_share() {
        let mut bin = bin_with(fp(1, 2), 1_000, 0);
        bin.apply_swap_ltr(0, 0, 100, 5_000, 1_000);
        // a quarter of the basis claims a quarter of the fee
        let (left, right) = bin.accrue_fees(250, 4_000).unwrap();
        assert_eq!(left, 25);
        assert_eq!(right, 0);
        let entry = &bin.fee_log_left()[0];
        assert_eq!(entry.amount, 75);
        assert_eq!(entry.total_bin_size_as_l, 750);
    }

    #[test]
    fn test_accrue_skips_entries_older_than_deposit() {
        let mut bin = bin_with(fp(1, 2), 1_000, 0);
        bin.apply_swap_ltr(0, 0, 100, 1_000, 1_000);
        bin.apply_swap_ltr(0, 0, 60, 2_000, 1_000);
        // depositor arrived between the two fees: only the second is claimable
        let (left, _) = bin.accrue_fees(500, 1_500).unwrap();
        assert_eq!(left, 30);
        assert_eq!(bin.fee_log_left().len(), 2);
        assert_eq!(bin.fee_log_left()[0].amount, 100);
        assert_eq!(bin.fee_log_left()[1].amount, 30);
    }

    #[test]
    fn test_accrue_stops_at_first_older_entry() {
        // the scan is newest-to-oldest and stops at the gate, so an old
        // entry behind a newer one is never touched even with an equal
        // timestamp further back
        let mut bin = bin_with(fp(1, 2), 1_000, 0);
        bin.apply_swap_ltr(0, 0, 40, 1_000, 1_000);
        bin.apply_swap_ltr(0, 0, 40, 3_000, 1_000);
        let (left, _) = bin.accrue_fees(1_000, 2_000).unwrap();
        assert_eq!(left, 40);
        // newest entry fully claimed and removed, the older survives
        assert_eq!(bin.fee_log_left().len(), 1);
        assert_eq!(bin.fee_log_left()[0].timestamp_ms, 1_000);
    }

    #[test]
    fn test_entry_with_equal_timestamp_is_claimable() {
        let mut bin = bin_with(fp(1, 2), 1_000, 0);
        bin.apply_swap_ltr(0, 0, 100, 2_000, 1_000);
        let (left, _) = bin.accrue_fees(1_000, 2_000).unwrap();
        assert_eq!(left, 100);
    }

    #[test]
    fn test_fully_claimed_entry_is_removed() {
        let mut bin = bin_with(fp(1, 2), 1_000, 0);
        bin.apply_swap_ltr(0, 0, 100, 5_000, 1_000);
        let (left, _) = bin.accrue_fees(1_000, 0).unwrap();
        assert_eq!(left, 100);
        assert!(bin.fee_log_left().is_empty());
    }

    #[test]
    fn test_sole_claimant_empties_the_entry() {
        let mut bin = bin_with(fp(1, 2), 1_000, 0);
        bin.apply_swap_ltr(0, 0, 99, 5_000, 1_000);
        // a claimant holding the entire basis takes the entire amount, and
        // the drained entry disappears
        let (left, _) = bin.accrue_fees(1_000, 0).unwrap();
        assert_eq!(left, 99);
        assert!(bin.fee_log_left().is_empty());
    }

    #[test]
    fn test_sequential_claims_split_fee_exactly() {
        let mut bin = bin_with(fp(1, 2), 1_000, 0);
        bin.apply_swap_ltr(0, 0, 100, 5_000, 1_000);
        let mut claimed = Vec::new();
        for _ in 0..4 {
            let (left, _) = bin.accrue_fees(250, 0).unwrap();
            claimed.push(left);
        }
        assert_eq!(claimed, vec![25, 25, 25, 25]);
        assert!(bin.fee_log_left().is_empty());
    }
}

mod payout_tests {
    use super::*;

    #[test]
    fn test_take_left_from_balance() {
        let mut bin = bin_with(fp(1, 2), 100, 100);
        assert_eq!(bin.take_left(60).unwrap(), (60, 0));
        assert_eq!(bin.balance_left(), 40);
        assert_eq!(bin.balance_right(), 100);
    }

    #[test]
    fn test_take_left_converts_shortfall_to_right() {
        // 200 wanted, 100 held: the other 100 L becomes 50 R at price 0.5
        let mut bin = bin_with(fp(1, 2), 100, 100);
        assert_eq!(bin.take_left(200).unwrap(), (100, 50));
        assert_eq!(bin.balance_left(), 0);
        assert_eq!(bin.balance_right(), 50);
    }

    #[test]
    fn test_take_left_tolerates_one_unit_shortfall() {
        let mut bin = bin_with(fp(1, 2), 100, 49);
        // converted remainder is 50 R but only 49 are there: one unit short,
        // take everything
        assert_eq!(bin.take_left(200).unwrap(), (100, 49));
        assert_eq!(bin.balance_right(), 0);
    }

    #[test]
    fn test_take_left_leaves_right_on_larger_shortfall() {
        let mut bin = bin_with(fp(1, 2), 100, 48);
        // two units short: the remaining right inventory stays put
        assert_eq!(bin.take_left(200).unwrap(), (100, 0));
        assert_eq!(bin.balance_right(), 48);
    }

    #[test]
    fn test_take_right_converts_shortfall_to_left() {
        // 100 R wanted, 40 held: the missing 60 R is 120 L at price 0.5
        let mut bin = bin_with(fp(1, 2), 200, 40);
        assert_eq!(bin.take_right(100).unwrap(), (120, 40));
        assert_eq!(bin.balance_left(), 80);
        assert_eq!(bin.balance_right(), 0);
    }

    #[test]
    fn test_take_right_tolerance_mirrors_left() {
        let mut bin = bin_with(fp(1, 2), 119, 40);
        assert_eq!(bin.take_right(100).unwrap(), (119, 40));

        let mut bin = bin_with(fp(1, 2), 118, 40);
        assert_eq!(bin.take_right(100).unwrap(), (0, 40));
        assert_eq!(bin.balance_left(), 118);
    }

    #[test]
    fn test_reduce_provided_and_drain() {
        let mut bin = bin_with(fp(1, 2), 100, 100);
        bin.reduce_provided(100, 100).unwrap();
        assert_eq!(bin.provided_left(), 0);
        assert_eq!(bin.provided_right(), 0);
        assert_eq!(bin.drain_balances(), (100, 100));
        assert!(bin.is_empty());
    }
}
