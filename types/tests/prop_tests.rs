use proptest::prelude::*;

use referenda_types::{Balance, BlockNumber, Conviction};

fn conviction() -> impl Strategy<Value = Conviction> {
    (0u8..7).prop_map(|tag| Conviction::try_from(tag).unwrap())
}

proptest! {
    /// Lock periods and weight both grow with conviction.
    #[test]
    fn conviction_table_is_monotone(a in conviction(), b in conviction()) {
        if a <= b {
            prop_assert!(a.lock_periods() <= b.lock_periods());
            prop_assert!(a.weight() <= b.weight());
        }
    }

    /// Every known tag decodes, every other tag is rejected.
    #[test]
    fn conviction_tag_decoding(tag in 0u8..=255) {
        let decoded = Conviction::try_from(tag);
        prop_assert_eq!(decoded.is_ok(), tag <= 6);
        if let Ok(c) = decoded {
            prop_assert_eq!(c.level(), tag);
        }
    }

    /// Balance: checked_add(a, b) == Some(a + b) when no overflow.
    #[test]
    fn balance_checked_add(a in 0u128..u128::MAX / 2, b in 0u128..u128::MAX / 2) {
        let sum = Balance::new(a).checked_add(Balance::new(b));
        prop_assert_eq!(sum, Some(Balance::new(a + b)));
    }

    /// Balance: saturating_add clamps at MAX instead of wrapping.
    #[test]
    fn balance_saturating_add(a in 1u128..=u128::MAX) {
        prop_assert_eq!(Balance::MAX.saturating_add(Balance::new(a)), Balance::MAX);
        prop_assert!(Balance::MAX.checked_add(Balance::new(a)).is_none());
    }

    /// BlockNumber: blocks_until is the saturating distance.
    #[test]
    fn block_distance(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let now = BlockNumber::new(base);
        let later = now.saturating_add(offset);
        prop_assert_eq!(now.blocks_until(later), offset);
        prop_assert_eq!(later.blocks_until(now), 0);
        prop_assert!(later.has_reached(now));
    }
}
