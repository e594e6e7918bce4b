//! Property tests for hand scoring.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::dice::MAX_DICE;
    use crate::scoring::{calculate_score, can_score, SCORE_FIVE_ONES};

    fn hand() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(1u8..=6, 0..=MAX_DICE)
    }

    proptest! {
        /// Property: can_score agrees with a positive score.
        #[test]
        fn prop_can_score_iff_positive(dice in hand()) {
            let s = calculate_score(&dice).unwrap();
            prop_assert_eq!(can_score(&dice), s > 0);
        }

        /// Property: dice order never changes the score.
        #[test]
        fn prop_score_is_order_independent(dice in hand()) {
            let mut sorted = dice.clone();
            sorted.sort_unstable();
            let mut reversed = sorted.clone();
            reversed.reverse();
            let s = calculate_score(&dice).unwrap();
            prop_assert_eq!(s, calculate_score(&sorted).unwrap());
            prop_assert_eq!(s, calculate_score(&reversed).unwrap());
        }

        /// Property: scores are multiples of 50.
        #[test]
        fn prop_score_is_multiple_of_fifty(dice in hand()) {
            prop_assert_eq!(calculate_score(&dice).unwrap() % 50, 0);
        }

        /// Property: five 1s short-circuit whatever else is on the table.
        #[test]
        fn prop_five_ones_always_max(extra in prop::collection::vec(1u8..=6, 0..=1)) {
            let mut dice = vec![1u8; 5];
            dice.extend(extra);
            prop_assert_eq!(calculate_score(&dice).unwrap(), SCORE_FIVE_ONES);
        }

        /// Property: any face outside 1..=6 is rejected.
        #[test]
        fn prop_invalid_face_rejected(mut dice in hand(), bad in prop_oneof![Just(0u8), 7u8..=255]) {
            dice.push(bad);
            prop_assert!(calculate_score(&dice).is_err());
            prop_assert!(!can_score(&dice));
        }
    }
}
