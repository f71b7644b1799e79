mod unit_tests {
    use crate::{NULLORDER, RuleBasedCollator, Strength, primary_order};
    use std::cmp::Ordering;

    const STRENGTHS: [Strength; 4] = [
        Strength::Primary,
        Strength::Secondary,
        Strength::Tertiary,
        Strength::Identical,
    ];

    #[test]
    fn simple_rule_end_to_end() {
        let col = RuleBasedCollator::new("< a < b").unwrap();
        assert_eq!(col.compare("a", "bb"), Ordering::Less);
    }

    #[test]
    fn compare_is_reflexive_at_every_strength() {
        let mut col = RuleBasedCollator::new("< a, A < b, B < ch").unwrap();
        for strength in STRENGTHS {
            col.set_strength(strength);
            for s in ["", "a", "chab", "Aba", "xyz"] {
                assert!(col.equals(s, s), "{s:?} != itself at {strength:?}");
            }
        }
    }

    #[test]
    fn compare_is_antisymmetric() {
        let col = RuleBasedCollator::new("< a, A < b, B < ch").unwrap();
        let samples = ["", "a", "A", "ab", "ch", "cH", "ba", "chch"];
        for x in samples {
            for y in samples {
                assert_eq!(col.compare(x, y), col.compare(y, x).reverse());
            }
        }
    }

    #[test]
    fn sorting_by_key_matches_sorting_by_compare() {
        let col = RuleBasedCollator::new("< a, A < b, B < c, C < ch, Ch").unwrap();
        let mut by_compare = vec!["cab", "chab", "Ab", "ba", "aCh", "cb", "AB", "b"];
        let mut by_key = by_compare.clone();
        by_compare.sort_by(|x, y| col.compare(x, y));
        by_key.sort_by_key(|s| col.collation_key(s));
        assert_eq!(by_compare, by_key);
    }

    #[test]
    fn iterator_terminates_and_never_yields_nullorder_early() {
        let col = RuleBasedCollator::new("< a < b < ch").unwrap();
        let mut iter = col.collation_element_iterator("abch\u{FFFF}\u{10FFFF}");
        let mut seen = 0;
        loop {
            let e = iter.next();
            if e == NULLORDER {
                break;
            }
            seen += 1;
            assert!(seen <= 16, "iterator failed to terminate");
        }
        // a, b, ch, U+FFFF, and the two surrogate halves of U+10FFFF
        assert_eq!(seen, 6);
    }

    #[test]
    fn decoded_primary_orders_agree_with_compare() {
        let col = RuleBasedCollator::new("< a < b < c").unwrap();
        let mut ia = col.collation_element_iterator("a");
        let mut ic = col.collation_element_iterator("c");
        let (ea, ec) = (ia.next(), ic.next());
        assert!(primary_order(ea) < primary_order(ec));
        assert_eq!(col.compare("a", "c"), Ordering::Less);
    }

    #[test]
    fn max_expansion_examples() {
        let col = RuleBasedCollator::new("< a & ae = \u{00e4} < b < e").unwrap();
        let mut iter = col.collation_element_iterator("ab");
        let a = iter.next();
        let b = iter.next();
        assert_eq!(iter.max_expansion(a), 2);
        assert_eq!(iter.max_expansion(b), 2);

        let col = RuleBasedCollator::new("< a & ae = a1 & aeef = z < b < e < f").unwrap();
        let mut iter = col.collation_element_iterator("f");
        let f = iter.next();
        assert_eq!(iter.max_expansion(f), 4);
    }

    #[test]
    fn empty_rules_fail_up_front() {
        assert!(RuleBasedCollator::new("").is_err());
        assert!(RuleBasedCollator::new(" \t\n").is_err());
    }
}
