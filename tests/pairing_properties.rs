use std::collections::BTreeMap;

use proptest::prelude::*;
use regiondiff::pair_intervals;

/// Turns coin flips into a balanced bracket sequence: `true` opens, `false`
/// closes when something is open, and whatever is left open is closed at
/// the end.
fn balanced(flips: &[bool]) -> Vec<bool> {
    let mut events = Vec::with_capacity(flips.len() * 2);
    let mut depth = 0usize;
    for &open in flips {
        if open || depth == 0 {
            depth += 1;
            events.push(true);
        } else {
            depth -= 1;
            events.push(false);
        }
    }
    events.extend(std::iter::repeat(false).take(depth));
    events
}

/// Strictly increasing offsets for each event.
fn offsets(gaps: &[usize], len: usize) -> Vec<usize> {
    let mut at = 0;
    (0..len)
        .map(|i| {
            at += 1 + gaps.get(i).copied().unwrap_or(0);
            at
        })
        .collect()
}

/// Matches each open with the close that brings its depth back to zero,
/// scanning forward from it.
fn matching_closes(events: &[bool], positions: &[usize]) -> BTreeMap<usize, usize> {
    let mut expected = BTreeMap::new();
    for (i, &open) in events.iter().enumerate() {
        if !open {
            continue;
        }
        let mut depth = 0i64;
        for (j, &event) in events.iter().enumerate().skip(i) {
            depth += if event { 1 } else { -1 };
            if depth == 0 {
                expected.insert(positions[i], positions[j]);
                break;
            }
        }
    }
    expected
}

proptest! {
    #[test]
    fn well_nested_markers_pair_like_brackets(
        flips in prop::collection::vec(any::<bool>(), 0..120),
        gaps in prop::collection::vec(0usize..4, 0..240),
    ) {
        let events = balanced(&flips);
        let positions = offsets(&gaps, events.len());

        let mut starts = Vec::new();
        let mut ends = Vec::new();
        for (&open, &at) in events.iter().zip(&positions) {
            if open { starts.push(at) } else { ends.push(at) }
        }
        // Input order does not matter.
        ends.reverse();

        let pairs = pair_intervals(&starts, &ends).unwrap();

        // Every start is covered.
        prop_assert_eq!(pairs.len(), starts.len());
        for s in &starts {
            prop_assert!(pairs.contains_key(s));
        }

        for (&s, &e) in &pairs {
            prop_assert!(e >= s);
            for (&s2, &e2) in &pairs {
                let nested = s <= s2 && e2 <= e;
                let contains = s2 <= s && e <= e2;
                let disjoint = e <= s2 || e2 <= s;
                prop_assert!(nested || contains || disjoint, "({},{}) crosses ({},{})", s, e, s2, e2);
            }
        }

        prop_assert_eq!(pairs, matching_closes(&events, &positions));
    }
}
