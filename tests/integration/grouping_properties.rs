use metaclient::grouping::{group_items, Item};
use proptest::prelude::*;
use std::path::Path;

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(0u64..2_000, 0..40).prop_map(|sizes| {
        sizes
            .into_iter()
            .enumerate()
            .map(|(i, size)| Item::new(&format!("item-{i}"), size, i % 3 == 0))
            .collect()
    })
}

proptest! {
    #[test]
    fn every_item_lands_in_exactly_one_group(items in items_strategy(), limit in 1u64..3_000) {
        let groups = group_items(items.clone(), limit, Path::new("/src")).unwrap();

        let mut placed: Vec<String> = groups
            .iter()
            .flat_map(|g| g.items.iter().map(|i| i.name.clone()))
            .collect();
        let mut expected: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
        placed.sort();
        expected.sort();
        prop_assert_eq!(placed, expected);
    }

    #[test]
    fn groups_respect_capacity_unless_single_oversize(items in items_strategy(), limit in 1u64..3_000) {
        let groups = group_items(items, limit, Path::new("/src")).unwrap();
        for (index, group) in groups.iter().enumerate() {
            prop_assert_eq!(group.index, index);
            prop_assert!(!group.is_empty());
            prop_assert_eq!(group.size, group.items.iter().map(|i| i.size).sum::<u64>());
            if group.size > limit {
                prop_assert_eq!(group.len(), 1);
            }
        }
    }

    #[test]
    fn items_come_out_largest_first(items in items_strategy(), limit in 1u64..3_000) {
        let groups = group_items(items, limit, Path::new("/src")).unwrap();
        let sizes: Vec<u64> = groups
            .iter()
            .flat_map(|g| g.items.iter().map(|i| i.size))
            .collect();
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn grouping_is_deterministic(items in items_strategy(), limit in 1u64..3_000) {
        let first = group_items(items.clone(), limit, Path::new("/src")).unwrap();
        let second = group_items(items, limit, Path::new("/src")).unwrap();
        prop_assert_eq!(first, second);
    }
}
