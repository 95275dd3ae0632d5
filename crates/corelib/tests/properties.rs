//! Property tests for ring lookup and membership changes.

use std::collections::HashSet;

use corelib::HashRing;
use proptest::collection::{hash_set, vec};
use proptest::prelude::*;

fn ring_with(servers: &HashSet<String>, vnodes: usize) -> HashRing {
    let ring = HashRing::new(vnodes);
    for server in servers {
        ring.add_server(server).unwrap();
    }
    ring
}

fn servers() -> impl Strategy<Value = HashSet<String>> {
    hash_set("[a-z]{1,8}[0-9]{0,2}", 1..8)
}

fn keys() -> impl Strategy<Value = Vec<Vec<u8>>> {
    vec(vec(any::<u8>(), 0..24), 1..64)
}

proptest! {
    #[test]
    fn lookup_is_deterministic_and_returns_member(
        servers in servers(),
        vnodes in 0usize..16,
        keys in keys(),
    ) {
        let ring = ring_with(&servers, vnodes);
        for key in &keys {
            let owner = ring.get(key).unwrap();
            prop_assert!(servers.contains(owner.as_str()));
            prop_assert_eq!(ring.get(key).unwrap(), owner);
        }
    }

    #[test]
    fn adding_a_server_only_moves_keys_to_it(
        servers in servers(),
        added in "[A-Z]{1,8}",
        vnodes in 0usize..16,
        keys in keys(),
    ) {
        let ring = ring_with(&servers, vnodes);
        let before: Vec<_> = keys.iter().map(|k| ring.get(k).unwrap()).collect();

        prop_assert!(ring.add_server(&added).unwrap());

        for (key, old) in keys.iter().zip(before) {
            let new = ring.get(key).unwrap();
            prop_assert!(new == old || new == added.as_str());
        }
    }

    #[test]
    fn removing_a_server_only_moves_its_keys(
        servers in servers(),
        vnodes in 1usize..16,
        keys in keys(),
    ) {
        prop_assume!(servers.len() > 1);
        let ring = ring_with(&servers, vnodes);
        let removed = servers.iter().next().unwrap().clone();
        let before: Vec<_> = keys.iter().map(|k| ring.get(k).unwrap()).collect();

        prop_assert!(ring.remove_server(&removed));

        for (key, old) in keys.iter().zip(before) {
            let new = ring.get(key).unwrap();
            prop_assert_ne!(new.as_str(), removed.as_str());
            prop_assert!(new == old || old == removed.as_str());
        }
    }

    #[test]
    fn membership_changes_are_idempotent(
        servers in servers(),
        vnodes in 0usize..16,
    ) {
        let ring = ring_with(&servers, vnodes);
        let positions = ring.positions();

        for server in &servers {
            prop_assert!(!ring.add_server(server).unwrap());
        }
        prop_assert!(!ring.remove_server("never-added"));
        prop_assert_eq!(ring.positions(), positions);
        prop_assert_eq!(ring.server_count(), servers.len());
    }

    #[test]
    fn lone_server_occupies_one_plus_vnodes_positions(
        server in "[a-z]{1,12}",
        vnodes in 0usize..64,
    ) {
        let ring = HashRing::new(vnodes);
        ring.add_server(&server).unwrap();
        prop_assert_eq!(ring.position_count(), vnodes + 1);
        prop_assert_eq!(ring.positions_of(&server).len(), vnodes + 1);
    }

    #[test]
    fn index_stays_sorted_through_churn(
        servers in servers(),
        vnodes in 0usize..16,
    ) {
        let ring = ring_with(&servers, vnodes);
        for server in servers.iter().step_by(2) {
            ring.remove_server(server);
        }
        let positions = ring.positions();
        prop_assert!(positions.windows(2).all(|w| w[0].0 < w[1].0));
        for (_, owner) in &positions {
            prop_assert!(ring.contains(owner));
        }
    }
}
