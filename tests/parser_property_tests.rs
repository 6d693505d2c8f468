//! Property tests for the neighbor line parser and sweep map

use proptest::prelude::*;
use scanintranet::discovery::{parse_neighbor_line, LivenessMap, DEFAULT_STATE};

fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9:.]{1,17}"
}

proptest! {
    #[test]
    fn state_is_field_five_for_long_lines(fields in prop::collection::vec(field(), 6..12)) {
        let entry = parse_neighbor_line(&fields.join(" ")).unwrap();
        prop_assert_eq!(&entry.state, &fields[5]);
        prop_assert_eq!(&entry.ip, &fields[0]);
        prop_assert_eq!(entry.mac_addr.as_ref(), Some(&fields[4]));
    }

    #[test]
    fn state_is_field_three_for_medium_lines(fields in prop::collection::vec(field(), 4..6)) {
        let entry = parse_neighbor_line(&fields.join(" ")).unwrap();
        prop_assert_eq!(&entry.state, &fields[3]);
        prop_assert_eq!(entry.field_count, fields.len());
    }

    #[test]
    fn short_lines_use_default_state(fields in prop::collection::vec(field(), 1..4)) {
        let entry = parse_neighbor_line(&fields.join(" ")).unwrap();
        prop_assert_eq!(entry.state.as_str(), DEFAULT_STATE);
        prop_assert!(entry.mac_addr.is_none());
    }

    #[test]
    fn whitespace_only_lines_are_rejected(line in "[ \t]{0,8}") {
        prop_assert!(parse_neighbor_line(&line).is_err());
    }

    #[test]
    fn parser_never_panics(line in ".{0,120}") {
        let _ = parse_neighbor_line(&line);
    }

    #[test]
    fn unseen_addresses_are_never_alive(
        alive in prop::collection::hash_set(1u8..128, 0..20),
        probe in 128u8..255,
    ) {
        let output: String = alive
            .iter()
            .map(|octet| format!("10.0.0.{} is alive\n", octet))
            .collect();
        let map = LivenessMap::parse(&output);

        prop_assert_eq!(map.alive_count(), alive.len());
        for octet in &alive {
            let ip = format!("10.0.0.{}", octet);
            prop_assert!(map.is_alive(&ip));
        }
        let probe_ip = format!("10.0.0.{}", probe);
        prop_assert!(!map.is_alive(&probe_ip));
    }
}
