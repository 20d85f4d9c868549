//! Property tests for the depth pre-scan and the decode pipelines.

mod common;

use std::io::Cursor;

use common::*;
use proptest::prelude::*;
use safe_deserialize::{
    binary, binary_reader, json, json_reader, measure_depth, xml, xml_reader, yaml, yaml_reader,
    ErrorKind, Options,
};

/// Reference depth over a bracket-only string.
fn bracket_depth(s: &str) -> usize {
    let mut max = 0i64;
    let mut cur = 0i64;
    for c in s.chars() {
        match c {
            '[' | '{' => {
                cur += 1;
                max = max.max(cur);
            }
            ']' | '}' => cur -= 1,
            _ => {}
        }
    }
    max as usize
}

/// String body mixing bracket characters with `\"` and `\\` escapes.
fn arb_escaped_body() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        "[\\[\\]{}a-z,:]{1,4}",
        Just("\\\"".to_string()),
        Just("\\\\".to_string()),
    ];
    prop::collection::vec(segment, 0..16).prop_map(|parts| parts.concat())
}

fn arb_user() -> impl Strategy<Value = SimpleUser> {
    (any::<u64>(), "[a-zA-Z0-9 ]{0,24}", "[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,3}")
        .prop_map(|(id, name, email)| SimpleUser { id, name, email })
}

proptest! {
    #[test]
    fn prop_depth_matches_reference(s in "[\\[\\]{}a-z,: ]{0,64}") {
        prop_assert_eq!(measure_depth(s.as_bytes()), bracket_depth(&s));
    }

    #[test]
    fn prop_string_contents_never_count(body in "[\\[\\]{}a-z]{0,32}", depth in 0usize..8) {
        let data = format!("{}\"{}\"{}", "[".repeat(depth), body, "]".repeat(depth));
        prop_assert_eq!(measure_depth(data.as_bytes()), depth);
    }

    #[test]
    fn prop_escapes_stay_inside_strings(
        prefix in "[\\[\\]{}]{0,8}",
        body in arb_escaped_body(),
        suffix in "[\\[\\]{}]{0,8}"
    ) {
        let data = format!("{prefix}\"{body}\"{suffix}");
        let reference = bracket_depth(&format!("{prefix}{suffix}"));
        prop_assert_eq!(measure_depth(data.as_bytes()), reference);
    }

    #[test]
    fn prop_balanced_nesting_depth(depth in 0usize..100) {
        let data = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        prop_assert_eq!(measure_depth(data.as_bytes()), depth);
    }

    #[test]
    fn prop_oversized_rejected_everywhere(extra in 1usize..64, limit in 1usize..256) {
        let data = vec![b'{'; limit + extra];
        let options = Options::default().with_max_size(limit);

        let too_large = Some(ErrorKind::DataTooLarge);
        let mut user = SimpleUser::default();

        prop_assert_eq!(json(&data, &mut user, &options).err().map(|e| e.kind()), too_large);
        prop_assert_eq!(yaml(&data, &mut user, &options).err().map(|e| e.kind()), too_large);
        prop_assert_eq!(xml(&data, &mut user, &options).err().map(|e| e.kind()), too_large);
        prop_assert_eq!(binary(&data, &mut user, &options).err().map(|e| e.kind()), too_large);

        let readers = [
            json_reader(Cursor::new(&data), &mut user, &options),
            yaml_reader(Cursor::new(&data), &mut user, &options),
            xml_reader(Cursor::new(&data), &mut user, &options),
            binary_reader(Cursor::new(&data), &mut user, &options),
        ];
        for result in readers {
            prop_assert_eq!(result.err().map(|e| e.kind()), too_large);
        }
    }

    #[test]
    fn prop_json_round_trip(user in arb_user()) {
        let data = serde_json::to_vec(&user).unwrap();
        let mut decoded = SimpleUser::default();
        json(&data, &mut decoded, &Options::default()).unwrap();
        prop_assert_eq!(decoded, user);
    }

    #[test]
    fn prop_binary_round_trip(user in arb_user()) {
        let data = bincode::serialize(&user).unwrap();
        let mut decoded = SimpleUser::default();
        binary(&data, &mut decoded, &Options::default()).unwrap();
        prop_assert_eq!(decoded, user);
    }
}
