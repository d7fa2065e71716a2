//! Property-based tests for the location model and the history core.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use waypoint::core::decode_pathname;
use waypoint::{
    create_location, create_path, parse_path, states_are_equal, Action, History, HookResult,
    MemoryAdapter, Navigator, StateValue,
};

prop_compose! {
    fn arbitrary_pathname()(segments in prop::collection::vec("[a-z0-9_-]{1,8}", 0..5)) -> String {
        format!("/{}", segments.join("/"))
    }
}

prop_compose! {
    fn arbitrary_search()(query in prop::option::of("[a-z]{1,5}=[a-z0-9]{0,5}")) -> String {
        query.map(|q| format!("?{q}")).unwrap_or_default()
    }
}

prop_compose! {
    fn arbitrary_hash()(fragment in prop::option::of("[a-z0-9-]{1,8}")) -> String {
        fragment.map(|f| format!("#{f}")).unwrap_or_default()
    }
}

fn arbitrary_state() -> impl Strategy<Value = StateValue> {
    let leaf = prop_oneof![
        Just(StateValue::Null),
        any::<bool>().prop_map(StateValue::Bool),
        (-1_000_000i32..1_000_000).prop_map(|n| StateValue::Number(f64::from(n))),
        "[a-zA-Z0-9 ]{0,12}".prop_map(StateValue::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(StateValue::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m: BTreeMap<String, StateValue>| StateValue::Object(m)),
        ]
    })
}

proptest! {
    #[test]
    fn parse_path_inverts_create_path(
        pathname in arbitrary_pathname(),
        search in arbitrary_search(),
        hash in arbitrary_hash(),
    ) {
        let path = create_path(&pathname, &search, &hash);
        let parsed = parse_path(&path);

        prop_assert_eq!(parsed.pathname.as_deref(), Some(pathname.as_str()));
        prop_assert_eq!(parsed.search.unwrap_or_default(), search);
        prop_assert_eq!(parsed.hash.unwrap_or_default(), hash);
    }

    #[test]
    fn plain_pathnames_decode_to_themselves(pathname in arbitrary_pathname()) {
        prop_assert_eq!(decode_pathname(&pathname).unwrap(), pathname);
    }

    #[test]
    fn reserved_escapes_survive_decoding(
        head in arbitrary_pathname(),
        escape in prop::sample::select(vec!["%2F", "%3F", "%23", "%26", "%3D"]),
    ) {
        let pathname = format!("{head}{escape}");
        prop_assert_eq!(decode_pathname(&pathname).unwrap(), pathname);
    }

    #[test]
    fn create_location_is_deterministic(
        pathname in arbitrary_pathname(),
        search in arbitrary_search(),
    ) {
        let path = format!("{pathname}{search}");
        let a = create_location(path.as_str(), Action::Push, Some("k".to_string())).unwrap();
        let b = create_location(path.as_str(), Action::Push, Some("k".to_string())).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn state_equality_is_reflexive(state in arbitrary_state()) {
        prop_assert!(states_are_equal(&state, &state.clone()));
    }

    #[test]
    fn state_equality_is_symmetric(a in arbitrary_state(), b in arbitrary_state()) {
        prop_assert_eq!(states_are_equal(&a, &b), states_are_equal(&b, &a));
    }

    #[test]
    fn state_roundtrip_serialization(state in arbitrary_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let restored: StateValue = serde_json::from_str(&json).unwrap();
        prop_assert!(states_are_equal(&state, &restored));
    }

    #[test]
    fn every_allowed_push_notifies_once(paths in prop::collection::vec(arbitrary_pathname(), 1..8)) {
        let history = History::new(MemoryAdapter::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _unlisten = history.listen(move |location| sink.borrow_mut().push(location.clone()));

        for path in &paths {
            prop_assert!(history.push(path.as_str()).unwrap().is_committed());
        }

        let seen = seen.borrow();
        prop_assert_eq!(seen.len(), paths.len() + 1);
        prop_assert_eq!(&seen[seen.len() - 1].pathname, &paths[paths.len() - 1]);
        prop_assert_eq!(history.adapter().entries().len(), paths.len() + 1);
    }

    #[test]
    fn blocked_pushes_change_nothing(paths in prop::collection::vec(arbitrary_pathname(), 1..8)) {
        let history = History::new(MemoryAdapter::new());
        let _guard = history.listen_before(|_, _| HookResult::Block);
        let before = history.current_location();

        for path in &paths {
            history.push(path.as_str()).unwrap();
        }

        prop_assert_eq!(history.current_location(), before);
        prop_assert_eq!(history.adapter().entries().len(), 1);
        prop_assert_eq!(history.generation(), paths.len() as u64);
    }

    #[test]
    fn back_then_forward_returns_to_the_same_entry(
        paths in prop::collection::vec(arbitrary_pathname(), 1..6),
        steps in 1usize..6,
    ) {
        let history = History::new(MemoryAdapter::new());
        let _unlisten = history.listen(|_| {});
        for path in &paths {
            history.push(path.as_str()).unwrap();
        }
        let steps = steps.min(paths.len()) as isize;
        let before = history.current_location();

        history.go(-steps).unwrap();
        history.go(steps).unwrap();

        let after = history.current_location();
        prop_assert_eq!(after.key, before.key);
        prop_assert_eq!(after.pathname, before.pathname);
        prop_assert_eq!(after.action, Action::Pop);
    }
}
