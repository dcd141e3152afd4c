//! Property-based tests for session store transitions

use std::sync::Arc;

use campus_connect::app::{Epoch, MemoryTokenStore, SessionStatus, SessionStore};
use campus_connect::shared::Role;
use proptest::prelude::*;

use crate::common::{identity, tokens};

#[derive(Debug, Clone)]
enum Step {
    SignIn(Role),
    Rename(String),
    Clear,
}

fn any_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        prop_oneof![Just(Role::Student), Just(Role::Faculty), Just(Role::Admin)].prop_map(Step::SignIn),
        "[a-z]{1,8}".prop_map(Step::Rename),
        Just(Step::Clear),
    ]
}

/// Apply `steps` to a fresh store, recording the epoch after each one
fn run(steps: &[Step]) -> (SessionStore, Arc<MemoryTokenStore>, Vec<Epoch>) {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let storage = Arc::new(MemoryTokenStore::new());
    let store = SessionStore::new(storage.clone());
    let mut epochs = Vec::with_capacity(steps.len() + 1);

    runtime.block_on(async {
        store.initialize().await.unwrap();
        epochs.push(store.epoch());
        for step in steps {
            match step {
                Step::SignIn(role) => {
                    store.set_authenticated(identity(1, "u", *role), tokens("A", "R")).await.unwrap();
                }
                Step::Rename(name) => {
                    let mut renamed = identity(1, "u", Role::Student);
                    renamed.first_name = name.clone();
                    store.update_identity(renamed).await;
                }
                Step::Clear => store.clear().await,
            }
            epochs.push(store.epoch());
        }
    });

    (store, storage, epochs)
}

proptest! {
    #[test]
    fn test_identity_present_iff_authenticated(steps in prop::collection::vec(any_step(), 0..20)) {
        let (store, storage, _) = run(&steps);
        let session = store.snapshot();
        let contents = storage.contents();

        prop_assert_eq!(session.identity().is_some(), session.status() == SessionStatus::Authenticated);
        if session.is_authenticated() {
            prop_assert!(session.access_token().is_some());
            prop_assert_eq!(contents.access.as_deref(), Some("A"));
        } else {
            prop_assert!(contents.is_empty());
        }
    }

    #[test]
    fn test_ending_with_clear_is_anonymous(steps in prop::collection::vec(any_step(), 0..20)) {
        let mut steps = steps;
        steps.push(Step::Clear);
        let (store, storage, _) = run(&steps);

        prop_assert_eq!(store.status(), SessionStatus::Anonymous);
        prop_assert!(storage.contents().is_empty());
    }

    #[test]
    fn test_epoch_never_decreases(steps in prop::collection::vec(any_step(), 1..20)) {
        let (store, _, epochs) = run(&steps);

        prop_assert_eq!(epochs.len(), steps.len() + 1);
        for pair in epochs.windows(2) {
            prop_assert!(pair[1] >= pair[0], "epoch went back from {:?} to {:?}", pair[0], pair[1]);
        }
        prop_assert_eq!(epochs.last().copied(), Some(store.epoch()));
    }

    #[test]
    fn test_sign_in_and_clear_always_advance_epoch(steps in prop::collection::vec(any_step(), 1..20)) {
        let (_, _, epochs) = run(&steps);

        for (step, pair) in steps.iter().zip(epochs.windows(2)) {
            if matches!(step, Step::SignIn(_) | Step::Clear) {
                prop_assert!(pair[1] > pair[0], "{:?} did not advance the epoch", step);
            }
        }
    }
}
