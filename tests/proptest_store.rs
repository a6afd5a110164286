//! Property-based tests for the user store and the graph handlers.
//!
//! bcrypt makes every registration slow, so case counts and user counts are
//! kept small.

mod common;

use std::collections::HashSet;

use proptest::prelude::*;
use tempfile::TempDir;
use users_service::store::{Change, NewUser, User, UserStore};

fn open_store() -> (UserStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = UserStore::open(dir.path().join("users").join("users.db")).unwrap();
    (store, dir)
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        email: format!("{}@example.com", username),
        username: username.to_string(),
        password: "pw".to_string(),
        ..NewUser::default()
    }
}

/// Flip the case of the characters selected by `mask`.
fn case_variant(s: &str, mask: u32) -> String {
    s.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask >> (i % 32) & 1 == 1 {
                if c.is_ascii_lowercase() {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            } else {
                c
            }
        })
        .collect()
}

/// A notification or saved-thread edit over a small id alphabet.
#[derive(Debug, Clone)]
enum InboxOp {
    SaveNotif(usize),
    MarkAllAsRead,
    ClearNotifs,
    SaveThread(usize),
    RemoveSaved(usize),
}

fn inbox_ops() -> impl Strategy<Value = Vec<InboxOp>> {
    let op = prop_oneof![
        3 => (0usize..3).prop_map(InboxOp::SaveNotif),
        2 => Just(InboxOp::MarkAllAsRead),
        1 => Just(InboxOp::ClearNotifs),
        2 => (0usize..3).prop_map(InboxOp::SaveThread),
        1 => (0usize..3).prop_map(InboxOp::RemoveSaved),
    ];
    proptest::collection::vec(op, 1..16)
}

/// No notification id is both unread and read, and saved threads are unique.
fn assert_inbox_consistent(user: &User) {
    let unread: HashSet<_> = user.unread_notifs.iter().map(|n| &n.id).collect();
    for read in &user.read_notifs {
        assert!(!unread.contains(&read.id), "{} is both unread and read", read.id);
    }
    let saved: HashSet<_> = user.saved_threads.iter().collect();
    assert_eq!(saved.len(), user.saved_threads.len(), "duplicate saved thread");
}

/// Up to four usernames, distinct ignoring case.
fn usernames() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-zA-Z][a-zA-Z0-9_]{0,11}", 1..=4).prop_map(|names| {
        let mut seen = HashSet::new();
        names
            .into_iter()
            .filter(|name| seen.insert(name.to_lowercase()))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn registered_users_are_discoverable_in_any_case(
        names in usernames(),
        mask in any::<u32>(),
    ) {
        let (store, _dir) = open_store();
        let mut uids = Vec::new();
        for name in &names {
            uids.push(store.register_user(new_user(name)).unwrap());
        }

        for (name, uid) in names.iter().zip(&uids) {
            prop_assert_eq!(&store.find_user_id_by_username(&case_variant(name, mask)).unwrap(), uid);
            let email = format!("{}@example.com", name);
            prop_assert_eq!(&store.find_user_id_by_email(&case_variant(&email, mask)).unwrap(), uid);
            prop_assert_eq!(&store.user(uid).unwrap().basic.username, name);
        }
    }

    #[test]
    fn remaps_keep_usernames_unique(
        names in usernames(),
        renames in proptest::collection::vec((0usize..4, "[a-zA-Z]{1,6}"), 0..8),
    ) {
        let (store, _dir) = open_store();
        let uids: Vec<String> = names
            .iter()
            .map(|name| store.register_user(new_user(name)).unwrap())
            .collect();

        for (who, new_name) in renames {
            let Some(uid) = uids.get(who % uids.len()) else { continue };
            // Conflicts are expected; the invariant must hold either way
            let _ = store.map_username(&new_name, uid);
        }

        let mut seen = HashSet::new();
        for uid in &uids {
            let username = store.username_of(uid).unwrap();
            prop_assert!(seen.insert(username.to_lowercase()), "duplicate username {}", username);
            prop_assert_eq!(&store.find_user_id_by_username(&username).unwrap(), uid);
            prop_assert_eq!(&store.find_user_id_by_username(&username.to_uppercase()).unwrap(), uid);
        }
    }

    #[test]
    fn update_user_stores_what_the_transform_produced(
        about in ".{0,40}",
        followers in proptest::collection::vec("[a-f0-9]{8}", 0..5),
        last in any::<i64>(),
    ) {
        let (store, _dir) = open_store();
        let uid = store.register_user(new_user("subject")).unwrap();

        let mut expected = store.user(&uid).unwrap();
        expected.basic.about = about.clone();
        expected.followers_ids = followers.clone();
        expected.last_time_created = last;

        let change = store
            .update_user(&uid, move |user| {
                user.basic.about = about;
                user.followers_ids = followers;
                user.last_time_created = last;
                Change::Modified
            })
            .unwrap();
        prop_assert_eq!(change, Change::Modified);
        prop_assert_eq!(store.user(&uid).unwrap(), expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    #[test]
    fn follow_then_unfollow_restores_the_graph(
        edges in proptest::collection::vec((0usize..3, 0usize..3), 1..6),
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let app = common::TestService::new().unwrap();
            let names = ["ann", "ben", "cat"];
            let mut uids = Vec::new();
            for name in names {
                uids.push(app.register(name).await.unwrap());
            }

            let mut expected = HashSet::new();
            for &(from, to) in &edges {
                if from == to {
                    continue;
                }
                let (Some(uid), Some(target)) = (uids.get(from), names.get(to)) else { continue };
                app.service.follow_user(uid, target).await.unwrap();
                expected.insert((from, to));
            }

            for (i, uid) in uids.iter().enumerate() {
                let user = app.store.user(uid).unwrap();
                for (j, other) in uids.iter().enumerate() {
                    let edge = expected.contains(&(i, j));
                    assert_eq!(user.following_ids.contains(other), edge);
                    assert_eq!(app.store.user(other).unwrap().followers_ids.contains(uid), edge);
                }
                let unique: HashSet<_> = user.following_ids.iter().collect();
                assert_eq!(unique.len(), user.following_ids.len());
            }

            for &(from, to) in &edges {
                if from == to {
                    continue;
                }
                let (Some(uid), Some(target)) = (uids.get(from), names.get(to)) else { continue };
                app.service.unfollow_user(uid, target).await.unwrap();
            }
            for uid in &uids {
                let user = app.store.user(uid).unwrap();
                assert!(user.following_ids.is_empty());
                assert!(user.followers_ids.is_empty());
            }
        });
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn inbox_edits_keep_notifs_partitioned_and_saves_unique(ops in inbox_ops()) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let app = common::TestService::new().unwrap();
            let uid = app.register("inbox").await.unwrap();
            let ids = ["n0", "n1", "n2"];
            let threads = ["t0", "t1", "t2"];

            for (step, op) in ops.iter().enumerate() {
                match *op {
                    InboxOp::SaveNotif(i) => {
                        let notif = common::notif(ids[i], &format!("step {}", step));
                        app.service.save_notif(&uid, notif).await.unwrap();
                    }
                    InboxOp::MarkAllAsRead => {
                        app.service.mark_all_as_read(&uid).await.unwrap();
                        let once = app.store.user(&uid).unwrap();
                        assert!(once.unread_notifs.is_empty());
                        app.service.mark_all_as_read(&uid).await.unwrap();
                        assert_eq!(app.store.user(&uid).unwrap(), once);
                    }
                    InboxOp::ClearNotifs => app.service.clear_notifs(&uid).await.unwrap(),
                    InboxOp::SaveThread(i) => {
                        let thread = common::thread("s", threads[i]);
                        app.service.save_thread(&uid, thread).await.unwrap();
                    }
                    InboxOp::RemoveSaved(i) => {
                        let thread = common::thread("s", threads[i]);
                        app.service.remove_saved(&uid, thread).await.unwrap();
                    }
                }
                assert_inbox_consistent(&app.store.user(&uid).unwrap());
            }
        });
    }
}
