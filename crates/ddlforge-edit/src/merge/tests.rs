//! Tests for the merge resolver

use super::resolve;
use crate::{Command, CommandKind, Polarity};
use ddlforge_model::{ObjectKind, ObjectRef, Privilege, PrivilegeSet};
use serde_json::json;

fn table(name: &str) -> ObjectRef {
    ObjectRef::new(["public"], name, ObjectKind::Table)
}

fn privs(list: &[Privilege]) -> PrivilegeSet {
    list.iter().copied().collect()
}

mod create_modify_tests {
    use super::*;

    #[test]
    fn test_create_absorbs_later_modifies() {
        let t = table("users");
        let commands = vec![
            Command::create(t.clone()),
            Command::modify(t.clone()).with_new_property("comment", json!("people")),
            Command::modify(t.clone()).with_new_property("tablespace", json!("fast")),
        ];
        let merged = resolve(commands);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_create());
        assert_eq!(merged[0].properties.new_str("comment"), Some("people"));
        assert_eq!(merged[0].properties.new_str("tablespace"), Some("fast"));
    }

    #[test]
    fn test_repeated_modifies_fold_to_one() {
        let t = table("users");
        let commands = vec![
            Command::modify(t.clone()).with_property("comment", Some(json!("a")), Some(json!("b"))),
            Command::modify(t.clone()).with_property("comment", Some(json!("b")), Some(json!("c"))),
        ];
        let merged = resolve(commands);
        assert_eq!(merged.len(), 1);
        let delta = merged[0].properties.get(&"comment".into()).unwrap();
        assert_eq!(delta.old, Some(json!("a")));
        assert_eq!(delta.new, Some(json!("c")));
    }
}

mod delete_tests {
    use super::*;

    #[test]
    fn test_delete_supersedes_modify_and_rename() {
        let t = table("users");
        let commands = vec![
            Command::modify(t.clone()).with_new_property("comment", json!("x")),
            Command::rename(t.clone(), "accounts"),
            Command::delete(t.clone()),
        ];
        let merged = resolve(commands);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_delete());
    }

    #[test]
    fn test_create_then_delete_nets_to_nothing() {
        let t = table("scratch");
        let commands = vec![
            Command::create(t.clone()),
            Command::modify(t.clone()).with_new_property("comment", json!("x")),
            Command::delete(t),
        ];
        assert!(resolve(commands).is_empty());
    }

    #[test]
    fn test_delete_cancels_nested_creates_but_keeps_child_deletes() {
        let t = table("users");
        let new_col = Command::create(t.child(ObjectKind::Column, "age"));
        let drop_index = Command::delete(t.child(ObjectKind::Index, "users_email_idx"));
        let merged = resolve(vec![new_col, drop_index, Command::delete(t.clone())]);

        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(Command::is_delete));
        assert!(merged.iter().any(|c| c.target.kind == ObjectKind::Index));
        assert!(merged.iter().any(|c| c.target == t));
    }
}

mod rename_tests {
    use super::*;

    #[test]
    fn test_two_renames_collapse_to_one() {
        let t = table("a");
        let merged = resolve(vec![
            Command::rename(t.clone(), "b"),
            Command::rename(t.clone(), "c"),
        ]);
        assert_eq!(merged.len(), 1);
        match &merged[0].kind {
            CommandKind::Rename { old_name, new_name } => {
                assert_eq!(old_name, "a");
                assert_eq!(new_name, "c");
            }
            other => panic!("expected rename, got {other:?}"),
        }
    }
}

mod permission_tests {
    use super::*;

    #[test]
    fn test_grant_is_idempotent() {
        let t = table("users");
        let once = resolve(vec![Command::grant(
            t.clone(),
            "analyst",
            privs(&[Privilege::Select]),
        )]);
        let twice = resolve(vec![
            Command::grant(t.clone(), "analyst", privs(&[Privilege::Select])),
            Command::grant(t, "analyst", privs(&[Privilege::Select])),
        ]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_revoke_order_independent() {
        let t = table("users");
        // grant SELECT; grant INSERT; revoke SELECT
        let a = resolve(vec![
            Command::grant(t.clone(), "analyst", privs(&[Privilege::Select])),
            Command::grant(t.clone(), "analyst", privs(&[Privilege::Insert])),
            Command::revoke(t.clone(), "analyst", privs(&[Privilege::Select])),
        ]);
        // grant SELECT; revoke SELECT; grant INSERT
        let b = resolve(vec![
            Command::grant(t.clone(), "analyst", privs(&[Privilege::Select])),
            Command::revoke(t.clone(), "analyst", privs(&[Privilege::Select])),
            Command::grant(t, "analyst", privs(&[Privilege::Insert])),
        ]);

        let net = |merged: &[Command]| -> Vec<PrivilegeSet> {
            merged
                .iter()
                .filter_map(|c| match &c.kind {
                    CommandKind::Permission {
                        polarity: Polarity::Grant,
                        privileges,
                        ..
                    } => Some(privileges.clone()),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(net(&a), net(&b));
        assert_eq!(net(&a), vec![privs(&[Privilege::Insert])]);
    }

    #[test]
    fn test_drained_permission_emits_nothing() {
        let t = table("users");
        let merged = resolve(vec![
            Command::grant(t.clone(), "analyst", privs(&[Privilege::Select])),
            Command::revoke(t, "analyst", privs(&[Privilege::Select])),
        ]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_different_grantees_do_not_interact() {
        let t = table("users");
        let merged = resolve(vec![
            Command::grant(t.clone(), "analyst", privs(&[Privilege::Select])),
            Command::revoke(t, "intern", privs(&[Privilege::Select])),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_revoke_folds_into_canonical_negative() {
        let t = table("users");
        let merged = resolve(vec![
            Command::revoke(t.clone(), "analyst", privs(&[Privilege::Select])),
            Command::revoke(t, "analyst", privs(&[Privilege::Insert])),
        ]);
        assert_eq!(merged.len(), 1);
        match &merged[0].kind {
            CommandKind::Permission {
                polarity,
                privileges,
                ..
            } => {
                assert_eq!(*polarity, Polarity::Revoke);
                assert_eq!(privileges.len(), 2);
            }
            other => panic!("expected permission, got {other:?}"),
        }
    }
}

mod invalidate_tests {
    use super::*;

    #[test]
    fn test_invalidate_deduplicates() {
        let p = ObjectRef::new(["public"], "tally", ObjectKind::Procedure);
        let merged = resolve(vec![
            Command::invalidate(p.clone()),
            Command::invalidate(p),
        ]);
        assert_eq!(merged.len(), 1);
    }
}
