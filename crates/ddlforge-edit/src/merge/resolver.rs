//! Merge resolver implementation
//!
//! Runs once per compile pass over the pending command queue. After the
//! pass, for every target ref at most one net Create, one net Modify and
//! one net Rename survive; a Delete supersedes and cancels everything
//! else recorded for that ref. Set-valued permission edits fold into one
//! canonical grant and one canonical revoke per (target, grantee).

use crate::{Command, CommandKind, Polarity};
use ddlforge_model::{ObjectRef, PrivilegeSet};
use std::collections::HashMap;

/// Typed key for permission folding: which relationship a set edit
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PermissionKey {
    target: ObjectRef,
    grantee: String,
}

/// Per-compile merge bookkeeping.
///
/// Replaces the original string-keyed, hash-derived parameter bag with
/// typed keys; built fresh for every compile pass and discarded after.
#[derive(Debug, Default)]
struct MergeSession {
    /// Canonical grant/revoke command positions per relationship.
    permissions: HashMap<PermissionKey, PermissionSlot>,
    /// Position of the surviving Create / Modify / Rename / Invalidate
    /// per target.
    creates: HashMap<ObjectRef, usize>,
    modifies: HashMap<ObjectRef, usize>,
    renames: HashMap<ObjectRef, usize>,
    invalidates: HashMap<ObjectRef, usize>,
}

#[derive(Debug, Default, Clone, Copy)]
struct PermissionSlot {
    grant: Option<usize>,
    revoke: Option<usize>,
}

/// Fold a pending command queue into its minimal net form.
///
/// Input order is submission order; surviving commands keep their
/// relative order.
pub fn resolve(commands: Vec<Command>) -> Vec<Command> {
    let mut session = MergeSession::default();
    // Slots keep positions stable while folding removes commands.
    let mut slots: Vec<Option<Command>> = Vec::with_capacity(commands.len());

    for command in commands {
        match &command.kind {
            CommandKind::Delete { .. } => apply_delete(&mut session, &mut slots, command),
            CommandKind::Create { .. } => apply_create(&mut session, &mut slots, command),
            CommandKind::Modify => apply_modify(&mut session, &mut slots, command),
            CommandKind::Rename { .. } => apply_rename(&mut session, &mut slots, command),
            CommandKind::Permission { .. } => apply_permission(&mut session, &mut slots, command),
            CommandKind::Invalidate => apply_invalidate(&mut session, &mut slots, command),
        }
    }

    // Permission commands whose net set drained to empty emit nothing.
    for slot in session.permissions.values() {
        for idx in [slot.grant, slot.revoke].into_iter().flatten() {
            let drained = matches!(
                &slots[idx],
                Some(Command {
                    kind: CommandKind::Permission { privileges, .. },
                    ..
                }) if privileges.is_empty()
            );
            if drained {
                slots[idx] = None;
            }
        }
    }

    slots.into_iter().flatten().collect()
}

/// Delete cancels every pending command for the target and everything
/// nested under it. Deleting an object created in the same batch nets to
/// nothing at all.
fn apply_delete(session: &mut MergeSession, slots: &mut Vec<Option<Command>>, command: Command) {
    let target = &command.target;
    let was_unpersisted_create = session.creates.contains_key(target);

    for slot in slots.iter_mut() {
        // Pending child Deletes survive: they are ordered before the
        // parent drop (or suppressed later by a cascade), never merged
        // away here.
        let cancel = slot.as_ref().is_some_and(|c| {
            c.target == *target
                || (!c.is_delete()
                    && (target.contains(&c.target) || c.owner_ref().as_ref() == Some(target)))
        });
        if cancel {
            if let Some(cancelled) = slot.take() {
                tracing::debug!(
                    command = %cancelled.title,
                    target = %cancelled.target.qualified_name(),
                    "delete supersedes pending command"
                );
                session.forget(&cancelled);
            }
        }
    }

    if was_unpersisted_create {
        // Create + delete of the same new object: net zero.
        tracing::debug!(target = %target.qualified_name(), "create and delete cancel out");
        return;
    }
    slots.push(Some(command));
}

fn apply_create(session: &mut MergeSession, slots: &mut Vec<Option<Command>>, command: Command) {
    if let Some(&idx) = session.creates.get(&command.target) {
        if let Some(existing) = slots[idx].as_mut() {
            existing.properties.merge_from(&command.properties);
            return;
        }
    }
    session.creates.insert(command.target.clone(), slots.len());
    slots.push(Some(command));
}

fn apply_modify(session: &mut MergeSession, slots: &mut Vec<Option<Command>>, command: Command) {
    // A pending Create for the same new object absorbs the deltas: the
    // final CREATE reflects the union, and no ALTER is emitted.
    if let Some(&idx) = session.creates.get(&command.target) {
        if let Some(create) = slots[idx].as_mut() {
            create.properties.merge_from(&command.properties);
            return;
        }
    }
    if let Some(&idx) = session.modifies.get(&command.target) {
        if let Some(existing) = slots[idx].as_mut() {
            existing.properties.merge_from(&command.properties);
            return;
        }
    }
    session.modifies.insert(command.target.clone(), slots.len());
    slots.push(Some(command));
}

/// The very first and very last rename produce the final one: old name is
/// never overwritten once set, new name is always the latest.
fn apply_rename(session: &mut MergeSession, slots: &mut Vec<Option<Command>>, command: Command) {
    let incoming_new = match &command.kind {
        CommandKind::Rename { new_name, .. } => new_name.clone(),
        _ => unreachable!(),
    };
    if let Some(&idx) = session.renames.get(&command.target) {
        if let Some(Command {
            kind: CommandKind::Rename { new_name, .. },
            ..
        }) = slots[idx].as_mut()
        {
            *new_name = incoming_new;
            return;
        }
    }
    session.renames.insert(command.target.clone(), slots.len());
    slots.push(Some(command));
}

fn apply_permission(session: &mut MergeSession, slots: &mut Vec<Option<Command>>, command: Command) {
    let (polarity, incoming, grantee) = match &command.kind {
        CommandKind::Permission {
            polarity,
            privileges,
            grantee,
        } => (*polarity, privileges.clone(), grantee.clone()),
        _ => unreachable!(),
    };
    let key = PermissionKey {
        target: command.target.clone(),
        grantee,
    };
    let slot = session.permissions.entry(key).or_default();

    let (same, opposite) = match polarity {
        Polarity::Grant => (&mut slot.grant, &mut slot.revoke),
        Polarity::Revoke => (&mut slot.revoke, &mut slot.grant),
    };

    // A privilege granted and revoked in the same batch nets to nothing:
    // the overlap cancels out of both sets, and only the remainder joins
    // the canonical same-polarity set.
    let mut incoming = incoming;
    if let Some(idx) = *opposite {
        if let Some(Command {
            kind: CommandKind::Permission { privileges, .. },
            ..
        }) = slots[idx].as_mut()
        {
            let overlap: PrivilegeSet = incoming
                .iter()
                .filter(|p| privileges.contains(*p))
                .collect();
            privileges.subtract(&overlap);
            incoming.subtract(&overlap);
        }
    }
    match *same {
        Some(idx) => {
            if let Some(Command {
                kind: CommandKind::Permission { privileges, .. },
                ..
            }) = slots[idx].as_mut()
            {
                privileges.extend_from(&incoming);
            }
        }
        None => {
            if incoming.is_empty() {
                return;
            }
            let mut command = command;
            if let CommandKind::Permission { privileges, .. } = &mut command.kind {
                *privileges = incoming;
            }
            *same = Some(slots.len());
            slots.push(Some(command));
        }
    }
}

fn apply_invalidate(session: &mut MergeSession, slots: &mut Vec<Option<Command>>, command: Command) {
    if session.invalidates.contains_key(&command.target) {
        return;
    }
    session
        .invalidates
        .insert(command.target.clone(), slots.len());
    slots.push(Some(command));
}

impl MergeSession {
    /// Drop every index that pointed at a cancelled command.
    fn forget(&mut self, cancelled: &Command) {
        let target = &cancelled.target;
        self.creates.remove(target);
        self.modifies.remove(target);
        self.renames.remove(target);
        self.invalidates.remove(target);
        if let Some(grantee) = cancelled.grantee() {
            self.permissions.remove(&PermissionKey {
                target: target.clone(),
                grantee: grantee.to_string(),
            });
        }
    }
}
