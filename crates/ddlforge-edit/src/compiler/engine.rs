use crate::editor::{cache_container, editor_for, EditorContext};
use crate::editors::permission_actions;
use crate::{ActionKind, CacheEffect, Command, CommandKind, PersistAction};
use ddlforge_core::{CancelToken, DialectFeature, Result};
use ddlforge_model::ObjectRef;
use std::collections::{HashMap, HashSet};

/// Compile merged commands into the final action list.
pub fn compile_script(
    commands: &[Command],
    ctx: &EditorContext,
    cancel: &CancelToken,
) -> Result<Vec<PersistAction>> {
    cancel.check()?;

    let (mut deletes, mut others): (Vec<&Command>, Vec<&Command>) =
        commands.iter().partition(|c| c.is_delete());

    // Children drop before the object that owns them; everything else in
    // submission order.
    deletes.sort_by_key(|c| std::cmp::Reverse(c.target.depth()));
    // Parents create before the objects nested inside them.
    others.sort_by_key(|c| c.target.depth());

    let cascade_roots = cascade_roots(&deletes, ctx);
    let composition = NestedComposition::plan(&others, ctx);

    let mut actions = Vec::new();
    let mut action_for_target: HashMap<ObjectRef, usize> = HashMap::new();
    for command in &deletes {
        cancel.check()?;
        let owner = command.owner_ref();
        if cascade_roots
            .iter()
            .any(|root| root.contains(&command.target) || owner.as_ref() == Some(root))
        {
            tracing::debug!(
                target = %command.target,
                "drop folded into a cascading parent drop"
            );
            continue;
        }
        let cascade = cascade_roots.contains(&command.target);
        let editor = editor_for(command.target.kind);
        let before = actions.len();
        actions.extend(editor.delete_actions(command, cascade, ctx)?);
        if actions.len() > before {
            action_for_target.insert(command.target.clone(), actions.len() - 1);
        }
    }

    let mut trailing_invalidations = Vec::new();
    for command in &others {
        cancel.check()?;
        let editor = editor_for(command.target.kind);
        let before = actions.len();
        match &command.kind {
            CommandKind::Create { .. } => {
                if composition.is_inlined(&command.target) {
                    // Rendered inside the owner's CREATE body; only the
                    // trailing statements (comments etc.) remain.
                    actions.extend(editor.extra_actions(command, ctx)?);
                } else {
                    let nested = composition.fragments_for(&command.target);
                    actions.extend(editor.create_actions(command, nested, ctx)?);
                    actions.extend(editor.extra_actions(command, ctx)?);
                }
            }
            CommandKind::Modify => {
                actions.extend(editor.modify_actions(command, ctx)?);
                actions.extend(editor.extra_actions(command, ctx)?);
            }
            CommandKind::Rename { .. } => {
                actions.extend(editor.rename_actions(command, ctx)?);
            }
            CommandKind::Permission { .. } => {
                actions.extend(permission_actions(command, ctx)?);
            }
            CommandKind::Invalidate => {
                let container = cache_container(&command.target)
                    .unwrap_or_else(|| command.target.clone());
                trailing_invalidations
                    .push((command.target.clone(), CacheEffect::Invalidate(container)));
            }
            CommandKind::Delete { .. } => unreachable!("deletes were partitioned out"),
        }
        if actions.len() > before {
            action_for_target.insert(command.target.clone(), actions.len() - 1);
        }
    }

    // A definition refresh rides on its target's own statement (the rename
    // that scheduled it) so an unrelated optional statement failing cannot
    // drop it; a script with no statements has nothing to refresh after.
    for (target, effect) in trailing_invalidations {
        let idx = action_for_target
            .get(&target)
            .copied()
            .or_else(|| actions.iter().rposition(|a| a.kind != ActionKind::Optional))
            .or_else(|| actions.len().checked_sub(1));
        if let Some(idx) = idx {
            actions[idx].on_success.push(effect);
        }
    }

    Ok(actions)
}

/// Targets whose drop carries the CASCADE keyword and swallows the
/// explicit drops of everything nested under them.
fn cascade_roots(deletes: &[&Command], ctx: &EditorContext) -> HashSet<ObjectRef> {
    if !ctx.dialect.supports(DialectFeature::DropCascade) {
        return HashSet::new();
    }
    deletes
        .iter()
        .filter(|c| {
            matches!(c.kind, CommandKind::Delete { cascade: true })
                || ctx.options.cascade_on_delete
        })
        .map(|c| c.target.clone())
        .collect()
}

/// Inline-rendering plan for objects created together with their owner.
struct NestedComposition {
    /// CREATE-body fragments per newly created owner, declared order.
    fragments: HashMap<ObjectRef, Vec<String>>,
    /// Child targets consumed into an owner's CREATE body.
    inlined: HashSet<ObjectRef>,
}

impl NestedComposition {
    fn plan(creates_and_others: &[&Command], ctx: &EditorContext) -> Self {
        let created: HashSet<&ObjectRef> = creates_and_others
            .iter()
            .filter(|c| c.is_create())
            .map(|c| &c.target)
            .collect();

        let mut fragments: HashMap<ObjectRef, Vec<String>> = HashMap::new();
        let mut inlined = HashSet::new();
        for command in creates_and_others {
            if !command.is_create() {
                continue;
            }
            let Some(owner) = command.owner_ref() else {
                continue;
            };
            if !created.contains(&owner) {
                continue;
            }
            let editor = editor_for(command.target.kind);
            if let Some(fragment) = editor.nested_declaration(command, ctx) {
                fragments.entry(owner).or_default().push(fragment);
                inlined.insert(command.target.clone());
            }
        }
        Self { fragments, inlined }
    }

    fn is_inlined(&self, target: &ObjectRef) -> bool {
        self.inlined.contains(target)
    }

    fn fragments_for(&self, owner: &ObjectRef) -> &[String] {
        self.fragments.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }
}
