//! Auto-markdown key handling.
//!
//! Space, backspace and enter each own an ordered table of rules. The first
//! rule whose predicate holds decides the outcome: decline (the host applies
//! its default behavior), delegate to another handler, or act with a plan of
//! block transforms. Every other key passes through untouched.

use smol_str::SmolStr;

use crate::shortcuts::{ShortcutTable, shortcut_prefix};
use crate::state::EditorState;
use crate::transforms::Transform;
use crate::types::BlockType;

/// Key values the editor understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),
    Space,
    Backspace,
    Enter,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
}

impl Key {
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Key producing `ch`: space and newline map to their named keys.
    pub fn from_char(ch: char) -> Self {
        match ch {
            ' ' => Self::Space,
            '\n' => Self::Enter,
            other => Self::character(other.to_string()),
        }
    }

    /// The shortcut handler inspecting this key, if any.
    pub fn handler(&self) -> Option<Handler> {
        match self {
            Self::Space => Some(Handler::Space),
            Self::Backspace => Some(Handler::Backspace),
            Self::Enter => Some(Handler::Enter),
            _ => None,
        }
    }
}

/// The three intercepted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    Space,
    Backspace,
    Enter,
}

impl Handler {
    pub fn as_str(self) -> &'static str {
        match self {
            Handler::Space => "space",
            Handler::Backspace => "backspace",
            Handler::Enter => "enter",
        }
    }

    fn rules(self) -> &'static [KeyRule] {
        match self {
            Handler::Space => SPACE_RULES,
            Handler::Backspace => BACKSPACE_RULES,
            Handler::Enter => ENTER_RULES,
        }
    }
}

/// Result of handling a keydown event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Event was handled, prevent default.
    Handled,
    /// Handler declined, let the host apply its default.
    NotHandled,
    /// Key is not inspected by any handler.
    PassThrough,
}

/// What a handler sees of the editor: the focused block and the selection
/// inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyContext {
    pub block_type: BlockType,
    pub text: String,
    pub anchor: usize,
    pub focus: usize,
}

impl KeyContext {
    pub fn new(block_type: BlockType, text: impl Into<String>, anchor: usize, focus: usize) -> Self {
        Self {
            block_type,
            text: text.into(),
            anchor,
            focus,
        }
    }

    pub fn collapsed(block_type: BlockType, text: impl Into<String>, caret: usize) -> Self {
        Self::new(block_type, text, caret, caret)
    }

    pub fn from_state(state: &EditorState) -> Option<Self> {
        let block = state.focus_block()?;
        let text = block.text()?.text();
        Some(Self::new(
            block.kind,
            text,
            state.selection.anchor_offset,
            state.selection.focus_offset,
        ))
    }

    pub fn is_expanded(&self) -> bool {
        self.anchor != self.focus
    }

    /// Start of the selection.
    pub fn caret(&self) -> usize {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }

    /// Block length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Not a shortcut key.
    Ignored,
    Declined {
        handler: Handler,
        rule: &'static str,
    },
    Handled {
        handler: Handler,
        rule: &'static str,
        plan: Vec<Transform>,
    },
}

impl Decision {
    pub fn result(&self) -> KeydownResult {
        match self {
            Decision::Ignored => KeydownResult::PassThrough,
            Decision::Declined { .. } => KeydownResult::NotHandled,
            Decision::Handled { .. } => KeydownResult::Handled,
        }
    }

    pub fn rule(&self) -> Option<&'static str> {
        match self {
            Decision::Ignored => None,
            Decision::Declined { rule, .. } | Decision::Handled { rule, .. } => Some(*rule),
        }
    }

    pub fn plan(&self) -> &[Transform] {
        match self {
            Decision::Handled { plan, .. } => plan,
            _ => &[],
        }
    }
}

type Predicate = fn(&KeyContext, &ShortcutTable) -> bool;
type Planner = fn(&KeyContext, &ShortcutTable) -> Vec<Transform>;

enum Verdict {
    Decline,
    Delegate(Handler),
    Act(Planner),
}

struct KeyRule {
    name: &'static str,
    when: Predicate,
    verdict: Verdict,
}

static SPACE_RULES: &[KeyRule] = &[
    KeyRule {
        name: "expanded-selection",
        when: expanded,
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "no-shortcut",
        when: |ctx, table| resolved(ctx, table).is_none(),
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "container-target",
        when: |ctx, table| resolved(ctx, table).is_some_and(BlockType::is_container),
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "already-list-item",
        when: |ctx, table| {
            resolved(ctx, table) == Some(BlockType::ListItem)
                && ctx.block_type == BlockType::ListItem
        },
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "apply-shortcut",
        when: always,
        verdict: Verdict::Act(shortcut_plan),
    },
];

static BACKSPACE_RULES: &[KeyRule] = &[
    KeyRule {
        name: "expanded-selection",
        when: expanded,
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "caret-not-at-start",
        when: |ctx, _| ctx.caret() != 0,
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "already-paragraph",
        when: |ctx, _| ctx.block_type == BlockType::Paragraph,
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "revert-to-paragraph",
        when: always,
        verdict: Verdict::Act(revert_plan),
    },
];

static ENTER_RULES: &[KeyRule] = &[
    KeyRule {
        name: "expanded-selection",
        when: expanded,
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "empty-block",
        when: |ctx, _| ctx.caret() == 0 && ctx.is_empty(),
        verdict: Verdict::Delegate(Handler::Backspace),
    },
    KeyRule {
        name: "caret-not-at-end",
        when: |ctx, _| ctx.end() != ctx.len(),
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "continuing-block",
        when: |ctx, _| !(ctx.block_type.is_heading() || ctx.block_type == BlockType::BlockQuote),
        verdict: Verdict::Decline,
    },
    KeyRule {
        name: "exit-block",
        when: always,
        verdict: Verdict::Act(|_, _| {
            vec![
                Transform::SplitBlockAtCaret,
                Transform::SetBlockType(BlockType::Paragraph),
            ]
        }),
    },
];

fn expanded(ctx: &KeyContext, _: &ShortcutTable) -> bool {
    ctx.is_expanded()
}

fn always(_: &KeyContext, _: &ShortcutTable) -> bool {
    true
}

fn resolved(ctx: &KeyContext, table: &ShortcutTable) -> Option<BlockType> {
    table.resolve(&shortcut_prefix(&ctx.text, ctx.caret()))
}

fn shortcut_plan(ctx: &KeyContext, table: &ShortcutTable) -> Vec<Transform> {
    let Some(kind) = resolved(ctx, table) else {
        return Vec::new();
    };
    let mut plan = vec![Transform::SetBlockType(kind)];
    if kind == BlockType::ListItem {
        plan.push(Transform::WrapInContainer(BlockType::BulletedList));
    }
    plan.push(Transform::DeleteRange {
        from: 0,
        to: ctx.caret(),
    });
    plan
}

fn revert_plan(ctx: &KeyContext, _: &ShortcutTable) -> Vec<Transform> {
    let mut plan = vec![Transform::SetBlockType(BlockType::Paragraph)];
    if ctx.block_type == BlockType::ListItem {
        plan.push(Transform::UnwrapFromContainer(BlockType::BulletedList));
    }
    plan
}

/// Decide how `key` is handled in `ctx`.
pub fn decide(key: &Key, ctx: &KeyContext, shortcuts: &ShortcutTable) -> Decision {
    match key.handler() {
        Some(handler) => decide_handler(handler, ctx, shortcuts),
        None => Decision::Ignored,
    }
}

/// Run one handler's rule table.
pub fn decide_handler(handler: Handler, ctx: &KeyContext, shortcuts: &ShortcutTable) -> Decision {
    let Some(rule) = handler.rules().iter().find(|r| (r.when)(ctx, shortcuts)) else {
        return Decision::Declined {
            handler,
            rule: "no-rule",
        };
    };
    match &rule.verdict {
        Verdict::Decline => Decision::Declined {
            handler,
            rule: rule.name,
        },
        Verdict::Delegate(target) => {
            tracing::trace!(
                target: "mazimo::keys",
                from = handler.as_str(),
                to = target.as_str(),
                rule = rule.name,
                "delegating"
            );
            decide_handler(*target, ctx, shortcuts)
        }
        Verdict::Act(planner) => Decision::Handled {
            handler,
            rule: rule.name,
            plan: planner(ctx, shortcuts),
        },
    }
}
