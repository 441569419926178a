//! The character-sheet widget tree and its command bindings.
//!
//! The host renders actor sheets as a tree of [`SheetNode`]s. During a
//! render, modules may splice their own nodes into the tree and bind
//! typed [`SheetCommand`]s to clicks; the host routes an activated
//! command back to the module that owns it.

use serde::{Deserialize, Serialize};

use crate::id::{ActorId, UserId};

/// A typed command dispatched when a sheet node is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetCommand {
    /// The module that owns the command.
    pub module: String,
    /// Module-defined action name.
    pub action: String,
    /// The actor whose sheet the command was activated on.
    pub actor: ActorId,
}

impl SheetCommand {
    /// Create a command for a module action on an actor.
    pub fn new(module: impl Into<String>, action: impl Into<String>, actor: ActorId) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
            actor,
        }
    }
}

/// One node of a rendered sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetNode {
    /// Element tag, e.g. `"div"` or `"span"`.
    pub tag: String,
    /// CSS-style classes used to locate nodes in the tree.
    pub classes: Vec<String>,
    /// Text content, if any.
    pub text: Option<String>,
    /// Command bound to a primary click.
    pub on_click: Option<SheetCommand>,
    /// Command bound to a context (secondary) click.
    pub on_context: Option<SheetCommand>,
    /// Child nodes, in render order.
    pub children: Vec<SheetNode>,
}

impl SheetNode {
    /// Create an empty node with a tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a class (builder style).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the text content (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Bind a primary-click command (builder style).
    pub fn with_click(mut self, command: SheetCommand) -> Self {
        self.on_click = Some(command);
        self
    }

    /// Bind a context-click command (builder style).
    pub fn with_context(mut self, command: SheetCommand) -> Self {
        self.on_context = Some(command);
        self
    }

    /// Append a child (builder style).
    pub fn with_child(mut self, child: SheetNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns true if the node carries the class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search for the first node with a class.
    pub fn find_class(&self, class: &str) -> Option<&SheetNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_class(class))
    }

    /// Depth-first search for the first node with a class, mutable.
    pub fn find_class_mut(&mut self, class: &str) -> Option<&mut SheetNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|c| c.find_class_mut(class))
    }

    /// All nodes (self included, depth-first) carrying a class.
    pub fn all_with_class<'a>(&'a self, class: &str) -> Vec<&'a SheetNode> {
        let mut found = Vec::new();
        self.collect_class(class, &mut found);
        found
    }

    fn collect_class<'a>(&'a self, class: &str, found: &mut Vec<&'a SheetNode>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_class(class, found);
        }
    }
}

/// A sheet render in progress, handed to module render hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetRender {
    /// The actor being rendered. Hosts occasionally fire render hooks
    /// for sheets with no resolvable actor; modules must tolerate it.
    pub actor: Option<ActorId>,
    /// The user the sheet is rendered for.
    pub viewer: UserId,
    /// Whether the viewer owns the actor.
    pub owner: bool,
    /// Whether the sheet window is minimized.
    pub minimized: bool,
    /// Root of the widget tree; modules splice into this.
    pub root: SheetNode,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SheetNode {
        SheetNode::new("form").with_child(
            SheetNode::new("div").with_class("char-details").with_child(
                SheetNode::new("div")
                    .with_class("dots")
                    .with_child(SheetNode::new("span").with_class("hp")),
            ),
        )
    }

    #[test]
    fn find_class_descends() {
        let tree = sample_tree();
        let details = tree.find_class("char-details").unwrap();
        assert!(details.find_class("dots").is_some());
        assert!(tree.find_class("dots").is_some());
        assert!(tree.find_class("missing").is_none());
    }

    #[test]
    fn find_class_mut_allows_splicing() {
        let mut tree = sample_tree();
        let dots = tree.find_class_mut("dots").unwrap();
        dots.children
            .push(SheetNode::new("span").with_class("pip"));
        assert_eq!(tree.all_with_class("pip").len(), 1);
    }

    #[test]
    fn all_with_class_collects_in_order() {
        let tree = SheetNode::new("div")
            .with_child(SheetNode::new("span").with_class("pip").with_text("a"))
            .with_child(SheetNode::new("span").with_class("pip").with_text("b"));
        let pips = tree.all_with_class("pip");
        assert_eq!(pips.len(), 2);
        assert_eq!(pips[0].text.as_deref(), Some("a"));
        assert_eq!(pips[1].text.as_deref(), Some("b"));
    }
}
