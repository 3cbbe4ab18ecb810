//! Rule name to action pool registry and parse tree replay

use std::collections::HashMap;

use super::{Action, ActionError, ActionPool, ConfigurationError, Handler, Matched};
use crate::grammar::ParseNode;

/// Index of a registered action within its [`ActionSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

/// The actions of one grammar, all producing values of type `V`
pub struct ActionSet<V> {
    handlers: Vec<Box<dyn Handler<V>>>,
    index: HashMap<String, ActionId>,
}

impl<V: 'static> ActionSet<V> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register the action for `rule` with explicit action and part factories.
    pub fn register<A>(
        &mut self,
        rule: &str,
        make_action: fn() -> A,
        make_part: fn() -> A::Part,
    ) -> Result<ActionId, ConfigurationError>
    where
        A: Action<Value = V> + 'static,
        A::Part: 'static,
    {
        if self.index.contains_key(rule) {
            return Err(ConfigurationError::DuplicateAction(rule.to_string()));
        }

        let id = ActionId(self.handlers.len());
        self.handlers
            .push(Box::new(ActionPool::new(rule, make_action, make_part)));
        self.index.insert(rule.to_string(), id);
        Ok(id)
    }

    pub fn lookup(&self, rule: &str) -> Option<ActionId> {
        self.index.get(rule).copied()
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.index.contains_key(rule)
    }

    /// Rule names in registration order
    pub fn rules(&self) -> impl Iterator<Item = &str> + '_ {
        self.handlers.iter().map(|handler| handler.rule())
    }

    /// In-progress invocations of `rule` (0 for unregistered rules)
    pub fn depth(&self, rule: &str) -> usize {
        self.handler(rule).map_or(0, |handler| handler.depth())
    }

    /// Slot count of `rule` (0 for unregistered rules)
    pub fn high_water_mark(&self, rule: &str) -> usize {
        self.handler(rule)
            .map_or(0, |handler| handler.high_water_mark())
    }

    /// Whether no invocation of any rule is in progress
    pub fn is_idle(&self) -> bool {
        self.handlers.iter().all(|handler| handler.depth() == 0)
    }

    /// Replay a parse tree bottom-up through the registered actions.
    ///
    /// Each node with an action acquires a slot, receives its children's
    /// matches left to right and is finished into a value. Nodes without an
    /// action yield `None` and are not descended into. When any action
    /// fails, every slot acquired on the way down is reset before the error
    /// is returned.
    pub fn apply(&mut self, node: &ParseNode<'_>) -> Result<Option<V>, ActionError> {
        match self.lookup(node.rule()) {
            Some(id) => self.invoke(id, node).map(Some),
            None => Ok(None),
        }
    }

    fn invoke(&mut self, id: ActionId, node: &ParseNode<'_>) -> Result<V, ActionError> {
        let slot = self.handlers[id.0].acquire(node.span().start);

        let fed = node.children().iter().try_for_each(|child| {
            let value = self.apply(child)?;
            let matched = Matched::new(child.rule(), child.text(), child.span(), value);
            self.handlers[id.0].notify(slot, matched)
        });

        match fed {
            Ok(()) => self.handlers[id.0].finish(slot),
            Err(err) => {
                self.handlers[id.0].reset(slot);
                Err(err)
            }
        }
    }

    fn handler(&self, rule: &str) -> Option<&dyn Handler<V>> {
        self.lookup(rule).map(|id| self.handlers[id.0].as_ref())
    }
}

impl<V: 'static> Default for ActionSet<V> {
    fn default() -> Self {
        Self::new()
    }
}
