//! Slot stack for one rule's action

use tracing::{debug, trace};

use super::{Action, ActionError, Matched, Part};

/// Handle to a slot acquired from an [`ActionPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Independent accumulation state for one invocation of a rule
pub struct Slot<A: Action> {
    action: A,
    part: Part<A::Part>,
    start: Option<usize>,
    in_use: bool,
}

impl<A: Action> Slot<A> {
    fn new(action: A, part: Part<A::Part>) -> Self {
        Self {
            action,
            part,
            start: None,
            in_use: false,
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn part(&self) -> &Part<A::Part> {
        &self.part
    }

    /// Byte offset where the current invocation began
    pub fn start(&self) -> Option<usize> {
        self.start
    }

    pub fn in_use(&self) -> bool {
        self.in_use
    }

    fn reset(&mut self) {
        self.action.clear();
        self.part.clear();
        self.start = None;
        self.in_use = false;
    }
}

/// All slots of one rule's action.
///
/// The root slot exists from construction; more are pushed only when every
/// existing slot is in use, and none is ever removed.
pub struct ActionPool<A: Action> {
    rule: String,
    make_action: fn() -> A,
    make_part: fn() -> A::Part,
    slots: Vec<Slot<A>>,
}

impl<A: Action> ActionPool<A> {
    pub fn new(rule: impl Into<String>, make_action: fn() -> A, make_part: fn() -> A::Part) -> Self {
        let root = Slot::new(make_action(), Part::new(make_part));
        Self {
            rule: rule.into(),
            make_action,
            make_part,
            slots: vec![root],
        }
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Claim the first free slot for an invocation starting at byte `start`.
    pub fn acquire(&mut self, start: usize) -> SlotId {
        let index = match self.slots.iter().position(|slot| !slot.in_use) {
            Some(index) => index,
            None => {
                let slot = Slot::new((self.make_action)(), Part::new(self.make_part));
                self.slots.push(slot);
                debug!(rule = %self.rule, slots = self.slots.len(), "action slot stack grew");
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        slot.in_use = true;
        slot.start = Some(start);
        trace!(rule = %self.rule, slot = index, start, "acquired action slot");
        SlotId(index)
    }

    /// Hand a completed child match to the action in `id`.
    pub fn notify(&mut self, id: SlotId, child: Matched<'_, A::Value>) -> Result<(), ActionError> {
        let slot = self.active_slot(id)?;
        slot.action.matched(&mut slot.part, child)
    }

    /// Harvest the part accumulated in `id` and free the slot.
    pub fn finish(&mut self, id: SlotId) -> Result<A::Part, ActionError> {
        let slot = self.active_slot(id)?;
        let part = slot.part.take();
        slot.reset();
        Ok(part)
    }

    /// Free `id` without producing a value.
    pub fn reset(&mut self, id: SlotId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.reset();
        }
    }

    /// Number of invocations currently in progress
    pub fn depth(&self) -> usize {
        self.slots.iter().filter(|slot| slot.in_use).count()
    }

    /// Deepest nesting seen so far
    pub fn high_water_mark(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot<A>> {
        self.slots.get(id.0)
    }

    fn active_slot(&mut self, id: SlotId) -> Result<&mut Slot<A>, ActionError> {
        match self.slots.get_mut(id.0) {
            Some(slot) if slot.in_use => Ok(slot),
            _ => Err(ActionError::InactiveSlot {
                rule: self.rule.clone(),
                slot: id.0,
            }),
        }
    }
}

/// Object-safe view of an [`ActionPool`], so pools of different action
/// types can sit side by side in one [`super::ActionSet`].
pub trait Handler<V> {
    fn rule(&self) -> &str;
    fn acquire(&mut self, start: usize) -> SlotId;
    fn notify(&mut self, id: SlotId, child: Matched<'_, V>) -> Result<(), ActionError>;
    fn finish(&mut self, id: SlotId) -> Result<V, ActionError>;
    fn reset(&mut self, id: SlotId);
    fn depth(&self) -> usize;
    fn high_water_mark(&self) -> usize;
}

impl<A: Action> Handler<A::Value> for ActionPool<A> {
    fn rule(&self) -> &str {
        ActionPool::rule(self)
    }

    fn acquire(&mut self, start: usize) -> SlotId {
        ActionPool::acquire(self, start)
    }

    fn notify(&mut self, id: SlotId, child: Matched<'_, A::Value>) -> Result<(), ActionError> {
        ActionPool::notify(self, id, child)
    }

    fn finish(&mut self, id: SlotId) -> Result<A::Value, ActionError> {
        ActionPool::finish(self, id).map(Into::into)
    }

    fn reset(&mut self, id: SlotId) {
        ActionPool::reset(self, id)
    }

    fn depth(&self) -> usize {
        ActionPool::depth(self)
    }

    fn high_water_mark(&self) -> usize {
        ActionPool::high_water_mark(self)
    }
}
