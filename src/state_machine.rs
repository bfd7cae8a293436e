//! Generic finite-state-machine engine.
//!
//! A machine owns its states, tracks one current state, and runs the
//! enter/stay/exit lifecycle. It knows nothing about the game: concrete
//! graphs (player, enemy AI) instantiate it with their own context type.
//!
//! States never mutate the machine directly. Lifecycle hooks return a
//! `Transition` request instead, and the machine applies it after the hook
//! has run to completion. This keeps update-then-transition ordering
//! explicit and sidesteps the self-borrow a re-entrant change would need.

use std::collections::HashMap;

/// Identifies a state within one machine. Unique per machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub u32);

/// Binds a machine context to the input event type its states understand.
pub trait StateContext {
    type Input;
}

/// A single state in a machine over context `C`.
///
/// `on_stay` runs once per simulation tick while the state is current.
/// `handle_input` receives discrete input events; states that have no
/// input semantics keep the default no-op.
pub trait State<C: StateContext> {
    fn id(&self) -> StateId;

    fn on_enter(&mut self, _ctx: &mut C) {}

    fn on_stay(&mut self, _ctx: &mut C) -> Option<Transition<C>> {
        None
    }

    fn on_exit(&mut self, _ctx: &mut C) {}

    fn handle_input(&mut self, _input: &C::Input, _ctx: &mut C) -> Option<Transition<C>> {
        None
    }
}

/// Boxed state as the machine stores it. `Send + Sync` so machines can
/// live inside ECS components.
pub type BoxedState<C> = Box<dyn State<C> + Send + Sync>;

/// A requested state change, applied by the machine after the current
/// lifecycle call returns.
pub enum Transition<C: StateContext> {
    /// Swap to a freshly constructed state. The instance is registered
    /// under its id, replacing any previous registration, so per-instance
    /// timers restart from scratch.
    Change(BoxedState<C>),
    /// Swap to a state registered earlier. Unknown ids are ignored.
    To(StateId),
}

pub struct StateMachine<C: StateContext> {
    states: HashMap<StateId, BoxedState<C>>,
    current: StateId,
    /// Count of translate requests that named an unregistered id.
    /// Invalid transitions are silent no-ops by contract; the counter
    /// exists so misuse is still observable.
    ignored_transitions: u32,
}

impl<C: StateContext> StateMachine<C> {
    /// Create a machine with `initial` registered and entered.
    pub fn new(mut initial: BoxedState<C>, ctx: &mut C) -> Self {
        let id = initial.id();
        initial.on_enter(ctx);
        let mut states = HashMap::new();
        states.insert(id, initial);
        Self {
            states,
            current: id,
            ignored_transitions: 0,
        }
    }

    /// Register a state under its id. First registration wins: adding a
    /// second state with an existing id is a no-op.
    pub fn add_state(&mut self, state: BoxedState<C>) {
        self.states.entry(state.id()).or_insert(state);
    }

    /// Exit the current state, make `next` current (registering it under
    /// its id), and enter it.
    pub fn change_state(&mut self, mut next: BoxedState<C>, ctx: &mut C) {
        if let Some(current) = self.states.get_mut(&self.current) {
            current.on_exit(ctx);
        }
        let id = next.id();
        next.on_enter(ctx);
        self.states.insert(id, next);
        self.current = id;
    }

    /// Swap to a previously registered state by id. Exits the current
    /// state and enters the target. Unknown ids are ignored (counted, not
    /// surfaced).
    pub fn translate(&mut self, id: StateId, ctx: &mut C) {
        if !self.states.contains_key(&id) {
            self.ignored_transitions += 1;
            tracing::debug!(?id, "ignoring transition to unregistered state");
            return;
        }
        if let Some(current) = self.states.get_mut(&self.current) {
            current.on_exit(ctx);
        }
        self.current = id;
        if let Some(next) = self.states.get_mut(&id) {
            next.on_enter(ctx);
        }
    }

    /// Run the current state's per-tick logic, then apply any transition
    /// it requested.
    pub fn update(&mut self, ctx: &mut C) {
        let transition = match self.states.get_mut(&self.current) {
            Some(state) => state.on_stay(ctx),
            None => return,
        };
        if let Some(transition) = transition {
            self.apply(transition, ctx);
        }
    }

    /// Forward an input event to the current state, then apply any
    /// transition it requested.
    pub fn handle_input(&mut self, input: &C::Input, ctx: &mut C) {
        let transition = match self.states.get_mut(&self.current) {
            Some(state) => state.handle_input(input, ctx),
            None => return,
        };
        if let Some(transition) = transition {
            self.apply(transition, ctx);
        }
    }

    fn apply(&mut self, transition: Transition<C>, ctx: &mut C) {
        match transition {
            Transition::Change(next) => self.change_state(next, ctx),
            Transition::To(id) => self.translate(id, ctx),
        }
    }

    pub fn current_id(&self) -> StateId {
        self.current
    }

    /// How many translate requests named an unknown id. Debug hook only.
    pub fn ignored_transitions(&self) -> u32 {
        self.ignored_transitions
    }
}
