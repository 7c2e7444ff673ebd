//! Chat exchange state machine
//!
//! Elm-style: `transition` is pure and returns the next state plus the
//! effects the runtime has to carry out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::Event;
pub use state::{ExchangeContext, ExchangeState};
pub use transition::{transition, TransitionError, TransitionResult};
