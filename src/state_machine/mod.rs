// State machine module for form lifecycle
//
// Forms start Active and settle exactly once into one of two terminal states.
// The transition table lives here so the form itself only has to hold the
// current state behind a lock.

pub mod events;
pub mod states;

pub use events::FormEvent;
pub use states::FormState;
