//! Gate module - step completion predicates and the continue affordance.

mod predicate;
mod profile_gate;
mod step_gate;

pub use predicate::{ReadyWording, SelectionRule, StepPredicate};
pub use profile_gate::ProfileGate;
pub use step_gate::{GateVerdict, StepGate};
