//! Decision types shared between the domain and the engine.
//!
//! Pure data with no I/O; every type derives Serialize/Deserialize so a UI
//! layer can render pending confirmations directly.

mod identity_transition;

pub use identity_transition::{
    decide_edit_exit, decide_identity_change, CasterChangeChoice, CasterIdentity, ChangeDetector,
    DetectorState, DirtySlotChoice, TransitionDecision,
};
