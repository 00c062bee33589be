//! State-DB corrector (§4.5): patches live state with recorded exception
//! deltas at precise block/tx scope boundaries, implemented as an
//! [`aida_extension::Extension`] so the executor drives it through the
//! ordinary hook chain alongside every other extension.

mod corrector;
mod patch;

pub use corrector::ExceptionCorrector;
pub use patch::overwrite;
