// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators narrated by the
// analysis report.  Every function takes oldest-first parallel slices and
// returns an aligned series; an empty series is the normal answer for a window
// that is too short or malformed, never an error.

pub mod adx;
pub mod ema;
pub mod macd;
pub mod mfi;
pub mod obv;
pub mod series;
pub mod wilder;

pub use adx::calculate_adx;
pub use macd::{calculate_macd, MacdPoint};
pub use mfi::calculate_mfi;
pub use obv::calculate_obv;
