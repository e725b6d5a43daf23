pub mod candle;
pub mod snapshot;

// Re-export the Candle struct for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::{Candle, CandleColumns};
pub use snapshot::{fetch_snapshot, Frame, MarketSnapshot};
