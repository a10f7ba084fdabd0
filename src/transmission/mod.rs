/// Transmission layer: session state machine, sink handoff and the
/// background radio worker
pub mod buffer;
pub mod session;
pub mod transmitter;
pub mod worker;

pub use buffer::*;
pub use session::*;
pub use transmitter::*;
pub use worker::*;
