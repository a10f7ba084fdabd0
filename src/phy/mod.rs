// Physical layer: framing, line coding and sample expansion for the
// 433.92 MHz OOK fan/light protocol

pub mod encoder;
pub mod expander;
pub mod frame;
pub mod line_coding;

pub use encoder::PhyEncoder;
pub use expander::{SampleExpander, samples_per_symbol};
pub use frame::{BitFramer, Frame};
pub use line_coding::PulseWidthEncoder;
