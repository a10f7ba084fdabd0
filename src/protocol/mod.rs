/// Fan/light remote protocol: addresses, commands and repeat policy
pub mod address;
pub mod command;
pub mod repeater;

pub use address::*;
pub use command::*;
pub use repeater::*;
