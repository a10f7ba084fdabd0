pub mod devices;

pub use devices::{BUILTIN_DEVICES, DeviceRegistry};
