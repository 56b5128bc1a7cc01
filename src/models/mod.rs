mod devices;
mod interfaces;
mod report;

pub use devices::Device;
pub use interfaces::{InterfaceBrief, InterfaceDetail, LinkState, PortStatus, Speed};
pub use report::*;
