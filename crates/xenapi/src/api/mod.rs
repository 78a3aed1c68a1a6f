pub mod network;
pub mod pif;
pub mod pool;
pub mod sr;
pub mod vbd;
pub mod vdi;
pub mod vif;
pub mod vm;

pub use network::NetworkApi;
pub use pif::PifApi;
pub use pool::PoolApi;
pub use sr::SrApi;
pub use vbd::VbdApi;
pub use vdi::VdiApi;
pub use vif::VifApi;
pub use vm::VmApi;
