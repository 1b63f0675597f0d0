pub mod extract;
pub mod pincode;
pub mod registry;
pub mod route;

pub use pincode::{PinCode, PinCodeError};
pub use registry::{Registry, RegistryError, DEFAULT_UNASSIGNED_LABEL};
pub use route::{route, RoutingResult};
