pub mod port;
pub mod registry;

#[cfg(any(test, feature = "with_mocks"))]
pub use self::port::MockOverlayManager;
pub use self::{
    port::{ManagerError, OverlayInfo, OverlayManager, OverlayState, Resolution},
    registry::YamlOverlayRegistry,
};
