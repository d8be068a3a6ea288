pub mod error;
pub mod impl_fake;
#[cfg(feature = "native-camera")]
pub mod impl_native;
pub mod interface;
