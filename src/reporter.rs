pub mod impl_display;
#[cfg(test)]
pub mod impl_fake;
pub mod interface;
