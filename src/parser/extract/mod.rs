pub mod ambassadors;
pub mod memorial;
pub mod trustees;
