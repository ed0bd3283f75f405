//! Local persistence for meetings and account state

pub mod model;
pub mod store;

pub use model::{Meeting, MeetingPatch, Subscription, Theme, User};
pub use store::KvStore;
