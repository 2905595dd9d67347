pub mod interviews;
pub mod notifications;
pub mod parties;
pub mod store;
