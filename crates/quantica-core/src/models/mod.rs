pub mod patient;
pub mod session;
pub mod therapy;
