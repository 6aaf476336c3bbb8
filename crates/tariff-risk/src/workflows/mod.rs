pub mod advisory;
pub mod import;
pub mod inventory;
pub mod risk;
pub mod signals;
