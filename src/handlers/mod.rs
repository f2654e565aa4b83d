//! API handlers for the PalHope backend

pub mod badge;
pub mod campaign;
pub mod donation;
pub mod sub_campaign;
pub mod user;

pub use badge::*;
pub use campaign::*;
pub use donation::*;
pub use sub_campaign::*;
pub use user::*;
