//! Row and payload types shared by the database, endpoint, and core modules.

pub mod assignment_item;
pub mod progress;
pub mod request;
pub mod resource;
