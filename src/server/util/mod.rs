//! Small helpers shared by services and controllers.

pub mod email;
pub mod excel;
pub mod filename;
pub mod password;
pub mod validate;
