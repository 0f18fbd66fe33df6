pub mod directory;
pub mod registration;
