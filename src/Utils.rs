//! different utility modules used throughout the project
/// logger setup and saving of iteration history into file
pub mod logger;
