pub mod audio;
pub mod history_service;
pub mod session_store;
pub mod staircase;
pub mod triplet_generator;
pub mod upload_service;
