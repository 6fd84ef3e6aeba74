pub mod combination_service;
pub mod image_service;
