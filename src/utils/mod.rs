pub mod extractors;
pub mod form;
pub mod jwt;
pub mod validation;
