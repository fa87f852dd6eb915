pub mod card;
pub mod core;
pub mod edit;
pub mod fields;
