pub mod deck;
pub mod input;
pub mod mode;
pub mod view;
