pub mod compare;
pub mod interactive;
pub mod search;
pub mod setup;
pub mod ui;
