pub mod backdrop;
pub mod widgets;
