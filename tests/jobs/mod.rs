pub mod background;
pub mod foreground;
