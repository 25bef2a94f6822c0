pub mod about;
pub mod menu;
pub mod navigation;
pub mod preferences;
pub mod store;
pub mod window;
