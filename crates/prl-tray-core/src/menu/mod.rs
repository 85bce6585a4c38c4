mod action;
pub mod builder;
mod model;

pub use {
    action::MenuAction,
    builder::{build, loading, running_count},
    model::{MenuEntry, MenuIcon, MenuModel, MenuNode},
};
