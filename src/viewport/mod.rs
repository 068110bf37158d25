//! The viewport controller and its configuration.

pub use self::action::{ActionKind, ViewportAction, ViewportNotice};
pub use self::controller::ViewportController;
pub use self::settings::DisplaySettings;

mod action;
mod controller;
mod settings;
