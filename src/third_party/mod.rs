//! Third-party plugin isolation.

pub mod avian;
pub mod vleue_navigator;

pub fn plugin(app: &mut bevy::prelude::App) {
    app.add_plugins(avian::plugin);
}
