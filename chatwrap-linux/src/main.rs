mod app;
mod menu;
mod window;

use libadwaita as adw;
use libadwaita::prelude::*;

const APP_ID: &str = "io.github.chatwrap.ChatWrap";

fn main() {
    env_logger::init();

    let app = adw::Application::builder().application_id(APP_ID).build();
    let state = app::AppState::new(&app);

    app.connect_startup(|app| {
        app.set_accels_for_action("win.reload-page", &["<Control>r", "F5"]);
        app.set_accels_for_action("win.reload-window", &["<Control><Shift>r"]);
    });

    app.connect_activate(move |_app| {
        state.activate();
    });

    app.run();
}
