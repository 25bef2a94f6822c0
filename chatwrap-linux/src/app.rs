use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita as adw;
use libadwaita::prelude::*;

use chatwrap_core::about::ABOUT;
use chatwrap_core::menu::{self as menu_model, Effect, MenuAction};
use chatwrap_core::preferences::Preferences;
use chatwrap_core::store::PreferenceStore;

use crate::window::{self, MainWindow};

/// Process-wide application state, owned by the GTK main loop.
///
/// `preferences` is replaced wholesale after each change; windows and menus
/// are always built from a snapshot of it.
pub struct AppState {
    app: adw::Application,
    store: PreferenceStore,
    preferences: RefCell<Preferences>,
    main: RefCell<Option<MainWindow>>,
    network_session: OnceCell<webkit6::NetworkSession>,
}

impl AppState {
    pub fn new(app: &adw::Application) -> Rc<Self> {
        let store = PreferenceStore::default_location().unwrap_or_else(|e| {
            log::error!("{}; keeping settings in the temp directory", e);
            PreferenceStore::new(std::env::temp_dir().join("chatwrap").join("settings.json"))
        });
        let preferences = store.load();
        log::debug!("Loaded settings from {:?}", store.path());

        Rc::new(AppState {
            app: app.clone(),
            store,
            preferences: RefCell::new(preferences),
            main: RefCell::new(None),
            network_session: OnceCell::new(),
        })
    }

    pub fn application(&self) -> &adw::Application {
        &self.app
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences.borrow().clone()
    }

    /// Shared by every window so logins survive a rebuild.
    pub fn network_session(&self) -> &webkit6::NetworkSession {
        self.network_session.get_or_init(window::persistent_network_session)
    }

    /// Handle `activate`: focus the existing window, or create the first one.
    pub fn activate(self: &Rc<Self>) {
        if let Some(main) = self.main.borrow().as_ref() {
            main.window.present();
            return;
        }
        let main = window::build_window(self);
        *self.main.borrow_mut() = Some(main);
    }

    pub fn dispatch(self: &Rc<Self>, action: MenuAction) {
        let effect = menu_model::apply(action, &self.preferences.borrow());
        match effect {
            Effect::Persist(next) => {
                self.store.save(&next);
                *self.preferences.borrow_mut() = next;
            }
            Effect::ReloadPage => {
                if let Some(main) = self.main.borrow().as_ref() {
                    main.webview.reload();
                }
            }
            Effect::RebuildWindow => self.rebuild(),
            Effect::ShowAbout => self.show_about(),
        }
    }

    /// Tear down the main window and build a fresh one, menu included, from
    /// the current preferences.
    ///
    /// The new window is registered before the old one closes so the
    /// application never drops to zero windows and quits.
    pub fn rebuild(self: &Rc<Self>) {
        let old = self.main.borrow_mut().take();
        let fresh = window::build_window(self);
        *self.main.borrow_mut() = Some(fresh);
        if let Some(old) = old {
            old.window.close();
        }
        log::info!("Rebuilt main window");
    }

    fn show_about(&self) {
        let dialog = adw::AlertDialog::new(Some(ABOUT.application_name), Some(&ABOUT.detail()));
        dialog.add_response("close", "Close");
        dialog.set_default_response(Some("close"));
        let parent = self.main.borrow().as_ref().map(|m| m.window.clone());
        dialog.present(parent.as_ref());
    }
}
