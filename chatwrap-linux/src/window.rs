use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use libadwaita::prelude::*;
use url::Url;
use webkit6::prelude::*;

use chatwrap_core::menu::build_menu;
use chatwrap_core::navigation::{ExternalOpener, NavigationDecision, NavigationPolicy};
use chatwrap_core::window::{present, WindowHost, WindowPlan, DEFAULT_HEIGHT, DEFAULT_WIDTH};

use crate::app::AppState;
use crate::menu::build_menu_model;

/// The main window and the web view it hosts.
#[derive(Clone)]
pub struct MainWindow {
    pub window: adw::ApplicationWindow,
    pub webview: webkit6::WebView,
}

impl WindowHost for MainWindow {
    fn load_url(&self, url: &Url) {
        self.webview.load_uri(url.as_str());
    }

    fn maximize(&self) {
        self.window.maximize();
    }

    fn show(&self) {
        self.window.present();
    }

    fn on_content_ready(&self, callback: Box<dyn FnOnce()>) {
        let pending = RefCell::new(Some(callback));
        let handler: Rc<RefCell<Option<glib::SignalHandlerId>>> = Rc::new(RefCell::new(None));
        let own_handler = handler.clone();
        let id = self.webview.connect_load_changed(move |webview, event| {
            if event != webkit6::LoadEvent::Finished {
                return;
            }
            if let Some(id) = own_handler.borrow_mut().take() {
                webview.disconnect(id);
            }
            let callback = pending.borrow_mut().take();
            if let Some(callback) = callback {
                callback();
            }
        });
        *handler.borrow_mut() = Some(id);
    }
}

/// Opens URLs with the desktop's default handler.
pub struct SystemBrowser;

impl ExternalOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), String> {
        open::that_detached(url).map_err(|e| format!("Failed to launch browser: {}", e))
    }
}

/// Network session with on-disk cookies and cache, so the chat login
/// persists between runs.
pub fn persistent_network_session() -> webkit6::NetworkSession {
    let data_dir = dirs::data_dir().map(|d| d.join("chatwrap"));
    let cache_dir = dirs::cache_dir().map(|d| d.join("chatwrap"));
    let (Some(data_dir), Some(cache_dir)) = (data_dir, cache_dir) else {
        log::warn!("No data directory available; using an ephemeral session");
        return webkit6::NetworkSession::new_ephemeral();
    };

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        log::warn!("Failed to create {:?}: {}", data_dir, e);
    }
    let session = webkit6::NetworkSession::new(
        Some(data_dir.to_string_lossy().as_ref()),
        Some(cache_dir.to_string_lossy().as_ref()),
    );
    let cookie_file = data_dir.join("cookies.sqlite");
    session.cookie_manager().set_persistent_storage(
        cookie_file.to_string_lossy().as_ref(),
        webkit6::CookiePersistentStorage::Sqlite,
    );
    session
}

/// Build the main window from a snapshot of the current preferences.
pub fn build_window(state: &Rc<AppState>) -> MainWindow {
    let preferences = state.preferences();
    let plan = WindowPlan::from_preferences(&preferences);

    let window = adw::ApplicationWindow::builder()
        .application(state.application())
        .title(plan.title)
        .default_width(plan.width)
        .default_height(plan.height)
        .build();

    let webview = webkit6::WebView::builder()
        .network_session(state.network_session())
        .hexpand(true)
        .vexpand(true)
        .build();

    if let Some(wk_settings) = webkit6::prelude::WebViewExt::settings(&webview) {
        wk_settings.set_enable_javascript(true);
        wk_settings.set_javascript_can_open_windows_automatically(true);
    }

    install_navigation_policy(&webview, Rc::downgrade(state));

    let menu_model = build_menu_model(&window, state, &build_menu(&preferences));
    let menubar = gtk4::PopoverMenuBar::from_model(Some(&menu_model));

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    content.append(&adw::HeaderBar::new());
    content.append(&menubar);
    content.append(&webview);
    window.set_content(Some(&content));

    let main = MainWindow { window, webview };
    present(&plan, &main);
    log::debug!("Main window loading {}", plan.url);
    main
}

/// Route pages' requests for new windows through `NavigationPolicy`.
///
/// The policy is rebuilt from the live preferences on every request, so
/// toggling external links takes effect without a window rebuild. Allowed
/// requests get their own related view in a separate window; the view that
/// asked is never navigated away.
fn install_navigation_policy(webview: &webkit6::WebView, state: Weak<AppState>) {
    {
        let state = state.clone();
        webview.connect_decide_policy(move |_, decision, decision_type| {
            if decision_type != webkit6::PolicyDecisionType::NewWindowAction {
                return false;
            }
            let Some(navigation) = decision.downcast_ref::<webkit6::NavigationPolicyDecision>()
            else {
                return false;
            };
            let Some(mut action) = navigation.navigation_action() else {
                return false;
            };
            let Some(target) = action.request().and_then(|request| request.uri()) else {
                return false;
            };
            let Some(state) = state.upgrade() else {
                return false;
            };

            let policy = NavigationPolicy::from_preferences(&state.preferences());
            match policy.resolve(target.as_str(), &SystemBrowser) {
                NavigationDecision::Allow => decision.use_(),
                NavigationDecision::Deny => decision.ignore(),
            }
            true
        });
    }

    webview.connect_create(move |webview, _action| {
        let related = open_related_window(webview, state.clone());
        Some(related.upcast())
    });
}

/// Window for a page-opened browsing context.
///
/// Shares the session and opener relationship with `parent`; it appears once
/// WebKit reports the new page ready and closes when the page calls
/// `window.close()`.
fn open_related_window(parent: &webkit6::WebView, state: Weak<AppState>) -> webkit6::WebView {
    let related = webkit6::WebView::builder()
        .related_view(parent)
        .hexpand(true)
        .vexpand(true)
        .build();
    install_navigation_policy(&related, state);

    let window = adw::Window::builder()
        .default_width(DEFAULT_WIDTH)
        .default_height(DEFAULT_HEIGHT)
        .build();
    if let Some(parent_window) = parent
        .root()
        .and_then(|root| root.downcast::<gtk4::Window>().ok())
    {
        window.set_transient_for(Some(&parent_window));
    }

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    content.append(&adw::HeaderBar::new());
    content.append(&related);
    window.set_content(Some(&content));

    let weak_window = window.downgrade();
    related.connect_title_notify(move |view| {
        if let Some(window) = weak_window.upgrade() {
            window.set_title(view.title().as_deref());
        }
    });
    let weak_window = window.downgrade();
    related.connect_ready_to_show(move |_| {
        if let Some(window) = weak_window.upgrade() {
            window.present();
        }
    });
    let weak_window = window.downgrade();
    related.connect_close(move |_| {
        if let Some(window) = weak_window.upgrade() {
            window.close();
        }
    });

    related
}
