//! Toolkit-independent application menu.
//!
//! The tree is a snapshot: it reflects the preferences it was built from and
//! is not updated afterwards. Anything that changes preferences outside of a
//! menu click has to rebuild the menu to show the new state.

use crate::preferences::{Model, Preferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    ToggleTemporaryChat,
    SelectModel(Model),
    ToggleMaximizeWindow,
    ToggleReadyToShow,
    ToggleExternalLinks,
    ReloadPage,
    RebuildWindow,
    ShowAbout,
}

impl MenuAction {
    /// Checked state of a checkbox or radio action under `preferences`.
    /// `None` for plain actions.
    pub fn checked_in(self, preferences: &Preferences) -> Option<bool> {
        match self {
            MenuAction::ToggleTemporaryChat => Some(preferences.temporary_chat),
            MenuAction::SelectModel(model) => Some(preferences.model == model),
            MenuAction::ToggleMaximizeWindow => Some(preferences.maximize_window),
            MenuAction::ToggleReadyToShow => Some(preferences.ready_to_show),
            MenuAction::ToggleExternalLinks => Some(preferences.external_links_in_browser),
            MenuAction::ReloadPage | MenuAction::RebuildWindow | MenuAction::ShowAbout => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Checkbox {
        label: &'static str,
        checked: bool,
        action: MenuAction,
    },
    Radio {
        label: &'static str,
        checked: bool,
        action: MenuAction,
    },
    Action {
        label: &'static str,
        action: MenuAction,
    },
    Submenu {
        label: &'static str,
        entries: Vec<MenuEntry>,
    },
}

/// What the binder has to do after a menu action.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Preferences changed; persist and keep the returned record.
    Persist(Preferences),
    ReloadPage,
    RebuildWindow,
    ShowAbout,
}

fn checkbox(label: &'static str, action: MenuAction, preferences: &Preferences) -> MenuEntry {
    MenuEntry::Checkbox {
        label,
        checked: action.checked_in(preferences).unwrap_or(false),
        action,
    }
}

/// One radio entry per model, the current one checked.
pub fn build_model_submenu(preferences: &Preferences) -> Vec<MenuEntry> {
    Model::ALL
        .into_iter()
        .map(|model| MenuEntry::Radio {
            label: model.label(),
            checked: preferences.model == model,
            action: MenuAction::SelectModel(model),
        })
        .collect()
}

pub fn build_menu(preferences: &Preferences) -> Vec<MenuEntry> {
    vec![
        MenuEntry::Submenu {
            label: "GPT Features",
            entries: vec![
                checkbox(
                    "Open temporary chat by default",
                    MenuAction::ToggleTemporaryChat,
                    preferences,
                ),
                MenuEntry::Submenu {
                    label: "Models by default",
                    entries: build_model_submenu(preferences),
                },
            ],
        },
        MenuEntry::Submenu {
            label: "Window",
            entries: vec![
                checkbox(
                    "Open window maximized on startup",
                    MenuAction::ToggleMaximizeWindow,
                    preferences,
                ),
                checkbox(
                    "Show when ready (avoids white screen)",
                    MenuAction::ToggleReadyToShow,
                    preferences,
                ),
                checkbox(
                    "Open external links in browser",
                    MenuAction::ToggleExternalLinks,
                    preferences,
                ),
                MenuEntry::Action {
                    label: "Reload page",
                    action: MenuAction::ReloadPage,
                },
                MenuEntry::Action {
                    label: "Reload window",
                    action: MenuAction::RebuildWindow,
                },
            ],
        },
        MenuEntry::Submenu {
            label: "Help",
            entries: vec![MenuEntry::Action {
                label: "About",
                action: MenuAction::ShowAbout,
            }],
        },
    ]
}

/// Compute the result of `action` against the current preferences.
///
/// Toggles flip exactly one field; the returned record is a new value and
/// `preferences` is left untouched.
pub fn apply(action: MenuAction, preferences: &Preferences) -> Effect {
    let mut next = preferences.clone();
    match action {
        MenuAction::ToggleTemporaryChat => next.temporary_chat = !next.temporary_chat,
        MenuAction::SelectModel(model) => next.model = model,
        MenuAction::ToggleMaximizeWindow => next.maximize_window = !next.maximize_window,
        MenuAction::ToggleReadyToShow => next.ready_to_show = !next.ready_to_show,
        MenuAction::ToggleExternalLinks => {
            next.external_links_in_browser = !next.external_links_in_browser
        }
        MenuAction::ReloadPage => return Effect::ReloadPage,
        MenuAction::RebuildWindow => return Effect::RebuildWindow,
        MenuAction::ShowAbout => return Effect::ShowAbout,
    }
    Effect::Persist(next)
}
