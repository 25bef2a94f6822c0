use std::rc::{Rc, Weak};

use gtk4::gio;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;

use chatwrap_core::menu::{MenuAction, MenuEntry};
use chatwrap_core::preferences::Model;

use crate::app::AppState;

const MODEL_ACTION: &str = "model";

/// Window-scoped action name for a menu action.
fn action_name(action: MenuAction) -> &'static str {
    match action {
        MenuAction::ToggleTemporaryChat => "temporary-chat",
        MenuAction::SelectModel(_) => MODEL_ACTION,
        MenuAction::ToggleMaximizeWindow => "maximize-window",
        MenuAction::ToggleReadyToShow => "ready-to-show",
        MenuAction::ToggleExternalLinks => "external-links",
        MenuAction::ReloadPage => "reload-page",
        MenuAction::RebuildWindow => "reload-window",
        MenuAction::ShowAbout => "about",
    }
}

/// Render `entries` into a `gio::Menu` and register the matching `win.*`
/// actions on `window`.
///
/// Checkbox and radio state is seeded from the `checked` flags in the
/// snapshot; it is not re-read from preferences afterwards except for the
/// entry that was just clicked.
pub fn build_menu_model(
    window: &adw::ApplicationWindow,
    state: &Rc<AppState>,
    entries: &[MenuEntry],
) -> gio::Menu {
    let weak = Rc::downgrade(state);

    let model_action = gio::SimpleAction::new_stateful(
        MODEL_ACTION,
        Some(glib::VariantTy::STRING),
        &Model::Default.as_str().to_variant(),
    );
    {
        let weak = weak.clone();
        model_action.connect_activate(move |action, parameter| {
            let Some(value) = parameter.and_then(|p| p.str()) else {
                return;
            };
            let model = match value.parse::<Model>() {
                Ok(model) => model,
                Err(e) => {
                    log::warn!("{}", e);
                    return;
                }
            };
            if let Some(state) = weak.upgrade() {
                state.dispatch(MenuAction::SelectModel(model));
                action.set_state(&model.as_str().to_variant());
            }
        });
    }
    window.add_action(&model_action);

    let menu = gio::Menu::new();
    append_entries(window, &weak, &model_action, &menu, entries);
    menu
}

fn append_entries(
    window: &adw::ApplicationWindow,
    weak: &Weak<AppState>,
    model_action: &gio::SimpleAction,
    menu: &gio::Menu,
    entries: &[MenuEntry],
) {
    for entry in entries {
        match entry {
            MenuEntry::Checkbox {
                label,
                checked,
                action,
            } => {
                let name = action_name(*action);
                let simple = gio::SimpleAction::new_stateful(name, None, &checked.to_variant());
                let weak = weak.clone();
                let menu_action = *action;
                simple.connect_activate(move |simple, _| {
                    let Some(state) = weak.upgrade() else {
                        return;
                    };
                    state.dispatch(menu_action);
                    if let Some(now) = menu_action.checked_in(&state.preferences()) {
                        simple.set_state(&now.to_variant());
                    }
                });
                window.add_action(&simple);
                menu.append(Some(*label), Some(format!("win.{}", name).as_str()));
            }
            MenuEntry::Radio {
                label,
                checked,
                action,
            } => {
                let MenuAction::SelectModel(model) = action else {
                    log::warn!("Radio entry {:?} has no model", label);
                    continue;
                };
                let target = model.as_str().to_variant();
                if *checked {
                    model_action.set_state(&target);
                }
                let item = gio::MenuItem::new(Some(*label), None);
                item.set_action_and_target_value(
                    Some(format!("win.{}", MODEL_ACTION).as_str()),
                    Some(&target),
                );
                menu.append_item(&item);
            }
            MenuEntry::Action { label, action } => {
                let name = action_name(*action);
                let simple = gio::SimpleAction::new(name, None);
                let weak = weak.clone();
                let menu_action = *action;
                simple.connect_activate(move |_, _| {
                    if let Some(state) = weak.upgrade() {
                        state.dispatch(menu_action);
                    }
                });
                window.add_action(&simple);
                menu.append(Some(*label), Some(format!("win.{}", name).as_str()));
            }
            MenuEntry::Submenu { label, entries } => {
                let submenu = gio::Menu::new();
                append_entries(window, weak, model_action, &submenu, entries);
                menu.append_submenu(Some(*label), &submenu);
            }
        }
    }
}
