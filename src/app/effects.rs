use crate::app::{App, Message, Model, ToastLevel};
use crate::prefs::DARK_MODE_KEY;

impl App {
    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        if *msg == Message::ToggleTheme {
            self.persist_theme(model);
        }
    }

    fn persist_theme(&mut self, model: &mut Model) {
        self.dark_mode = model.dark_mode;
        let label = if model.dark_mode {
            "Dark mode"
        } else {
            "Light mode"
        };
        let Some(store) = self.preferences.as_mut() else {
            model.show_toast(ToastLevel::Info, label);
            return;
        };
        match store.set_bool(DARK_MODE_KEY, model.dark_mode) {
            Ok(()) => model.show_toast(ToastLevel::Info, label),
            Err(err) => {
                tracing::warn!(path = %store.path().display(), "failed to save theme preference: {err:#}");
                model.show_toast(ToastLevel::Warning, format!("Theme not saved: {err}"));
            }
        }
    }
}
