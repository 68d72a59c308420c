use std::sync::Arc;

use gpui::*;
use gpui_component::Root;
use perch::app::{Quit, WidgetView};
use perch::settings::SettingsStore;
use perch_core::PositionStore;
use perch_storage::{JsonFileStore, KeyValueStore};

fn main() {
    tracing_subscriber::fmt::init();

    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(|cx| {
        gpui_tokio_bridge::init(cx);
        gpui_component::init(cx);

        let settings_store = SettingsStore::load();
        match settings_store.write_defaults_if_missing() {
            Ok(true) => tracing::info!(
                path = %settings_store.config_path().display(),
                "wrote default settings"
            ),
            Ok(false) => {}
            Err(error) => tracing::warn!(error = %error, "could not write default settings"),
        }
        let settings = settings_store.settings();
        settings.apply_theme(None, cx);

        cx.on_action(|_: &Quit, cx| {
            cx.quit();
        });
        cx.bind_keys([
            KeyBinding::new("cmd-q", Quit, None),
            KeyBinding::new("ctrl-q", Quit, None),
        ]);

        let client = match perch_llm::create_client(settings.to_assistant_config()) {
            Ok(client) => client,
            Err(error) => {
                tracing::error!(error = %error, "cannot create assistant client");
                cx.quit();
                return;
            }
        };

        let storage_path = settings.storage_path();
        tracing::info!(path = %storage_path.display(), "using launcher position store");
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(storage_path));
        let positions = PositionStore::new(store);

        cx.spawn(async move |cx| {
            cx.update(|cx| {
                let options = WindowOptions {
                    window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                        None,
                        size(px(1200.), px(800.)),
                        cx,
                    ))),
                    titlebar: Some(TitlebarOptions {
                        title: Some(SharedString::from(settings.assistant_name.clone())),
                        ..Default::default()
                    }),
                    ..Default::default()
                };

                let opened = cx.open_window(options, |window, cx| {
                    let view =
                        cx.new(|cx| WidgetView::new(positions, client, &settings, window, cx));
                    cx.new(|cx| Root::new(view, window, cx))
                });

                match opened {
                    Ok(_) => cx.activate(true),
                    Err(error) => {
                        tracing::error!(error = %error, "failed to open main window");
                        cx.quit();
                    }
                }
            })
        })
        .detach();
    });
}
