use cardledger_utils::version_info;
use egui::{Color32, Response, Ui};

/// Displays the current environment and version in the top bar.
///
/// Display format: `dev:{commit}` for debug builds, `stable:{version}` for
/// release builds.
pub fn env_version(ui: &mut Ui) -> Response {
    let display_text = version_info::format_env_version();
    let (env_name, _) = version_info::env_version_info();

    let color = match env_name {
        "stable" => Color32::GREEN,
        "dev" => Color32::from_rgb(200, 200, 200),
        _ => Color32::WHITE,
    };

    ui.colored_label(color, display_text)
}

#[cfg(test)]
mod env_version_widget_tests {
    use egui_kittest::Harness;
    use kittest::Queryable as _;

    #[test]
    fn shows_env_and_info() {
        let harness = Harness::new_ui(|ui| {
            super::env_version(ui);
        });

        let found = harness.query_by_label_contains(":");
        assert!(
            found.is_some(),
            "env_version widget should display format like 'env:info'"
        );
    }
}
