use cardledger_business::api_status::{ApiAvailability, ApiStatusCompute};
use cardledger_states::StateCtx;
use egui::{Color32, Response, Ui};

/// Radius of the status indicator circle (in pixels)
const STATUS_DOT_RADIUS: f32 = 5.0;

const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);
const COLOR_AMBER: Color32 = Color32::from_rgb(255, 165, 0);
const COLOR_RED: Color32 = Color32::from_rgb(205, 50, 50);

/// Cached UI version string to avoid repeated computation
fn ui_version() -> &'static str {
    use std::sync::OnceLock;
    static UI_VERSION: OnceLock<String> = OnceLock::new();
    UI_VERSION.get_or_init(cardledger_utils::version_info::format_env_version)
}

fn format_tooltip(status: &str, service_version: Option<&str>) -> String {
    let ui_ver = ui_version();

    match service_version {
        Some(v) => format!("UI: {ui_ver}\nService: {status}:{v}"),
        None => format!("UI: {ui_ver}\nService: {status}"),
    }
}

/// Renders a single status dot with tooltip using a drawn circle
fn status_dot(ui: &mut Ui, tooltip_text: String, dot_color: Color32) -> Response {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(STATUS_DOT_RADIUS * 2.0, STATUS_DOT_RADIUS * 2.0),
        egui::Sense::hover(),
    );

    let center = rect.center();
    ui.painter()
        .circle(center, STATUS_DOT_RADIUS, dot_color, egui::Stroke::NONE);

    response.on_hover_text(tooltip_text)
}

fn status_info(state_ctx: &StateCtx) -> (String, Color32) {
    match state_ctx.cached::<ApiStatusCompute>() {
        Some(status) => match status.availability {
            ApiAvailability::Available => (
                format_tooltip("up", status.service_version.as_deref()),
                COLOR_GREEN,
            ),
            ApiAvailability::Unavailable => {
                let detail = status.last_error.as_deref().unwrap_or("unreachable");
                (
                    format_tooltip(&format!("down({detail})"), status.service_version.as_deref()),
                    COLOR_RED,
                )
            }
            ApiAvailability::Unknown => (format_tooltip("checking", None), COLOR_AMBER),
        },
        None => (format_tooltip("checking", None), COLOR_AMBER),
    }
}

/// Displays the backend availability dot with a version tooltip.
pub fn api_status(state_ctx: &StateCtx, ui: &mut Ui) -> Response {
    let (tooltip, color) = status_info(state_ctx);
    status_dot(ui, tooltip, color)
}
