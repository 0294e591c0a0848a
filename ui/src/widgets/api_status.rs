use crate::utils::colors::{COLOR_AMBER, COLOR_GREEN, COLOR_RED};
use egui::{Color32, Response, Ui};
use sadtime_business::{APIAvailability, ApiStatus};
use sadtime_states::StateCtx;

/// Radius of the status indicator circle (in pixels)
const STATUS_DOT_RADIUS: f32 = 5.0;

/// Renders a single status dot with tooltip using a drawn circle
fn status_dot(ui: &mut Ui, tooltip_text: String, dot_color: Color32) -> Response {
    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(STATUS_DOT_RADIUS * 2.0, STATUS_DOT_RADIUS * 2.0),
        egui::Sense::hover(),
    );

    ui.painter()
        .circle(rect.center(), STATUS_DOT_RADIUS, dot_color, egui::Stroke::NONE);

    response.on_hover_text(tooltip_text)
}

/// Tooltip and color for the current backend health.
fn api_status_info(state_ctx: &StateCtx) -> (String, Color32) {
    match state_ctx
        .cached::<ApiStatus>()
        .map(|v| v.api_availability())
    {
        Some(APIAvailability::Available(time)) => (
            format!("api: healthy\nchecked at {}", time.format("%H:%M:%S")),
            COLOR_GREEN,
        ),
        Some(APIAvailability::Unavailable((time, err))) => (
            format!("api: {err}\nchecked at {}", time.format("%H:%M:%S")),
            COLOR_RED,
        ),
        _ => ("api: checking".to_string(), COLOR_AMBER),
    }
}

/// Displays the backend health indicator.
pub fn api_status(state_ctx: &StateCtx, ui: &mut Ui) -> Response {
    let (tooltip, color) = api_status_info(state_ctx);
    status_dot(ui, tooltip, color)
}

#[cfg(test)]
mod api_state_widget_test {
    use chrono::{TimeZone, Utc};
    use sadtime_business::ApiStatus;
    use sadtime_states::StateCtx;

    use crate::utils::colors::{COLOR_AMBER, COLOR_GREEN, COLOR_RED};

    fn ctx_with(status: ApiStatus) -> StateCtx {
        let mut ctx = StateCtx::new();
        ctx.record_compute(status);
        ctx
    }

    #[test]
    fn test_unknown_is_amber() {
        let (tooltip, color) = super::api_status_info(&ctx_with(ApiStatus::default()));
        assert_eq!(color, COLOR_AMBER);
        assert_eq!(tooltip, "api: checking");
    }

    #[test]
    fn test_available_is_green() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 8, 30, 0).single().expect("valid time");
        let (tooltip, color) = super::api_status_info(&ctx_with(ApiStatus::available(at)));
        assert_eq!(color, COLOR_GREEN);
        assert!(tooltip.contains("08:30:00"));
    }

    #[test]
    fn test_unavailable_is_red_with_error() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 8, 30, 0).single().expect("valid time");
        let (tooltip, color) = super::api_status_info(&ctx_with(ApiStatus::unavailable(
            at,
            "status code 503",
        )));
        assert_eq!(color, COLOR_RED);
        assert!(tooltip.contains("status code 503"));
    }

    #[test]
    fn test_missing_compute_is_amber() {
        let (_, color) = super::api_status_info(&StateCtx::new());
        assert_eq!(color, COLOR_AMBER);
    }
}
