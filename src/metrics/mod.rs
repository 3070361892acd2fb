use std::time::Duration;

pub const TEMPLATES_RENDERED: &str = "frontend_templates_rendered_total";
pub const TEMPLATE_RENDER_ERRORS: &str = "frontend_template_render_errors_total";
pub const TEMPLATE_RENDER_SECONDS: &str = "frontend_template_render_seconds";

/// This function records a successful render of `template`.
/// It increments the render counter and records how long execution took.
pub fn record_render(template: &str, duration: Duration) {
    ::metrics::increment_counter!(TEMPLATES_RENDERED, "template" => template.to_string());
    ::metrics::histogram!(
        TEMPLATE_RENDER_SECONDS,
        duration.as_secs_f64(),
        "template" => template.to_string()
    );
}

/// This function records a failed render of `template`.
pub fn record_render_error(template: &str) {
    ::metrics::increment_counter!(TEMPLATE_RENDER_ERRORS, "template" => template.to_string());
}
