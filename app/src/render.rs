use std::fmt::Write as _;

use status_client::api::HealthStatus;
use status_client::session::{Notice, NoticeLevel};
use status_core::domain::{Incident, ServiceState};
use status_core::normalize::timestamps::{display_history_stamp, display_relative};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub color: bool,
    pub expand_history: bool,
    pub now: OffsetDateTime,
}

impl RenderOptions {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            expand_history: false,
            now: OffsetDateTime::now_utc(),
        }
    }
}

fn paint(text: &str, ansi: &str, color: bool) -> String {
    if color {
        format!("\x1b[{ansi}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn state_ansi(state: ServiceState) -> &'static str {
    match state {
        ServiceState::Operational => "32",
        ServiceState::Degraded => "33",
        ServiceState::Outage => "31",
        ServiceState::Maintenance => "34",
    }
}

pub fn state_badge(state: ServiceState, color: bool) -> String {
    let label = format!("[{}]", state.as_str().to_ascii_uppercase());
    paint(&label, state_ansi(state), color)
}

pub fn render_incident(incident: &Incident, opts: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} {} {}",
        incident.id,
        state_badge(incident.current_state, opts.color),
        incident.title()
    );
    let _ = writeln!(
        out,
        "    {} | was {} | {}{}",
        incident.service,
        incident.previous_state,
        display_relative(&incident.created_at, opts.now),
        if incident.is_resolvable() { " | resolvable" } else { "" }
    );
    if !incident.incident.description.is_empty() {
        let _ = writeln!(out, "    {}", incident.incident.description);
    }
    if !incident.incident.components.is_empty() {
        let _ = writeln!(out, "    components: {}", incident.incident.components.join(", "));
    }
    let _ = writeln!(out, "    details: {}", incident.incident.url);

    if opts.expand_history && !incident.history.is_empty() {
        let _ = writeln!(out, "    history:");
        for entry in &incident.history {
            let _ = writeln!(
                out,
                "      {}  {} -> {}",
                display_history_stamp(&entry.recorded_at),
                entry.previous_state,
                state_badge(entry.current_state, opts.color)
            );
        }
    }
    out
}

pub fn render_list(incidents: &[Incident], opts: &RenderOptions) -> String {
    if incidents.is_empty() {
        return "No incidents reported\n".to_string();
    }
    let mut out = format!("Recent Incidents ({})\n\n", incidents.len());
    let cards: Vec<String> = incidents.iter().map(|i| render_incident(i, opts)).collect();
    out.push_str(&cards.join("\n"));
    out
}

pub fn render_notice(notice: &Notice, color: bool) -> String {
    match notice.level {
        NoticeLevel::Success => format!("{} {}", paint("ok:", "32", color), notice.message),
        NoticeLevel::Error => {
            let mut line = format!("{} {}", paint("error:", "31", color), notice.message);
            if let Some(err) = &notice.error {
                let _ = write!(line, " ({err})");
            }
            line
        }
    }
}

pub fn render_health(health: &HealthStatus, color: bool) -> String {
    let status = if health.is_healthy() {
        paint(&health.status, "32", color)
    } else {
        paint(&health.status, "31", color)
    };
    format!("status: {status}\nversion: {}\nsince: {}\n", health.version, health.timestamp)
}
