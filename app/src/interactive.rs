//! Line-oriented dashboard: commands come from stdin while earlier requests are still in
//! flight, and every completion is folded into the session as soon as it arrives.

use status_client::api::RecentQuery;
use status_client::session::{Action, Applied, Notice, Session};
use status_core::domain::{IncidentId, ServiceState};
use status_core::error::AppError;
use time::OffsetDateTime;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::render::{render_incident, render_list, render_notice, RenderOptions};

const HELP: &str = "\
commands:
  list                 show the incidents currently displayed
  reload               fetch the most recent incidents again
  generate [state]     ask the server for a new incident
  resolve <id>         mark an incident operational
  history <id>         fetch and show an incident's history
  help                 show this message
  quit                 leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    List,
    Reload,
    Generate(Option<ServiceState>),
    Resolve(IncidentId),
    History(IncidentId),
    Help,
    Quit,
}

fn parse_id(raw: Option<&str>, verb: &str) -> Result<IncidentId, String> {
    let raw = raw.ok_or_else(|| format!("usage: {verb} <id>"))?;
    raw.parse::<IncidentId>()
        .map_err(|_| format!("not an incident id: {raw}"))
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<LineCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for {verb}"));
    }

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => LineCommand::List,
        "reload" | "refresh" => LineCommand::Reload,
        "generate" | "gen" => {
            let state = arg
                .map(|raw| raw.parse::<ServiceState>())
                .transpose()
                .map_err(|e| e.details.unwrap_or(e.message))?;
            LineCommand::Generate(state)
        }
        "resolve" => LineCommand::Resolve(parse_id(arg, "resolve")?),
        "history" => LineCommand::History(parse_id(arg, "history")?),
        "help" | "?" => LineCommand::Help,
        "quit" | "exit" | "q" => LineCommand::Quit,
        other => return Err(format!("unknown command: {other} (try help)")),
    };
    Ok(Some(command))
}

fn print_notices(session: &mut Session, color: bool) {
    for notice in session.take_notices() {
        println!("{}", render_notice(&notice, color));
    }
}

fn print_list(session: &Session, opts: &mut RenderOptions) {
    opts.now = OffsetDateTime::now_utc();
    print!("{}", render_list(session.store().incidents(), opts));
}

fn show_applied(session: &mut Session, applied: &Applied, opts: &mut RenderOptions) {
    print_notices(session, opts.color);
    match applied {
        Applied::Initialized { .. } | Applied::Inserted { .. } => print_list(session, opts),
        Applied::Replaced { id, .. } => {
            if let Some(incident) = session.store().get(*id) {
                opts.now = OffsetDateTime::now_utc();
                let expanded = RenderOptions {
                    expand_history: true,
                    ..*opts
                };
                print!("{}", render_incident(incident, &expanded));
            }
        }
        Applied::AlreadyPresent { id, .. } => println!("incident #{id} is already displayed"),
        Applied::Dropped { id } => tracing::debug!(id, "completion for an incident no longer displayed"),
        Applied::Failed(_) => {}
    }
}

/// Run the line loop over `input` (stdin in the binary).
///
/// The initial load completes before the first command is read. Leaving, on `quit` or end of
/// input, waits for requests still in flight so their results are shown.
pub async fn run_interactive<R>(
    session: &mut Session,
    query: RecentQuery,
    mut opts: RenderOptions,
    input: R,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
{
    session.submit(Action::LoadRecent(query.clone()))?;
    println!("loading incidents... (type help for commands)");
    while let Some(applied) = session.next_completion().await {
        show_applied(session, &applied, &mut opts);
    }

    let mut lines = input.lines();
    loop {
        tokio::select! {
            Some(applied) = session.next_completion(), if session.pending() > 0 => {
                show_applied(session, &applied, &mut opts);
            }
            line = lines.next_line() => {
                let line = line.map_err(|e| {
                    AppError::new("CLI_STDIN_FAILED", "Failed to read from stdin")
                        .with_details(e.to_string())
                })?;
                let Some(line) = line else {
                    break;
                };
                let command = match parse_line(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                };
                let action = match command {
                    LineCommand::Quit => break,
                    LineCommand::Help => {
                        print!("{HELP}");
                        continue;
                    }
                    LineCommand::List => {
                        print_list(session, &mut opts);
                        continue;
                    }
                    LineCommand::Reload => Action::LoadRecent(query.clone()),
                    LineCommand::Generate(state) => Action::Generate(state),
                    LineCommand::Resolve(id) => Action::Resolve(id),
                    LineCommand::History(id) => Action::History(id),
                };
                if let Err(err) = session.submit(action) {
                    println!("{}", render_notice(&Notice::error("Rejected", err), opts.color));
                }
            }
        }
    }

    if session.pending() > 0 {
        tracing::debug!(pending = session.pending(), "waiting for requests in flight");
    }
    while let Some(applied) = session.next_completion().await {
        show_applied(session, &applied, &mut opts);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use status_client::demo::DemoApi;
    use status_core::normalize::timestamps::parse_server_timestamp;

    fn demo_session() -> Session {
        let now = parse_server_timestamp("2026-02-10T00:00:00Z").expect("now");
        Session::new(Arc::new(DemoApi::with_clock(3, now)))
    }

    fn ids(session: &Session) -> Vec<i64> {
        session.store().incidents().iter().map(|i| i.id).collect()
    }

    #[tokio::test]
    async fn commands_are_applied_while_requests_complete() {
        let mut session = demo_session();
        let input: &[u8] = b"generate outage\nresolve 1\nresolve 1\nlist\nquit\nresolve 2\n";

        run_interactive(&mut session, RecentQuery::default(), RenderOptions::new(false), input)
            .await
            .expect("loop");

        assert_eq!(session.pending(), 0);
        let ids = ids(&session);
        assert_eq!(ids.len(), 4);
        assert_eq!(&ids[1..], &[3, 2, 1]);
        let store = session.store();
        assert_eq!(store.incidents()[0].current_state, ServiceState::Outage);
        assert_eq!(store.get(1).map(|i| i.current_state), Some(ServiceState::Operational));
        assert_eq!(store.get(1).map(|i| i.history.len()), Some(2));
        assert_eq!(store.get(2).map(|i| i.current_state), Some(ServiceState::Outage));
    }

    #[tokio::test]
    async fn end_of_input_leaves_after_initial_load() {
        let mut session = demo_session();
        let input: &[u8] = b"";

        run_interactive(&mut session, RecentQuery::new(2), RenderOptions::new(false), input)
            .await
            .expect("loop");

        assert_eq!(ids(&session), vec![3, 2]);
    }

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse_line("  "), Ok(None));
        assert_eq!(parse_line("ls"), Ok(Some(LineCommand::List)));
        assert_eq!(parse_line("gen"), Ok(Some(LineCommand::Generate(None))));
        assert_eq!(
            parse_line("generate Minor"),
            Ok(Some(LineCommand::Generate(Some(ServiceState::Degraded))))
        );
        assert_eq!(parse_line("resolve 42"), Ok(Some(LineCommand::Resolve(42))));
        assert_eq!(parse_line("HISTORY 7"), Ok(Some(LineCommand::History(7))));
        assert_eq!(parse_line("q"), Ok(Some(LineCommand::Quit)));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_line("resolve"), Err("usage: resolve <id>".to_string()));
        assert_eq!(parse_line("resolve abc"), Err("not an incident id: abc".to_string()));
        assert_eq!(parse_line("history 1 2"), Err("too many arguments for history".to_string()));
        assert!(parse_line("generate melting").is_err());
        assert!(parse_line("explode").is_err());
    }
}
