use std::sync::Arc;

use status_client::api::http::HttpIncidentClient;
use status_client::api::{IncidentApi, RecentQuery};
use status_client::config::{ClientConfig, MAX_RECENT_COUNT};
use status_client::demo::DemoApi;
use status_client::session::{Action, Applied, LoadState, Notice, Session};
use status_core::error::AppError;

pub mod cli;
pub mod interactive;
pub mod logging;
pub mod render;

use cli::{Cli, Command};
use render::{render_health, render_incident, render_list, render_notice, RenderOptions};

const DEMO_SEED_COUNT: usize = 12;

/// Layer config: defaults, `--config` file, `STATUSBOARD_*` env, then flags.
pub fn resolve_config(cli: &Cli) -> Result<ClientConfig, AppError> {
    resolve_config_with(cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve_config`], reading environment overrides through `lookup`.
pub fn resolve_config_with<F>(cli: &Cli, lookup: F) -> Result<ClientConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match &cli.config {
        Some(path) => ClientConfig::from_json_file(path)?,
        None => ClientConfig::default(),
    };
    let mut config = base.apply_env(lookup)?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config.validate()
}

fn build_api(cli: &Cli, config: &ClientConfig) -> Result<Arc<dyn IncidentApi>, AppError> {
    if cli.demo {
        tracing::info!("using in-memory demo API");
        return Ok(Arc::new(DemoApi::new(DEMO_SEED_COUNT)));
    }
    tracing::debug!(api_url = %config.api_url, "using HTTP status API");
    Ok(Arc::new(HttpIncidentClient::new(config)?))
}

fn print_notices(session: &mut Session, color: bool) {
    for notice in session.take_notices() {
        println!("{}", render_notice(&notice, color));
    }
}

fn first_failure(applied: Vec<Applied>) -> Option<AppError> {
    applied.into_iter().find_map(|a| match a {
        Applied::Failed(err) => Some(err),
        _ => None,
    })
}

/// Initial load shared by every command: a failed load aborts the command.
async fn load(session: &mut Session, query: RecentQuery) -> Result<(), AppError> {
    session.submit(Action::LoadRecent(query))?;
    session.drain().await;
    match session.load_state() {
        LoadState::Failed(err) => Err(err.clone()),
        _ => Ok(()),
    }
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli)?;
    let api = build_api(&cli, &config)?;
    let color = !cli.no_color && std::io::IsTerminal::is_terminal(&std::io::stdout());
    let mut opts = RenderOptions::new(color);
    let default_query = RecentQuery::new(config.recent_count);

    if let Command::Health = cli.command {
        let health = tokio::task::spawn_blocking(move || api.health())
            .await
            .map_err(|e| {
                AppError::new("SESSION_WORKER_FAILED", "Health check did not finish")
                    .with_details(e.to_string())
            })??;
        print!("{}", render_health(&health, color));
        return Ok(());
    }

    let mut session = Session::new(api);

    match cli.command {
        Command::List {
            count,
            since,
            history,
        } => {
            let mut query = RecentQuery::new(count.unwrap_or(config.recent_count));
            if let Some(since) = since {
                query = query.since(since);
            }
            load(&mut session, query).await?;
            if history {
                let ids: Vec<i64> = session.store().incidents().iter().map(|i| i.id).collect();
                for id in ids {
                    session.submit(Action::History(id))?;
                }
                session.drain().await;
                opts.expand_history = true;
            }
            print_notices(&mut session, color);
            print!("{}", render_list(session.store().incidents(), &opts));
        }
        Command::Generate { state } => {
            load(&mut session, default_query).await?;
            session.submit(Action::Generate(state))?;
            session.drain().await;
            print_notices(&mut session, color);
            print!("{}", render_list(session.store().incidents(), &opts));
        }
        Command::Resolve { ids } => {
            load(&mut session, RecentQuery::new(MAX_RECENT_COUNT)).await?;
            for id in ids {
                if let Err(err) = session.submit(Action::Resolve(id)) {
                    println!("{}", render_notice(&Notice::error("Skipped resolve", err), color));
                }
            }
            session.drain().await;
            print_notices(&mut session, color);
            print!("{}", render_list(session.store().incidents(), &opts));
        }
        Command::History { id } => {
            load(&mut session, RecentQuery::new(MAX_RECENT_COUNT)).await?;
            if !session.store().contains(id) {
                return Err(AppError::new(
                    "SESSION_INCIDENT_NOT_LOADED",
                    "Incident is not among the most recent incidents",
                )
                .with_details(format!("id={id}")));
            }
            session.submit(Action::History(id))?;
            if let Some(err) = first_failure(session.drain().await) {
                return Err(err);
            }
            let incident = session.store().get(id).ok_or_else(|| {
                AppError::new("SESSION_INCIDENT_NOT_LOADED", "Incident left the list")
                    .with_details(format!("id={id}"))
            })?;
            opts.expand_history = true;
            print!("{}", render_incident(incident, &opts));
        }
        Command::Interactive => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            interactive::run_interactive(&mut session, default_query, opts, input).await?;
        }
        Command::Health => {}
    }

    Ok(())
}
