mod action;
mod app;
mod async_compare;
mod cli;
mod clipboard;
mod compare;
mod components;
mod config;
mod event;
mod link;
mod logging;
mod report;
mod selection;
mod session;
mod state;
mod tui;
mod view;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use crate::app::App;
use crate::async_compare::CompareWorker;
use crate::cli::Cli;
use crate::clipboard::SystemClipboard;
use crate::compare::{ComparisonService, GitSource, GithubSource, SnapshotComparison};
use crate::config::{SnapdiffConfig, SourceKind};
use crate::link::{LinkState, MemoryLocation};
use crate::logging::LogTarget;
use crate::session::SessionLocation;
use crate::view::ComparisonView;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restore so the user gets their shell back
        let _ = tui::restore();
        default_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    install_panic_hook();

    let cli = Cli::parse();

    // Load config, apply CLI overrides (CLI wins)
    let mut config = config::load_config();
    if let Some(ref repo) = cli.repo {
        config.repo_path = Some(repo.clone());
        config.source = SourceKind::Git;
    }
    if let Some(source) = cli.source {
        config.source = source;
    }

    let log_path = config::log_path();
    let target = if cli.print {
        LogTarget::Stderr
    } else {
        LogTarget::File(&log_path)
    };
    logging::init(&config.log_level, &config.log_format, target)?;

    let service = build_service(&config)?;
    let saved = if config.restore_session && !cli.fresh {
        session::load_session(&config::session_path())
    } else {
        None
    };
    let link = initial_link(&cli, &config, saved)?;
    let now = selection::now_seconds();
    info!(source = ?config.source, link = %link.as_string(), "starting");

    if cli.print {
        let (mut view, request) = ComparisonView::load(
            link,
            now,
            &config.commit_url_base,
            Box::new(MemoryLocation::default()),
        );
        let mut worker = CompareWorker::new(service);
        report::await_comparison(&mut view, &mut worker, request).await?;
        print!("{}", report::render_report(&view));
        std::process::exit(report::exit_code(&view));
    }

    let location = SessionLocation::new(config::session_path());
    info!(session = %location.path().display(), "link persisted to session file");
    let (view, request) =
        ComparisonView::load(link, now, &config.commit_url_base, Box::new(location));
    let mut app = App::new(view, request, service, Box::new(SystemClipboard));

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    if let Err(ref e) = result {
        eprintln!("snapdiff: {e:#}");
    }

    result
}

fn build_service(config: &SnapdiffConfig) -> Result<Arc<dyn ComparisonService>> {
    let expected = config.expected_keys.clone();
    let service: Arc<dyn ComparisonService> = match config.source {
        SourceKind::Github => Arc::new(SnapshotComparison::new(
            GithubSource::new(
                &config.api_base,
                &config.raw_base,
                &config.owner,
                &config.repo,
                &config.branch,
                &config.file,
            ),
            expected,
        )),
        SourceKind::Git => {
            let repo_path = config
                .repo_path
                .as_deref()
                .context("the git source needs --repo or repo_path in config.toml")?;
            Arc::new(SnapshotComparison::new(
                GitSource::new(repo_path, &config.branch, &config.file),
                expected,
            ))
        }
    };
    Ok(service)
}

/// Pick the starting link: `--link`, else `--from`/`--to` on the share base,
/// else the saved session, else the bare share base. Date values are passed
/// through unchecked; the view validates them on load.
fn initial_link(cli: &Cli, config: &SnapdiffConfig, saved: Option<String>) -> Result<LinkState> {
    if let Some(ref link) = cli.link {
        return Ok(LinkState::parse(link)?);
    }

    if cli.from.is_some() || cli.to.is_some() {
        return Ok(LinkState::with_selection(
            &config.share_base_url,
            cli.from.as_deref(),
            cli.to.as_deref(),
        )?);
    }

    if let Some(link) = saved.and_then(|s| LinkState::parse(&s).ok()) {
        return Ok(link);
    }

    Ok(LinkState::parse(&config.share_base_url)?)
}
