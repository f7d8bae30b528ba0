// src/main.rs

use clap::Parser;
use infinite_list::{
    unique_sorted_by, AppError, Change, CommandLineInput, DemoConfig, GithubHttpClient,
    GithubUser, GithubUsers, InfiniteList, ListConfig, Presentation, RetryPolicy, StatusFlag,
    Transition, UserPage,
};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use tokio::sync::broadcast::{self, error::RecvError};

type UserList = InfiniteList<GithubUser, String>;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("infinite_list.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Builds the GitHub users list: users deduplicated by id in ascending
/// order, each rendered as one line of text.
fn build_list(config: &DemoConfig) -> Result<UserList, AppError> {
    let client = GithubHttpClient::new(config.base_url.clone(), config.token.as_ref())?;
    let source = GithubUsers::new(client, config.per_page)
        .with_retry_policy(RetryPolicy::default().with_max_attempts(config.retries));

    let list_config = ListConfig::from_source(source, |pages: &[UserPage]| {
        unique_sorted_by(pages, |user| user.id)
    })
    .with_decorator(|line: &mut String, user: &GithubUser| {
        line.clear();
        line.push_str(&user.to_string());
    });

    Ok(InfiniteList::spawn(list_config))
}

/// Drives a list the way a scrolling user would: first appearance, a few
/// rounds of reaching the bottom, then optionally a pull-to-refresh.
struct ScrollSession<'a> {
    config: &'a DemoConfig,
    list: UserList,
    transitions: broadcast::Receiver<Transition<GithubUser>>,
}

impl<'a> ScrollSession<'a> {
    fn new(config: &'a DemoConfig, list: UserList) -> Self {
        let transitions = list.transitions();
        Self {
            config,
            list,
            transitions,
        }
    }

    async fn run(mut self) -> Result<(), AppError> {
        self.list.init()?;
        self.wait_until_settled(StatusFlag::Reloading).await?;
        self.report("first page");

        if self.list.status().erroring {
            self.list.shutdown().await?;
            return Err(AppError::InternalError {
                message: "The first page could not be loaded (see log for details)".to_string(),
                source: None,
            });
        }

        for round in 1..=self.config.pages {
            let before = self.list.current_items().len();
            let last_row = before.saturating_sub(1);
            if !self.list.item_displayed(last_row)? {
                log::debug!("Row {} is not close enough to the end to prefetch", last_row);
                break;
            }
            self.wait_until_settled(StatusFlag::LoadingMore).await?;

            let after = self.list.current_items().len();
            if after == before {
                println!("✓ No more users after round {}", round);
                break;
            }
            self.report(&format!("load-more round {}", round));
        }

        if self.config.refresh {
            self.list.refresh()?;
            self.wait_until_settled(StatusFlag::Refreshing).await?;
            self.report("refresh");
        }

        self.print_items();
        self.list.shutdown().await
    }

    /// Waits for `flag` to fall after the trigger that raised it.
    async fn wait_until_settled(&mut self, flag: StatusFlag) -> Result<(), AppError> {
        let transitions = &mut self.transitions;
        let list = &self.list;

        let waited = tokio::time::timeout(self.config.step_timeout, async move {
            loop {
                match transitions.recv().await {
                    Ok(Transition {
                        change: Change::Flag(changed, false),
                        ..
                    }) if changed == flag => return Ok(()),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("Skipped {} transitions while waiting", skipped);
                        if !list.status().get(flag) {
                            return Ok(());
                        }
                    }
                    Err(RecvError::Closed) => return Err(AppError::ControllerClosed),
                }
            }
        })
        .await;

        waited.map_err(|_| AppError::InternalError {
            message: format!(
                "Timed out after {:?} waiting for {} to settle",
                self.config.step_timeout, flag
            ),
            source: None,
        })?
    }

    fn report(&self, step: &str) {
        let items = self.list.current_items();
        let view = self.list.presentation();
        println!("📄 After {}: {} users, {}", step, items.len(), describe(&view));
    }

    fn print_items(&self) {
        let mut line = String::new();
        for user in self.list.current_items().iter() {
            self.list.decorate(&mut line, user);
            println!("  {}", line);
        }
    }
}

fn describe(view: &Presentation) -> &'static str {
    if view.show_loading {
        "loading"
    } else if view.show_error {
        "showing the error placeholder"
    } else if view.show_empty {
        "showing the empty placeholder"
    } else if view.show_footer_spinner || view.show_refresh_spinner {
        "showing rows with a spinner"
    } else {
        "showing rows"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = DemoConfig::resolve(cli)?;
    if let Some(token) = &config.token {
        log::info!("Using API token {}", token);
    }

    let list = build_list(&config)?;
    ScrollSession::new(&config, list).run().await?;

    Ok(())
}
