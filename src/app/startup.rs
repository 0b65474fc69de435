//! Process startup: configuration, logging, connection and the console

use super::cli::{load_config, Args, Settings};
use super::console::Console;
use super::error::AppResult;
use super::pager::PagerPolicy;
use super::prompt::{History, Prompt, TOPIC_HISTORY_FILE};
use super::topology::print_prelude;
use crate::broker::connect;
use crate::core::error_handling::{describe, log_error_with_context};
use crate::core::logging::init_logging;
use crate::core::version::long_version;
use crate::jobs::{spawn_listener, ForegroundControl, JobManager, JobOutput, StdoutOutput};
use std::io::IsTerminal;
use std::sync::Arc;

/// Run the console and exit the process with its status
pub fn startup() {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: cannot start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let argv: Vec<String> = std::env::args().collect();
    let code = runtime.block_on(run(argv));

    // stdin reads park a blocking thread that would otherwise hold up shutdown
    runtime.shutdown_background();
    std::process::exit(code);
}

/// Exit status of one console session
pub async fn run(argv: Vec<String>) -> i32 {
    let is_tty = std::io::stdout().is_terminal();
    let args = Args::parse_styled(&argv, is_tty && std::env::var_os("NO_COLOR").is_none());

    let settings = match configure(&args, is_tty).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", describe(&e));
            return 1;
        }
    };

    if let Err(e) = init_logging(
        Some(&settings.log_level),
        Some(&settings.log_format),
        settings.log_file.as_deref(),
        settings.use_color,
    ) {
        eprintln!("Error: cannot initialise logging: {}", e);
        return 1;
    }
    log::info!("topicsh {} starting", long_version());
    log::debug!("settings: {:?}", settings);

    match console(settings).await {
        Ok(()) => 0,
        Err(e) => {
            log_error_with_context(&e, "Console session");
            1
        }
    }
}

async fn configure(args: &Args, is_tty: bool) -> AppResult<Settings> {
    let file = load_config(args.config_file.as_deref()).await?;
    Ok(Settings::resolve(args, file, is_tty)?)
}

async fn console(settings: Settings) -> AppResult<()> {
    let control = ForegroundControl::new();
    let _listener = spawn_listener(Arc::clone(&control))?;
    let output: Arc<dyn JobOutput> = Arc::new(StdoutOutput);
    let mut prompt = Prompt::stdio();

    let brokers = match settings.brokers.clone() {
        Some(brokers) => brokers,
        None => match prompt.ask("broker list: ").await? {
            Some(brokers) => brokers,
            None => return Ok(()),
        },
    };
    let broker = connect(&brokers, &settings.topics)?;
    let topics = print_prelude(
        broker.as_ref(),
        output.as_ref(),
        settings.use_color,
        &PagerPolicy::detect(),
    )
    .await?;

    let history = match &settings.history_dir {
        Some(dir) => History::load(dir, TOPIC_HISTORY_FILE)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Cannot load topic history from {}: {}", dir.display(), e);
                History::in_memory()
            }),
        None => History::in_memory(),
    };

    let jobs = JobManager::new(broker, control)
        .with_settings(settings.job_settings())
        .with_output(Arc::clone(&output));

    Console::new(prompt, jobs, output)
        .with_history(history)
        .with_topics(topics)
        .run()
        .await
}
