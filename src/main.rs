use acronym_invaders::cli::parse_cli;
use acronym_invaders::logging::init_file_logger;
use acronym_invaders::session::SessionController;
use acronym_invaders::store::{JsonScoreStore, MemoryScoreStore, ScoreStore};
use acronym_invaders::tui::TuiInterface;
use acronym_invaders::info_log;
use std::process::ExitCode;

fn open_store(cli: &acronym_invaders::cli::Cli) -> Box<dyn ScoreStore> {
    let Some(path) = cli.scores_path() else {
        log::warn!("No data directory available, high scores will not be saved");
        return Box::new(MemoryScoreStore::new());
    };
    match JsonScoreStore::open(&path) {
        Ok(store) => {
            info_log!("Using high-score store at '{}'", path.display());
            Box::new(store)
        }
        Err(e) => {
            log::error!("{e}; high scores will not be saved");
            Box::new(MemoryScoreStore::new())
        }
    }
}

fn main() -> ExitCode {
    let cli = parse_cli();

    if let Some(path) = cli.log_path()
        && let Err(e) = init_file_logger(&path)
    {
        eprintln!("Failed to open log file '{}': {e}", path.display());
    }

    let store = open_store(&cli);
    let mut session = SessionController::new(cli.session_config(), store, cli.rng());

    let mut tui = match TuiInterface::new() {
        Ok(tui) => tui,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Failed to initialise terminal: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = tui.run(&mut session);
    drop(tui);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
