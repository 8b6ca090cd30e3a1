//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `postboard_core` linkage without the Flutter runtime.
//! - Print a one-line-per-column summary of the configured store.

use postboard_core::db::open_db;
use postboard_core::{default_board, BoardService, SqliteBoardRepository, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("postboard_core ping={}", postboard_core::ping());
    println!("postboard_core version={}", postboard_core::core_version());

    match print_board_summary(&StoreConfig::from_env()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("postboard summary failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_board_summary(config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&config.db_path)?;
    let service = BoardService::open(SqliteBoardRepository::try_new(&conn)?, default_board())?;

    println!("store path={}", config.db_path.display());
    for grouping in service.groupings().groupings() {
        println!(
            "grouping id={} title={:?} count={}",
            grouping.id,
            grouping.title,
            grouping.count()
        );
    }
    Ok(())
}
