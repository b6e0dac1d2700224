use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};
use rusqlite::Connection;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        //
        // 1) MIGRATE
        //
        if *migrate {
            // open without the automatic migration run so pending ones can be reported
            let conn = Connection::open(&cfg.database)?;
            let pending = pending_migrations(&conn)?;
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            if pending.is_empty() {
                println!("  nothing to apply");
            }
            for v in run_pending_migrations(&conn)? {
                println!("  applied {}", v);
            }
            println!("{}✔ Migration completed.{}\n", GREEN, RESET);
        }

        if !(*info || *check || *vacuum) {
            return Ok(());
        }
        let pool = DbPool::new(&cfg.database)?;

        //
        // 2) INFO
        //
        if *info {
            stats::print_db_info(&pool)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        //
        // 4) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
