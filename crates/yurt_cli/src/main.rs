//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `yurt_core` linkage.
//! - Open an in-memory database so schema bootstrap is exercised too.

use std::process::ExitCode;
use yurt_core::db::migrations::{current_user_version, latest_version};
use yurt_core::db::open_db_in_memory;
use yurt_core::StudentService;

fn main() -> ExitCode {
    println!("yurt_core ping={}", yurt_core::ping());
    println!("yurt_core version={}", yurt_core::core_version());

    let mut conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("yurt_core db_open=error error={err}");
            return ExitCode::FAILURE;
        }
    };
    match current_user_version(&conn) {
        Ok(version) => println!(
            "yurt_core schema_version={version} latest={}",
            latest_version()
        ),
        Err(err) => {
            eprintln!("yurt_core schema_version=error error={err}");
            return ExitCode::FAILURE;
        }
    }

    let students = StudentService::try_new(&mut conn)
        .map_err(|err| err.to_string())
        .and_then(|service| service.get_all_students().map_err(|err| err.to_string()));
    match students {
        Ok(students) => {
            println!("yurt_core students={}", students.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("yurt_core service=error error={err}");
            ExitCode::FAILURE
        }
    }
}
