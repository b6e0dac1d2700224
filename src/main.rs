//! CruxLog main entrypoint.

use cruxlog::run;
use cruxlog::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
