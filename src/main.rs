use anyhow::Context;
use dynstr::config::{self, SortOptions};
use dynstr::logging::Logger;
use dynstr::error::{self, ErrorLevel};
use dynstr::{sort, DynStrError};
use std::io;

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match SortOptions::from_args(&args).map_err(DynStrError::from) {
        Ok(options) => options,
        Err(error) => {
            // 未知のフラグには使い方を添える
            if error.level() == ErrorLevel::Warning {
                eprintln!("{}", config::USAGE);
            }
            return Err(error).context("invalid command line");
        }
    };

    if options.show_help {
        println!("{}", config::USAGE);
        return Ok(());
    }

    let mut logger = Logger::new(options.log_level);
    if let Some(path) = options.resolve_log_path() {
        config::ensure_parent_dir(&path)
            .with_context(|| format!("cannot create log directory for {}", path.display()))?;
        logger = logger.with_file_output(path);
    }
    let level = logger.level();
    logger.install().context("failed to install logger")?;
    log::debug!("logging at {:?}", level);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();

    match sort::run(&mut reader, &mut writer, &options) {
        Ok(count) => {
            log::debug!("printed {} lines", count);
            Ok(())
        }
        Err(error) => {
            error::report(&error);
            Err(error).context("sorting lines failed")
        }
    }
}
