//! ロギングシステム
//!
//! `log` ファサードのバックエンドとして動作するロガー。
//! 標準エラー出力と追記モードのファイル出力に対応する

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// `log` クレートのフィルタに変換（Debug はトレースも含む）
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Trace,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Error | LogLevel::Fatal => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

/// ロガー
#[derive(Debug, Clone)]
pub struct Logger {
    level: LogLevel,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    /// ログレベルを取得
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力の有無を設定
    pub fn with_stderr(mut self, enabled: bool) -> Self {
        self.output_stderr = enabled;
        self
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
            {
                let _ = writeln!(file, "{}", message);
            }
        }
    }

    /// 任意のログレベルでメッセージを出力
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if self.should_log(level) {
            self.write_line(&format!("{}: {}", level.tag(), message.as_ref()));
        }
    }

    /// コンテキスト付きでログを出力
    pub fn log_with_context(
        &self,
        level: LogLevel,
        context: Option<&str>,
        message: impl AsRef<str>,
    ) {
        let context_info = context.unwrap_or("unknown");
        self.log(level, format!("{} in {}", message.as_ref(), context_info));
    }

    /// グローバルな `log` バックエンドとして登録
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let filter = self.level().to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= self.level.to_level_filter()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        self.log_with_context(
            LogLevel::from(record.level()),
            Some(record.target()),
            record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn logger_respects_log_level() {
        let logger = Logger::for_development().with_stderr(false);
        assert!(logger.should_log(LogLevel::Debug));
        assert!(logger.should_log(LogLevel::Error));

        let info_logger = Logger::for_development()
            .with_level(LogLevel::Info)
            .with_stderr(false);
        assert_eq!(info_logger.level(), LogLevel::Info);
        assert!(!info_logger.should_log(LogLevel::Debug));
        assert!(info_logger.should_log(LogLevel::Warning));
    }

    #[test]
    fn log_levels_map_onto_facade() {
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Debug);
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warning);
        assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Trace);
        assert_eq!(LogLevel::Fatal.to_level_filter(), log::LevelFilter::Error);
    }

    #[test]
    fn facade_records_are_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dynstr.log");
        let logger = Logger::new(LogLevel::Info)
            .with_stderr(false)
            .with_file_output(&path);

        Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Info)
                .target("dynstr::sort")
                .args(format_args!("sorted {} lines", 3))
                .build(),
        );
        Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Trace)
                .target("dynstr::buffer")
                .args(format_args!("reallocating"))
                .build(),
        );

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "INFO: sorted 3 lines in dynstr::sort\n");
    }
}
