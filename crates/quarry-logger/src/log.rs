use crate::severity::LogSeverity;
use env_logger::Env;
use once_cell::sync::OnceCell;
use std::io::Write;

const TARGET: &str = "quarry";

static INIT: OnceCell<()> = OnceCell::new();

/// Installs the process logger. Safe to call more than once; only the first call
/// configures anything. `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{}] {} {}",
                    record.level(),
                    buf.timestamp_seconds(),
                    record.args()
                )
            })
            .try_init();
    });
}

pub fn log(msg: String, log_severity: LogSeverity) {
    ::log::log!(target: TARGET, log_severity.level(), "{}", msg);
}
