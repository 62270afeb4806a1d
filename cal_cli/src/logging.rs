use tracing_subscriber::EnvFilter;

const CRATE_TARGETS: [&str; 2] = ["cal_cli", "cal_core"];

/// Filter directives for a `-v` count, e.g. `cal_cli=info,cal_core=info`
fn filter_for(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS.map(|target| format!("{target}={level}")).join(",")
}

/// Send log events for our crates to stderr. `RUST_LOG` wins over `-v`.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_for(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_levels() {
        assert_eq!(filter_for(0), "cal_cli=warn,cal_core=warn");
        assert_eq!(filter_for(2), "cal_cli=debug,cal_core=debug");
        assert_eq!(filter_for(9), "cal_cli=trace,cal_core=trace");
    }
}
