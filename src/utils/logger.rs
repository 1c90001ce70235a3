use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RUST_LOG 優先，否則只開本 crate 的日誌
fn default_filter(verbose: bool) -> EnvFilter {
    let directives = if verbose {
        "tally_connector=debug,info"
    } else {
        "tally_connector=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

/// 終端機用：精簡格式寫到 stderr，stdout 留給指令輸出
pub fn init_cli_logger(verbose: bool) {
    // 用 try_init，讓嵌入方已經裝好的 subscriber 優先
    let _ = tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

/// 每行一個 JSON 物件；欄位攤平到最上層，並帶上目前的 span (endpoint)
pub fn init_json_logger() {
    let _ = tracing_subscriber::registry()
        .with(default_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_ignored() {
        init_cli_logger(true);
        init_json_logger();
        tracing::info!("logger still usable after repeated init");
    }
}
