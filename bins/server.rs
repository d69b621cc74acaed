use std::process::ExitCode;

use configs::{AppConfig, ServerConfig};
use tokio::runtime::Runtime;
use tracing::{error, info};
use uuid::Uuid;

const SERVICE: &str = "game-config";

fn install_panic_hook(instance: Uuid) {
    std::panic::set_hook(Box::new(move |info| {
        error!(service = SERVICE, event = "panic", %instance, message = %info, "unhandled panic");
    }));
}

// worker_threads 为空时使用 tokio 默认值（CPU 核数）
fn build_runtime(server: &ServerConfig) -> std::io::Result<Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = server.worker_threads {
        builder.worker_threads(n);
    }
    builder.build()
}

async fn serve_until_ctrl_c(cfg: AppConfig, instance: Uuid) -> ExitCode {
    tokio::select! {
        res = server::run(cfg) => match res {
            Ok(()) => {
                info!(service = SERVICE, event = "stop", %instance, "server stopped");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = SERVICE, event = "run_failed", %instance, error = %e, "server exited with error");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!(service = SERVICE, event = "shutdown_signal", %instance, "received Ctrl+C, shutting down");
            ExitCode::SUCCESS
        }
    }
}

fn main() -> ExitCode {
    // .env 必须先于日志初始化加载，RUST_LOG / LOG_FORMAT 才会生效
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance = Uuid::new_v4();
    install_panic_hook(instance);

    // 配置只加载一次，之后整体交给 server::run
    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = SERVICE, event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(&cfg.server) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = SERVICE,
        event = "start",
        %instance,
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        worker_threads = ?cfg.server.worker_threads,
        "game config service starting"
    );

    rt.block_on(serve_until_ctrl_c(cfg, instance))
}
