//! noti CLI
//!
//! 从命令行发送企业微信机器人通知

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use noti::notification::channels::WeworkSender;
use noti::{global, NotifierBuilder, ProviderKind, ProviderSender, SendResult, Settings, Severity};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "noti")]
#[command(about = "noti - 按严重级别发送企业微信机器人通知")]
#[command(version)]
struct Cli {
    /// 调试模式（只写本地日志，不发送）
    #[arg(long, global = true)]
    debug: bool,
    /// 配置文件路径（默认 ~/.config/noti/config.json）
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 一般通知
    Info(SendArgs),
    /// 重要通知
    Warn(SendArgs),
    /// 出错通知
    Error(SendArgs),
    /// 查看渠道配置状态
    Status {
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SendArgs {
    /// 按 Markdown 长消息发送，每个参数一行；没有参数时从 stdin 读取
    #[arg(long, short)]
    markdown: bool,
    /// 消息内容
    message: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "noti=debug" } else { "noti=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(path.as_path())),
        None => Settings::load(),
    }
    .context("Failed to load notification settings")?;

    let (severity, args) = match cli.command {
        Commands::Status { json } => return print_status(&settings, cli.debug, json),
        Commands::Info(args) => (Severity::Info, args),
        Commands::Warn(args) => (Severity::Warn, args),
        Commands::Error(args) => (Severity::Error, args),
    };

    let mut builder = NotifierBuilder::from_settings(settings);
    if cli.debug {
        builder = builder.debug(true);
    }
    if global::init(builder.build()).is_err() {
        debug!("Default notifier already installed");
    }

    let result = if args.markdown {
        let lines = if args.message.is_empty() {
            read_stdin_lines()?
        } else {
            args.message
        };
        match severity {
            Severity::Info => global::info_long(&lines),
            Severity::Warn => global::warn_long(&lines),
            Severity::Error => global::error_long(&lines),
        }
    } else {
        let text = args.message.join(" ");
        match severity {
            Severity::Info => global::info(&text),
            Severity::Warn => global::warn(&text),
            Severity::Error => global::error(&text),
        }
    };

    match result {
        SendResult::Sent { batches } => debug!(batches, "Notification delivered"),
        SendResult::Logged => debug!("Notification written to local log only"),
        SendResult::Failed(_) => std::process::exit(1),
    }

    Ok(())
}

fn read_stdin_lines() -> Result<Vec<String>> {
    io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("Failed to read message from stdin")
}

fn print_status(settings: &Settings, debug_flag: bool, json: bool) -> Result<()> {
    let (ready, missing) = match settings.provider {
        ProviderKind::Wework => {
            let sender = WeworkSender::new(&settings.wework)?;
            (sender.ready(), sender.missing_credentials())
        }
    };
    let mode = if settings.debug || debug_flag || !ready { "debug" } else { "live" };

    if json {
        let status = serde_json::json!({
            "provider": settings.provider.as_str(),
            "ready": ready,
            "missing": missing,
            "mode": mode,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("Provider: {}", settings.provider.as_str());
        println!("Ready:    {}", ready);
        if !missing.is_empty() {
            println!("Missing:  {}", missing.join(", "));
        }
        println!("Mode:     {}", mode);
    }

    Ok(())
}
