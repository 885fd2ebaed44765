// ==========================================
// 库存作业列表引擎 - 命令行入口
// ==========================================
// 用法: stock-operations [DB_PATH] [--seed] [--json] [--search TEXT]
//                        [--page N] [--page-size N]
// 输出: 渲染后的列表（stdout）,日志写 stderr
// ==========================================

use std::sync::Arc;

use clap::Parser;
use stock_operations::app::{get_default_db_path, seed_demo_data, AppState};
use stock_operations::engine::NoOpDialogPresenter;

/// 库存作业列表 - 加载一页并输出渲染结果
#[derive(Debug, Parser)]
#[command(name = "stock-operations")]
#[command(version)]
#[command(about = "Render one page of the stock operations list")]
struct Cli {
    /// SQLite 数据库路径（缺省为用户数据目录）
    db_path: Option<String>,

    /// 写入演示数据（幂等）
    #[arg(long)]
    seed: bool,

    /// 以 JSON 输出渲染结果
    #[arg(long)]
    json: bool,

    /// 自由文本搜索
    #[arg(long)]
    search: Option<String>,

    /// 页码（从 1 开始）
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    page: Option<u32>,

    /// 每页条数
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stock_operations::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", stock_operations::APP_NAME, stock_operations::VERSION);
    tracing::info!("==================================================");

    let args = Cli::parse();
    let db_path = args.db_path.clone().unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path)?;

    if args.seed {
        let today = chrono::Local::now().date_naive();
        let inserted = seed_demo_data(&state.repository, today)?;
        tracing::info!(inserted, "演示数据处理完成");
    }

    let mut view = state.build_view(Arc::new(NoOpDialogPresenter)).await?;
    view.mount().await?;

    if let Some(size) = args.page_size {
        view.set_page_size(size).await?;
    }
    if let Some(page) = args.page {
        view.go_to(page).await?;
    }
    if let Some(search) = args.search {
        view.set_search_text(search);
    }

    let rendered = view.render();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        println!("{}", rendered);
    }

    view.unmount();
    Ok(())
}
