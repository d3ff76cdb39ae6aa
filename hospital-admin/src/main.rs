//! 医院数据模型管理工具

mod config;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hospital_core::EntityKind;
use hospital_database::{ddl, DatabasePool, DatabaseQueries};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AdminConfig;

/// 管理工具命令行参数
#[derive(Parser, Debug)]
#[command(name = "hospital-admin")]
#[command(about = "医院运营数据模型管理工具：建表、查看表结构、校验创建请求")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 打印建表语句
    Schema {
        /// 只打印某个实体
        #[arg(short, long)]
        entity: Option<EntityKind>,
    },
    /// 在数据库中创建全部表与索引
    Migrate {
        /// 数据库连接字符串，覆盖配置
        #[arg(long)]
        database_url: Option<String>,
    },
    /// 按实体的可插入结构校验 JSON 输入，输出补齐默认值后的结果
    Validate {
        #[arg(short, long)]
        entity: EntityKind,

        /// JSON 文件路径，`-` 表示标准输入
        #[arg(short, long, default_value = "-")]
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = AdminConfig::load(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // 初始化日志
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Schema { entity } => print_schema(entity),
        Command::Migrate { database_url } => {
            if let Some(url) = database_url {
                config.database.url = url;
            }
            migrate(&config).await
        }
        Command::Validate { entity, input } => validate(entity, &input),
    }
}

fn print_schema(entity: Option<EntityKind>) -> Result<()> {
    match entity {
        Some(kind) => println!("{};", ddl::create_table_sql(kind.schema())),
        None => {
            for sql in ddl::create_all_sql() {
                println!("{};\n", sql);
            }
            for sql in ddl::INDEXES {
                println!("{};", sql);
            }
        }
    }
    Ok(())
}

async fn migrate(config: &AdminConfig) -> Result<()> {
    info!("连接数据库...");
    let pool = DatabasePool::connect(&config.database).await?;

    DatabaseQueries::new(&pool).create_tables().await?;
    info!("建表完成");
    Ok(())
}

fn validate(kind: EntityKind, input: &str) -> Result<()> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("读取标准输入失败")?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("读取文件失败: {}", input))?
    };

    let value: serde_json::Value = serde_json::from_str(&text).context("输入不是合法 JSON")?;

    match kind.validate_json(&value) {
        Ok(normalized) => {
            println!("{}", serde_json::to_string_pretty(&normalized)?);
            Ok(())
        }
        Err(err) => {
            for issue in &err.issues {
                error!(entity = %kind, "{}", issue);
            }
            bail!(err)
        }
    }
}
