// ==========================================
// 藻类农场管理系统 - 命令行入口
// ==========================================
// 用法:
//   algae-farm-ops dashboard [dias]
//   algae-farm-ops export-production <archivo.csv>
//   algae-farm-ops export-flock <archivo.csv>
//   algae-farm-ops ingest-production '<json>'
//   algae-farm-ops ingest-flock '<json>'
//   algae-farm-ops sync-offline '<json-array>'
//   algae-farm-ops config <clave> [valor]
// 数据库路径: ALGAE_FARM_DB_PATH 或用户数据目录
// ==========================================

use algae_farm_ops::app::{commands, get_default_db_path, AppState, CommandResponse};
use algae_farm_ops::config::config_keys;
use anyhow::{anyhow, Context};
use std::fs::File;

fn print_usage() {
    println!("==================================================");
    println!("{}", algae_farm_ops::APP_NAME);
    println!("版本: {}", algae_farm_ops::VERSION);
    println!("==================================================");
    println!();
    println!("用法:");
    println!("  algae-farm-ops dashboard [dias]");
    println!("  algae-farm-ops export-production <archivo.csv>");
    println!("  algae-farm-ops export-flock <archivo.csv>");
    println!("  algae-farm-ops ingest-production '<json>'");
    println!("  algae-farm-ops ingest-flock '<json>'");
    println!("  algae-farm-ops sync-offline '<json-array>'");
    println!("  algae-farm-ops config <clave> [valor]");
    println!("    claves: {}", config_keys::ALL.join(", "));
}

fn print_response(resp: &CommandResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&resp.body)?);
    if resp.is_ok() {
        Ok(())
    } else {
        Err(anyhow!("命令失败 (status={})", resp.status))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    algae_farm_ops::logging::init_from_env();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match command {
        "dashboard" => {
            let resp = commands::dashboard(&state, args.get(1).map(String::as_str)).await;
            print_response(&resp)
        }
        "export-production" | "export-flock" => {
            let path = args
                .get(1)
                .ok_or_else(|| anyhow!("缺少输出文件路径"))?;
            let export = if command == "export-production" {
                state.export_api.export_production().await?
            } else {
                state.export_api.export_flock_reports().await?
            };
            let file = File::create(path).with_context(|| format!("无法创建文件: {}", path))?;
            export.write_csv(file)?;
            println!("{} → {} ({} filas)", export.sheet_title, path, export.rows.len());
            Ok(())
        }
        "ingest-production" | "ingest-flock" | "sync-offline" => {
            let body = args.get(1).ok_or_else(|| anyhow!("缺少 JSON 请求体"))?;
            let resp = match command {
                "ingest-production" => commands::save_production(&state, "POST", body).await,
                "ingest-flock" => commands::save_flock_report(&state, "POST", body).await,
                _ => commands::sync_offline(&state, "POST", body).await,
            };
            print_response(&resp)
        }
        "config" => {
            let key = args.get(1).ok_or_else(|| anyhow!("缺少配置项名称"))?;
            let manager = &state.config_manager;
            match args.get(2) {
                Some(value) => manager
                    .set_global_config_value(key, value)
                    .map_err(|e| anyhow!("写入配置失败: {}", e))?,
                None => {
                    let value = manager
                        .get_global_config_value(key)
                        .map_err(|e| anyhow!("读取配置失败: {}", e))?;
                    println!("{} = {}", key, value.as_deref().unwrap_or("(por defecto)"));
                }
            }
            Ok(())
        }
        _ => {
            print_usage();
            Err(anyhow!("未知命令: {}", command))
        }
    }
}
