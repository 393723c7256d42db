// ==========================================
// 藻类农场管理系统 - 演示数据库生成
// ==========================================
// 用法: seed_demo_db [db_path] [dias]
// - 备份并重建数据库
// - 登记 5 类产品与实验/对照两组批次
// - 按天生成生产事件与鸡群日报 (通过引擎写入, 保证库存一致)
// ==========================================

use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use algae_farm_ops::app::{get_default_db_path, AppState};
use algae_farm_ops::domain::{DietType, NewDailyReport, NewFlockBatch, NewProduct, ProductCategory};
use algae_farm_ops::engine::FixedClock;

const DEFAULT_DAYS: i64 = 45;

fn main() -> Result<(), Box<dyn Error>> {
    algae_farm_ops::logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    let days = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(DEFAULT_DAYS)
        .max(1);

    backup_and_reset_db(&db_path)?;

    let today = Local::now().date_naive();
    let start = today - Duration::days(days);
    let clock = Arc::new(FixedClock::at_date(start).with_step(Duration::seconds(1)));
    let state = AppState::with_clock(db_path.clone(), clock.clone())?;

    // 产品目录
    let catalog = [
        ("Alga Fresca Cosechada", ProductCategory::RawAlgaeWhole, "1200", "150"),
        ("Alga Seca", ProductCategory::RawAlgaeDehydrated, "320.5", "40"),
        ("Harina de Alga", ProductCategory::RawAlgaeMicronized, "180", "25.5"),
        ("Alimento Aviar con Alga", ProductCategory::FinishedFeed, "500", "50"),
        ("Bioestimulante Foliar 5L", ProductCategory::FinishedBiostimulant, "75", "12"),
    ];
    let mut products = Vec::new();
    for (name, category, stock, capacity) in catalog {
        products.push(state.catalog_api.register_product(NewProduct {
            name: name.to_string(),
            category,
            stock_actual: stock.parse::<Decimal>()?,
            capacidad_maxima_diaria: capacity.parse::<Decimal>()?,
        })?);
    }

    // 鸡群批次
    let batches = vec![
        state.catalog_api.register_batch(NewFlockBatch {
            name: "Nave 1 - Lote Algas".to_string(),
            diet_type: DietType::ExperimentalAlgae,
            initial_bird_count: 500,
            start_date: start,
        })?,
        state.catalog_api.register_batch(NewFlockBatch {
            name: "Nave 2 - Lote Control".to_string(),
            diet_type: DietType::Control,
            initial_bird_count: 480,
            start_date: start,
        })?,
    ];

    let workers = ["Luis", "Marta", "Ana"];
    let mut event_count = 0usize;
    let mut report_count = 0usize;

    for offset in 0..days {
        let day = start + Duration::days(offset);
        clock.set(day.and_hms_opt(17, 0, 0).unwrap_or_default());
        let worker = workers[(offset as usize) % workers.len()];

        for (idx, product) in products.iter().enumerate() {
            // 隔天轮换, 产量为日产能的 40%-90%
            if (offset as usize + idx) % 2 != 0 {
                continue;
            }
            let pct = Decimal::from(40 + ((offset * 7 + idx as i64 * 11) % 51));
            let qty = (product.capacidad_maxima_diaria * pct / Decimal::ONE_HUNDRED).round_dp(2);
            state
                .inventory_ledger
                .apply_production(product.product_id, qty, worker, Some(day))?;
            event_count += 1;
        }

        for batch in &batches {
            // 实验组产蛋率略高
            let base = match batch.diet_type {
                DietType::ExperimentalAlgae => 84,
                DietType::Control => 79,
            };
            let rate = base + ((offset * 13) % 9) as u32;
            let eggs = batch.initial_bird_count * rate / 100;
            state.flock_report_store.record_daily_report(NewDailyReport {
                batch_id: batch.batch_id,
                eggs_collected: eggs,
                eggs_broken: (offset % 4) as u32,
                feed_consumed_kg: Decimal::new(i64::from(batch.initial_bird_count) * 115, 3),
                mortality: u32::from(offset % 11 == 0),
                notes: Some(format!("Rep. por {}", worker)),
                responsible: Some(worker.to_string()),
                report_date: Some(day),
            })?;
            report_count += 1;
        }
    }

    print_quick_counts(&db_path, products.len(), batches.len(), event_count, report_count, today);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if path.exists() {
        let backup = format!("{}.bak", db_path);
        fs::copy(path, &backup)?;
        fs::remove_file(path)?;
        println!("已备份旧数据库: {}", backup);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn print_quick_counts(
    db_path: &str,
    products: usize,
    batches: usize,
    events: usize,
    reports: usize,
    today: NaiveDate,
) {
    println!("==================================================");
    println!("演示数据库已生成: {}", db_path);
    println!("产品: {}  批次: {}", products, batches);
    println!("生产事件: {}  鸡群日报: {}", events, reports);
    println!("数据截止: {}", today);
    println!("==================================================");
}
