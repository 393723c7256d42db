// ==========================================
// 库存台账集成测试
// ==========================================
// 职责: 验证生产入库、库存外推、近期动态排序与并发累加
// ==========================================


#[cfg(test)]
mod inventory_ledger_test {
    use algae_farm_ops::app::AppState;
    use algae_farm_ops::engine::{EngineError, FixedClock, RECENT_ACTIVITY_LIMIT};
    use chrono::{Duration, NaiveDate};
    use std::sync::Arc;
    use std::thread;

    use crate::test_helpers::{create_test_db, create_test_state, dec, register_product, today};

    // ==========================================
    // 入库与外推
    // ==========================================

    #[test]
    fn test_production_increments_stock_and_projects() {
        let (_tmp, _clock, state) = create_test_state();
        let product = register_product(&state, "Alga Seca", "500", "50");

        let event = state
            .inventory_ledger
            .apply_production(product.product_id, dec("25"), "  Luis ", None)
            .unwrap();
        assert_eq!(event.event_date, today());
        assert_eq!(event.responsible, "Luis");

        let stored = state.inventory_ledger.get_product(product.product_id).unwrap();
        assert_eq!(stored.stock_actual, dec("525"));

        // 30 天外推: 525 + 50*30
        assert_eq!(state.inventory_ledger.project(&stored, 30), dec("2025"));
        assert_eq!(state.inventory_ledger.project(&stored, 0), dec("525"));
    }

    #[test]
    fn test_backdated_event_keeps_work_date() {
        let (_tmp, _clock, state) = create_test_state();
        let product = register_product(&state, "Harina de Alga", "0", "10");
        let work_date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

        let event = state
            .inventory_ledger
            .apply_production(product.product_id, dec("7.25"), "Ana", Some(work_date))
            .unwrap();

        assert_eq!(event.event_date, work_date);
        assert_eq!(event.created_at.date(), today());
    }

    #[test]
    fn test_negative_quantity_leaves_stock_untouched() {
        let (_tmp, _clock, state) = create_test_state();
        let product = register_product(&state, "Alga Seca", "100", "5");

        let err = state
            .inventory_ledger
            .apply_production(product.product_id, dec("-1"), "Luis", None)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidQuantity(_)));

        let stored = state.inventory_ledger.get_product(product.product_id).unwrap();
        assert_eq!(stored.stock_actual, dec("100"));
        let summary = state.comparison_service.build_dashboard(0).unwrap();
        assert!(summary.recent_production.is_empty());
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let (_tmp, _clock, state) = create_test_state();

        let err = state
            .inventory_ledger
            .apply_production(999, dec("1"), "Luis", None)
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    // ==========================================
    // 近期动态
    // ==========================================

    #[test]
    fn test_recent_feed_is_limited_and_ordered() {
        let (_tmp, _clock, state) = create_test_state();
        let product = register_product(&state, "Alga Fresca", "0", "100");

        // 7 条记录, 作业日期乱序; 同一天两条按入库时间区分
        let offsets = [3, 1, 5, 1, 0, 6, 2];
        for (i, offset) in offsets.iter().enumerate() {
            state
                .inventory_ledger
                .apply_production(
                    product.product_id,
                    dec(&format!("{}", i + 1)),
                    "Luis",
                    Some(today() - Duration::days(*offset)),
                )
                .unwrap();
        }

        let summary = state.comparison_service.build_dashboard(30).unwrap();
        let feed = &summary.recent_production;
        assert_eq!(feed.len(), RECENT_ACTIVITY_LIMIT);

        let dates: Vec<NaiveDate> = feed.iter().map(|e| e.event_date).collect();
        assert_eq!(
            dates,
            vec![
                today(),
                today() - Duration::days(1),
                today() - Duration::days(1),
                today() - Duration::days(2),
                today() - Duration::days(3),
            ]
        );
        // 同日: 后入库者在前 (第4条 cantidad=4, 第2条 cantidad=2)
        assert_eq!(feed[1].quantity, dec("4"));
        assert_eq!(feed[2].quantity, dec("2"));
        assert_eq!(feed[0].product_name, "Alga Fresca");
    }

    // ==========================================
    // 并发累加
    // ==========================================

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        algae_farm_ops::logging::init_test();
        let (_tmp, db_path) = create_test_db().unwrap();

        let product_id = {
            let clock = Arc::new(FixedClock::at_date(today()));
            let state = AppState::with_clock(db_path.clone(), clock).unwrap();
            register_product(&state, "Alga Seca", "100", "5").product_id
        };

        // 两个独立连接各自写入
        let handles: Vec<_> = ["5", "3"]
            .into_iter()
            .map(|qty| {
                let db_path = db_path.clone();
                thread::spawn(move || {
                    let clock =
                        Arc::new(FixedClock::at_date(today()).with_step(Duration::seconds(1)));
                    let state = AppState::with_clock(db_path, clock).unwrap();
                    for _ in 0..10 {
                        state
                            .inventory_ledger
                            .apply_production(product_id, dec(qty), "Luis", None)
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let clock = Arc::new(FixedClock::at_date(today()));
        let state = AppState::with_clock(db_path, clock).unwrap();
        let stored = state.inventory_ledger.get_product(product_id).unwrap();
        assert_eq!(stored.stock_actual, dec("180"));
    }

    #[test]
    fn test_small_increments_do_not_drift() {
        let (_tmp, _clock, state) = create_test_state();
        let product = register_product(&state, "Bioestimulante", "0", "1");

        for _ in 0..200 {
            state
                .inventory_ledger
                .apply_production(product.product_id, dec("0.01"), "Ana", None)
                .unwrap();
        }

        let stored = state.inventory_ledger.get_product(product.product_id).unwrap();
        assert_eq!(stored.stock_actual, dec("2.00"));
    }
}
