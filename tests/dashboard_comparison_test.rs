// ==========================================
// 驾驶舱对比集成测试
// ==========================================
// 职责: 验证实验组/对照组产蛋率聚合、胜出判定、窗口过滤与边界响应
// ==========================================


#[cfg(test)]
mod dashboard_comparison_test {
    use algae_farm_ops::api::ApiError;
    use algae_farm_ops::app::commands;
    use algae_farm_ops::config::config_keys;
    use algae_farm_ops::domain::DietType;
    use algae_farm_ops::engine::RECENT_ACTIVITY_LIMIT;
    use chrono::Duration;
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::test_helpers::{
        create_test_state, daily_report, dec, register_batch, register_product, today,
    };

    // ==========================================
    // 聚合与胜出判定
    // ==========================================

    #[test]
    fn test_group_rate_skips_batches_without_reports() {
        let (_tmp, _clock, state) = create_test_state();
        let algas = register_batch(&state, "Nave 1", DietType::ExperimentalAlgae, 100);
        // 无日报的批次不参与聚合
        register_batch(&state, "Nave 3", DietType::ExperimentalAlgae, 1000);

        for (offset, eggs) in [(2, 80), (1, 90)] {
            state
                .flock_report_store
                .record_daily_report(daily_report(
                    algas.batch_id,
                    eggs,
                    today() - Duration::days(offset),
                ))
                .unwrap();
        }

        let summary = state.comparison_service.build_dashboard(30).unwrap();
        assert_eq!(summary.experimental.laying_rate, dec("85.00"));
        assert_eq!(summary.experimental.batches_with_data, 1);
        assert_eq!(summary.experimental.total_eggs, 170);
        assert_eq!(summary.experimental.total_bird_days, 200);

        // 对照组无数据 → 0
        assert_eq!(summary.control.laying_rate, Decimal::ZERO);
        assert_eq!(summary.winner, DietType::ExperimentalAlgae);
    }

    #[test]
    fn test_tie_goes_to_control() {
        let (_tmp, _clock, state) = create_test_state();
        let algas = register_batch(&state, "Nave 1", DietType::ExperimentalAlgae, 100);
        let control = register_batch(&state, "Nave 2", DietType::Control, 200);

        state
            .flock_report_store
            .record_daily_report(daily_report(algas.batch_id, 85, today()))
            .unwrap();
        state
            .flock_report_store
            .record_daily_report(daily_report(control.batch_id, 170, today()))
            .unwrap();

        let summary = state.comparison_service.build_dashboard(7).unwrap();
        assert_eq!(summary.experimental.laying_rate, summary.control.laying_rate);
        assert_eq!(summary.winner, DietType::Control);
    }

    #[test]
    fn test_both_groups_empty_is_control() {
        let (_tmp, _clock, state) = create_test_state();
        register_batch(&state, "Nave 1", DietType::ExperimentalAlgae, 100);

        let summary = state.comparison_service.build_dashboard(30).unwrap();
        assert_eq!(summary.experimental.laying_rate, Decimal::ZERO);
        assert_eq!(summary.control.laying_rate, Decimal::ZERO);
        assert_eq!(summary.winner, DietType::Control);
    }

    #[test]
    fn test_window_excludes_old_reports_and_inactive_batches() {
        let (_tmp, _clock, state) = create_test_state();
        let algas = register_batch(&state, "Nave 1", DietType::ExperimentalAlgae, 100);
        let retired = register_batch(&state, "Nave 9", DietType::ExperimentalAlgae, 100);

        state
            .flock_report_store
            .record_daily_report(daily_report(algas.batch_id, 90, today() - Duration::days(2)))
            .unwrap();
        state
            .flock_report_store
            .record_daily_report(daily_report(algas.batch_id, 50, today() - Duration::days(40)))
            .unwrap();
        state
            .flock_report_store
            .record_daily_report(daily_report(retired.batch_id, 10, today()))
            .unwrap();
        state.catalog_api.deactivate_batch(retired.batch_id).unwrap();

        let recent = state.comparison_service.build_dashboard(30).unwrap();
        assert_eq!(recent.cutoff_date, today() - Duration::days(30));
        assert_eq!(recent.experimental.laying_rate, dec("90.00"));

        let wide = state.comparison_service.build_dashboard(60).unwrap();
        assert_eq!(wide.experimental.laying_rate, dec("70.00"));

        // 截止日当天的日报计入窗口
        let exact = state.comparison_service.build_dashboard(2).unwrap();
        assert_eq!(exact.experimental.laying_rate, dec("90.00"));
    }

    #[test]
    fn test_over_report_is_accepted() {
        let (_tmp, _clock, state) = create_test_state();
        let algas = register_batch(&state, "Nave 1", DietType::ExperimentalAlgae, 100);

        state
            .flock_report_store
            .record_daily_report(daily_report(algas.batch_id, 150, today()))
            .unwrap();

        let summary = state.comparison_service.build_dashboard(30).unwrap();
        assert_eq!(summary.experimental.laying_rate, dec("150.00"));
    }

    #[test]
    fn test_rate_rounds_to_two_places() {
        let (_tmp, _clock, state) = create_test_state();
        let control = register_batch(&state, "Nave 2", DietType::Control, 3);

        state
            .flock_report_store
            .record_daily_report(daily_report(control.batch_id, 2, today()))
            .unwrap();

        let summary = state.comparison_service.build_dashboard(30).unwrap();
        assert_eq!(summary.control.laying_rate, dec("66.67"));
    }

    #[test]
    fn test_projection_uses_window_as_horizon() {
        let (_tmp, _clock, state) = create_test_state();
        register_product(&state, "Alga Seca", "525", "50");

        let summary = state.comparison_service.build_dashboard(30).unwrap();
        assert_eq!(summary.products.len(), 1);
        assert_eq!(summary.products[0].current_stock, dec("525"));
        assert_eq!(summary.products[0].projected_stock, dec("2025"));
    }

    #[test]
    fn test_recent_flock_feed_is_limited_and_ordered() {
        let (_tmp, _clock, state) = create_test_state();
        let algas = register_batch(&state, "Nave 1", DietType::ExperimentalAlgae, 80);
        let control = register_batch(&state, "Nave 2", DietType::Control, 3);
        let store = &state.flock_report_store;

        // 日期乱序写入
        for (offset, eggs) in [(3, 63), (6, 66), (1, 61), (5, 65), (4, 64)] {
            store
                .record_daily_report(daily_report(
                    algas.batch_id,
                    eggs,
                    today() - Duration::days(offset),
                ))
                .unwrap();
        }
        // 同一天两条: 后入库的排前
        store
            .record_daily_report(daily_report(algas.batch_id, 70, today()))
            .unwrap();
        store
            .record_daily_report(daily_report(control.batch_id, 2, today()))
            .unwrap();

        let summary = state.comparison_service.build_dashboard(30).unwrap();
        let feed = &summary.recent_flock_reports;
        assert_eq!(feed.len(), RECENT_ACTIVITY_LIMIT);

        let eggs: Vec<u32> = feed.iter().map(|e| e.eggs_collected).collect();
        assert_eq!(eggs, vec![2, 70, 61, 63, 64]);
        assert_eq!(feed[0].report_date, feed[1].report_date);
        assert!(feed[0].created_at > feed[1].created_at);
        assert!(feed[1].report_date > feed[2].report_date);

        // 单条产蛋率随动态输出
        assert_eq!(feed[0].batch_name, "Nave 2");
        assert_eq!(feed[0].laying_rate, dec("66.67"));
        assert_eq!(feed[1].laying_rate, dec("87.50"));
        assert_eq!(feed[4].laying_rate, dec("80.00"));
    }

    // ==========================================
    // API 与边界命令
    // ==========================================

    #[tokio::test]
    async fn test_dashboard_view_uses_configured_window() {
        let (_tmp, _clock, state) = create_test_state();
        register_product(&state, "Alga Seca", "100", "10");

        let view = state.dashboard_api.get_dashboard(None).await.unwrap();
        assert_eq!(view.window_days, 30);
        assert_eq!(view.period_title, "Últimos 30 días");
        assert_eq!(view.stock_chart.projected_stock, vec![400.0]);
        assert_eq!(view.winner_code, "CONTROL");

        state
            .config_manager
            .set_global_config_value(config_keys::DEFAULT_WINDOW_DAYS, "7")
            .unwrap();
        let view = state.dashboard_api.get_dashboard(None).await.unwrap();
        assert_eq!(view.window_days, 7);
        assert_eq!(view.stock_chart.projected_stock, vec![170.0]);
    }

    #[tokio::test]
    async fn test_negative_window_is_rejected() {
        let (_tmp, _clock, state) = create_test_state();

        let err = state.dashboard_api.get_dashboard(Some(-1)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));

        let resp = commands::dashboard(&state, Some("-3")).await;
        assert_eq!(resp.status, 400);
        assert_eq!(resp.body["codigo"], "INVALID_PARAMETER");

        let resp = commands::dashboard(&state, Some("abc")).await;
        assert_eq!(resp.status, 400);
    }

    #[tokio::test]
    async fn test_dashboard_command_ok() {
        let (_tmp, _clock, state) = create_test_state();
        register_batch(&state, "Nave 1", DietType::ExperimentalAlgae, 100);

        let resp = commands::dashboard(&state, Some("14")).await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["status"], "ok");
        assert_eq!(resp.body["data"]["window_days"], 14);
    }

    #[tokio::test]
    async fn test_unknown_diet_code_in_storage_is_invalid_state() {
        let (_tmp, _clock, state) = create_test_state();
        register_batch(&state, "Nave 1", DietType::ExperimentalAlgae, 100);

        {
            let conn = Connection::open(&state.db_path).unwrap();
            conn.execute("UPDATE flock_batch SET diet_type = 'MIXTA'", [])
                .unwrap();
        }

        let err = state.dashboard_api.get_dashboard(Some(30)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidState(_)));

        let resp = commands::dashboard(&state, None).await;
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body["codigo"], "INVALID_STATE");
    }
}
