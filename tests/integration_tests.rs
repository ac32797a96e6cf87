use anyhow::Result;
use chrono::NaiveDate;
use receivables_analytics::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn fixture_records() -> Result<Vec<EnrichedRecord>> {
    let receivables_json = r#"[
        {
            "id": 1,
            "empresa": "Constructora Norte",
            "cod_cliente": "C001",
            "cliente": "ACME raw",
            "obra": "Torre A",
            "num_doc": "F-001",
            "periodo_fat": "2024-05",
            "dt_venc": "05/06/2024",
            "valot_total": "1.000,00",
            "saldo_a_pagar": "1.000,00",
            "status": "Vencido",
            "integral_parcial": "Integral",
            "banco": "Santander"
        },
        {
            "id": 2,
            "empresa": "Constructora Norte",
            "cod_cliente": "C001",
            "cliente": "ACME raw",
            "obra": "Torre A",
            "periodo_fat": "2024-04",
            "num_doc": "F-002",
            "dt_venc": "1 de mayo de 2024",
            "valot_total": "2.000,00",
            "status": "Vencido",
            "banco": "Santander"
        },
        {
            "id": 3,
            "empresa": "Constructora Sur",
            "cod_cliente": "C002",
            "cliente": "Beta raw",
            "obra": "",
            "periodo_fat": "2024-05",
            "dt_venc": "2024-06-20",
            "dt_recebimento": "2024-06-14",
            "valot_total": "500,00",
            "saldo_a_pagar": "0",
            "status": "Pago",
            "integral_parcial": "Integral",
            "banco": "BBVA"
        },
        {
            "id": 4,
            "empresa": "Constructora Sur",
            "cod_cliente": "",
            "cliente": "",
            "periodo_fat": "2024-05",
            "dt_venc": "10/06/2024",
            "valot_total": "300,00",
            "status": "Parcial",
            "integral_parcial": "Parcial",
            "valor_parcial": "100,00",
            "banco": "BBVA"
        }
    ]"#;

    let clients_json = r#"[
        {"cod_cliente": "C001", "razon_social": "ACME SA", "nombre_comercial": "ACME"},
        {"cod_cliente": "C002", "razon_social": "Beta SL", "nombre_comercial": "Beta"},
        {"nombre_comercial": "No Code"}
    ]"#;

    let receivables = parse_receivable_payload(receivables_json)?;
    let clients = parse_client_payload(clients_json)?;
    Ok(enrich(receivables, &clients))
}

#[test]
fn test_pipeline_payload_to_enriched_records() -> Result<()> {
    let records = fixture_records()?;
    assert_eq!(records.len(), 4);

    // Locale parsing: European amounts and three date notations agree.
    assert_eq!(records[0].record.total_amount, 1000.0);
    assert_eq!(
        records[0].record.due_date,
        NaiveDate::from_ymd_opt(2024, 6, 5)
    );
    assert_eq!(
        records[1].record.due_date,
        NaiveDate::from_ymd_opt(2024, 5, 1)
    );

    // Missing balance defaults to the total.
    assert_eq!(records[1].record.remaining_balance, 2000.0);
    // Explicit zero balance survives.
    assert_eq!(records[2].record.remaining_balance, 0.0);

    // Join: coded records carry their client, the codeless one does not.
    assert_eq!(
        records[0].client.as_ref().map(|c| c.trade_name.as_str()),
        Some("ACME")
    );
    assert!(records[3].client.is_none());
    Ok(())
}

#[test]
fn test_filter_shrinks_and_every_survivor_matches() -> Result<()> {
    let records = fixture_records()?;

    let mut spec = FilterSpec::default();
    spec.companies.insert("Constructora Norte".to_string());
    spec.status = StatusFilter::Open;
    spec.bank = "Santander".to_string();

    let filtered = filter_records(&records, &spec);
    assert!(filtered.len() <= records.len());
    assert_eq!(filtered.len(), 2);
    for item in &filtered {
        assert!(spec.matches(item));
        assert_eq!(item.record.company, "Constructora Norte");
        assert_ne!(item.record.status, Status::Paid);
        assert_eq!(item.record.bank, "Santander");
    }
    Ok(())
}

#[test]
fn test_metrics_over_fixture() -> Result<()> {
    let records = fixture_records()?;
    let m = compute_metrics(&records, today());

    // Records 1, 2 and 4 are open; 1 and 2 are past due.
    assert_eq!(m.overdue_balance.amount, 3300.0);
    assert_eq!(m.overdue_item_count, 3);
    // Records 1 and 2 share C001; record 4 has neither code nor name.
    assert_eq!(m.clients_at_risk, 1);

    // Record 3 received 500 yesterday; record 4 partial of 100 counts in
    // the period alongside it.
    assert_eq!(m.received_yesterday.amount, 500.0);
    assert_eq!(m.received_in_period.amount, 600.0);

    assert!(m.percent_overdue >= 0.0 && m.percent_overdue <= 100.0);
    assert_eq!(m.total_open_balance, 3300.0);
    assert_eq!(m.percent_overdue, 100.0);
    Ok(())
}

#[test]
fn test_percent_overdue_zero_when_no_open_balance() {
    let m = compute_metrics(&[], today());
    assert_eq!(m.percent_overdue, 0.0);
}

#[test]
fn test_aging_partitions_fixture_exactly_once() -> Result<()> {
    let records = fixture_records()?;
    let buckets = compute_aging(&records, today());

    let overdue_count = records.iter().filter(|r| r.is_overdue(today())).count();
    assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), overdue_count);

    // 10 days late lands in 1-30 twice (records 1 and 4), 45 days late in
    // 31-60 (record 2).
    assert_eq!(buckets[0].amount, 1300.0);
    assert_eq!(buckets[1].amount, 2000.0);
    assert_eq!(buckets[2].amount, 0.0);
    assert_eq!(buckets[3].amount, 0.0);
    Ok(())
}

#[test]
fn test_grouping_blank_keys_collapse() -> Result<()> {
    let records = fixture_records()?;
    let stats = group_by_dimension(&records, Dimension::Project, today());

    // Record 4 has no project and record 2 names Torre A; record 1 also
    // Torre A. The blank key collapses into the single placeholder group.
    let undefined = stats.iter().find(|s| s.name == UNDEFINED_LABEL).unwrap();
    assert_eq!(undefined.total_balance, 300.0);
    let torre = stats.iter().find(|s| s.name == "Torre A").unwrap();
    assert_eq!(torre.total_balance, 3000.0);
    assert_eq!(stats.len(), 2);
    Ok(())
}

#[test]
fn test_risk_analysis_over_fixture() -> Result<()> {
    let records = fixture_records()?;
    let risk = analyze_risk(&records, today());

    assert_eq!(risk.concentration.total_overdue, 3300.0);
    assert_eq!(risk.concentration.top5_clients[0].name, "ACME");
    assert_eq!(risk.concentration.top5_clients[0].balance, 3000.0);
    assert_eq!(risk.concentration.top10_percent, 100.0);

    let acme = &risk.recurring_debtors[0];
    assert_eq!(acme.name, "ACME");
    assert_eq!(acme.count, 2);

    // Sur received both the full 500 and the 100 partial; Norte leads the
    // overdue ranking.
    let perf = &risk.company_performance;
    assert_eq!(perf[0].name, "Constructora Norte");
    assert_eq!(perf[0].overdue, 3000.0);
    let sur = perf.iter().find(|p| p.name == "Constructora Sur").unwrap();
    assert_eq!(sur.received, 600.0);
    assert_eq!(sur.overdue, 300.0);
    Ok(())
}

#[test]
fn test_all_aggregators_idempotent() -> Result<()> {
    let records = fixture_records()?;
    let before = serde_json::to_string(&records)?;

    let m1 = compute_metrics(&records, today());
    let a1 = compute_aging(&records, today());
    let g1 = group_by_dimension(&records, Dimension::Client, today());
    let r1 = analyze_risk(&records, today());

    assert_eq!(m1, compute_metrics(&records, today()));
    assert_eq!(a1, compute_aging(&records, today()));
    assert_eq!(g1, group_by_dimension(&records, Dimension::Client, today()));
    assert_eq!(r1, analyze_risk(&records, today()));

    // No hidden mutation of the input collection.
    assert_eq!(before, serde_json::to_string(&records)?);
    Ok(())
}

#[test]
fn test_build_dashboard_matches_individual_aggregators() -> Result<()> {
    let records = fixture_records()?;
    let spec = FilterSpec {
        status: StatusFilter::Open,
        ..Default::default()
    };

    let snapshot = build_dashboard(&records, &spec, Dimension::Client, today());
    let filtered = filter_records(&records, &spec);

    assert_eq!(snapshot.metrics, compute_metrics(&filtered, today()));
    assert_eq!(snapshot.aging, compute_aging(&filtered, today()));
    assert_eq!(
        snapshot.treemap,
        group_by_dimension(&filtered, Dimension::Client, today())
    );
    assert_eq!(snapshot.risk, analyze_risk(&filtered, today()));
    Ok(())
}
