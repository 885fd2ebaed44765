// ==========================================
// 库存作业列表引擎 - 演示数据
// ==========================================
// 仅在库为空时写入；已有数据时不做任何修改
// ==========================================

use crate::domain::{StockOperation, StockOperationItem, StockOperationStatus};
use crate::repository::{RepositoryResult, StockOperationRepository};
use chrono::{Duration, NaiveDate};

struct SeedRow {
    type_name: &'static str,
    status: StockOperationStatus,
    source: Option<&'static str>,
    destination: Option<&'static str>,
    responsible: (&'static str, &'static str),
    days_ago: i64,
    items: &'static [(&'static str, u32)],
}

const SEED_ROWS: &[SeedRow] = &[
    SeedRow {
        type_name: "Receipt",
        status: StockOperationStatus::New,
        source: Some("Central Warehouse"),
        destination: Some("Main Pharmacy"),
        responsible: ("John", "Doe"),
        days_ago: 0,
        items: &[("BATCH1", 100), ("BATCH2", 200)],
    },
    SeedRow {
        type_name: "Transfer Out",
        status: StockOperationStatus::Submitted,
        source: Some("Main Pharmacy"),
        destination: Some("Ward 3"),
        responsible: ("Jane", "Roe"),
        days_ago: 1,
        items: &[("AMX-2023-07", 40)],
    },
    SeedRow {
        type_name: "Adjustment",
        status: StockOperationStatus::InProgress,
        source: Some("Main Pharmacy"),
        destination: None,
        responsible: ("Amina", "Okafor"),
        days_ago: 2,
        items: &[("PCM-500-11", 12), ("PCM-500-12", 8)],
    },
    SeedRow {
        type_name: "Requisition",
        status: StockOperationStatus::Approved,
        source: Some("Central Warehouse"),
        destination: Some("Outpatient Clinic"),
        responsible: ("Li", "Wei"),
        days_ago: 4,
        items: &[("ORS-0923", 300)],
    },
    SeedRow {
        type_name: "Issue",
        status: StockOperationStatus::Dispatched,
        source: Some("Central Warehouse"),
        destination: Some("Laboratory"),
        responsible: ("Carlos", "Mendes"),
        days_ago: 6,
        items: &[("GLV-M-01", 1000)],
    },
    SeedRow {
        type_name: "Return",
        status: StockOperationStatus::Returned,
        source: Some("Ward 3"),
        destination: Some("Main Pharmacy"),
        responsible: ("Jane", "Roe"),
        days_ago: 9,
        items: &[("AMX-2023-07", 5)],
    },
    SeedRow {
        type_name: "Disposal",
        status: StockOperationStatus::Completed,
        source: Some("Main Pharmacy"),
        destination: None,
        responsible: ("John", "Doe"),
        days_ago: 14,
        items: &[("EXP-2022-01", 30)],
    },
    SeedRow {
        type_name: "Stock Take",
        status: StockOperationStatus::Cancelled,
        source: Some("Outpatient Clinic"),
        destination: None,
        responsible: ("Li", "Wei"),
        days_ago: 21,
        items: &[],
    },
];

/// 写入演示作业,返回写入条数
pub fn seed_demo_data(repo: &StockOperationRepository, today: NaiveDate) -> RepositoryResult<usize> {
    if repo.count()? > 0 {
        tracing::info!("库中已有作业,跳过演示数据");
        return Ok(0);
    }

    for (index, row) in SEED_ROWS.iter().enumerate() {
        let on = today - Duration::days(row.days_ago);
        let op = StockOperation {
            uuid: format!("demo-{:02}", index + 1),
            operation_type_name: row.type_name.to_string(),
            status: row.status,
            source_name: row.source.map(str::to_string),
            destination_name: row.destination.map(str::to_string),
            responsible_person_given_name: Some(row.responsible.0.to_string()),
            responsible_person_family_name: Some(row.responsible.1.to_string()),
            creator_given_name: Some("Admin".to_string()),
            creator_family_name: None,
            operation_date: on,
            date_created: on,
            completed_date: (row.status == StockOperationStatus::Completed).then_some(on),
            stock_operation_items: row
                .items
                .iter()
                .map(|(batch_no, quantity)| StockOperationItem {
                    batch_no: batch_no.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        };
        repo.insert(&op)?;
    }

    tracing::info!(count = SEED_ROWS.len(), "演示数据已写入");
    Ok(SEED_ROWS.len())
}
