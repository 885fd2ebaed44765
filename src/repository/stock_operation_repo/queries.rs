use super::StockOperationRepository;
use crate::domain::date_format;
use crate::domain::{StockOperation, StockOperationItem, StockOperationPage, StockOperationStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

const OPERATION_COLUMNS: &str = r#"
    uuid, operation_type_name, status, source_name, destination_name,
    responsible_person_given_name, responsible_person_family_name,
    creator_given_name, creator_family_name,
    operation_date, date_created, completed_date
"#;

/// stock_operation 原始行（字符串形态,读取后再做类型转换）
struct OperationRow {
    uuid: String,
    operation_type_name: String,
    status: String,
    source_name: Option<String>,
    destination_name: Option<String>,
    responsible_person_given_name: Option<String>,
    responsible_person_family_name: Option<String>,
    creator_given_name: Option<String>,
    creator_family_name: Option<String>,
    operation_date: String,
    date_created: String,
    completed_date: Option<String>,
}

impl OperationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            uuid: row.get(0)?,
            operation_type_name: row.get(1)?,
            status: row.get(2)?,
            source_name: row.get(3)?,
            destination_name: row.get(4)?,
            responsible_person_given_name: row.get(5)?,
            responsible_person_family_name: row.get(6)?,
            creator_given_name: row.get(7)?,
            creator_family_name: row.get(8)?,
            operation_date: row.get(9)?,
            date_created: row.get(10)?,
            completed_date: row.get(11)?,
        })
    }

    fn into_domain(self, items: Vec<StockOperationItem>) -> RepositoryResult<StockOperation> {
        let status = self
            .status
            .parse::<StockOperationStatus>()
            .map_err(|message| RepositoryError::FieldValueError {
                field: "status".to_string(),
                message,
            })?;

        Ok(StockOperation {
            operation_date: parse_date("operation_date", &self.operation_date)?,
            date_created: parse_date("date_created", &self.date_created)?,
            completed_date: match self.completed_date.as_deref() {
                Some(raw) => Some(parse_date("completed_date", raw)?),
                None => None,
            },
            uuid: self.uuid,
            operation_type_name: self.operation_type_name,
            status,
            source_name: self.source_name,
            destination_name: self.destination_name,
            responsible_person_given_name: self.responsible_person_given_name,
            responsible_person_family_name: self.responsible_person_family_name,
            creator_given_name: self.creator_given_name,
            creator_family_name: self.creator_family_name,
            stock_operation_items: items,
        })
    }
}

fn parse_date(field: &str, raw: &str) -> RepositoryResult<NaiveDate> {
    date_format::parse_lenient(raw).ok_or_else(|| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("无法解析日期: {}", raw),
    })
}

/// 按原始顺序读取明细
fn load_items(conn: &Connection, uuid: &str) -> RepositoryResult<Vec<StockOperationItem>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT batch_no, quantity
        FROM stock_operation_item
        WHERE operation_uuid = ?1
        ORDER BY position
        "#,
    )?;

    let rows = stmt.query_map(params![uuid], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut items = Vec::new();
    for row in rows {
        let (batch_no, quantity) = row?;
        let quantity = u32::try_from(quantity).map_err(|_| RepositoryError::FieldValueError {
            field: "quantity".to_string(),
            message: format!("数量越界: {}", quantity),
        })?;
        items.push(StockOperationItem { batch_no, quantity });
    }
    Ok(items)
}

impl StockOperationRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 按ID查询作业（含明细）
    pub fn find_by_id(&self, uuid: &str) -> RepositoryResult<Option<StockOperation>> {
        let conn = self.get_conn()?;

        let sql = format!("SELECT {} FROM stock_operation WHERE uuid = ?1", OPERATION_COLUMNS);
        let row = conn
            .query_row(&sql, params![uuid], OperationRow::from_row)
            .optional()?;

        match row {
            Some(row) => {
                let items = load_items(&conn, &row.uuid)?;
                Ok(Some(row.into_domain(items)?))
            }
            None => Ok(None),
        }
    }

    /// 作业总数
    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let total: i64 =
            conn.query_row("SELECT COUNT(*) FROM stock_operation", [], |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    /// 分页查询（按创建日期倒序）
    ///
    /// # 参数
    /// - `page`: 页码（从 1 开始）
    /// - `page_size`: 每页条数（> 0）
    pub fn find_page(&self, page: u32, page_size: u32) -> RepositoryResult<StockOperationPage> {
        if page == 0 || page_size == 0 {
            return Err(RepositoryError::FieldValueError {
                field: "page".to_string(),
                message: format!("页码与每页条数必须大于0: page={}, size={}", page, page_size),
            });
        }

        let total_items = self.count()?;
        let offset = i64::from(page - 1) * i64::from(page_size);

        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM stock_operation ORDER BY date_created DESC, uuid LIMIT ?1 OFFSET ?2",
            OPERATION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![i64::from(page_size), offset], OperationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let op_items = load_items(&conn, &row.uuid)?;
            items.push(row.into_domain(op_items)?);
        }

        tracing::debug!(page, page_size, returned = items.len(), total_items, "分页查询完成");
        Ok(StockOperationPage { items, total_items })
    }
}
