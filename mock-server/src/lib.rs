use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};
use tokio::{net::TcpListener, sync::RwLock};

/// Company code the server answers for.
pub const COMPANY_CODE: &str = "foo";
/// Token accepted until the first reissue.
pub const INITIAL_TOKEN: &str = "bar";
/// Staff member the token belongs to.
pub const TOKEN_OWNER: i64 = 1;
pub const PAGE_SIZE: usize = 2;

const WIRE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day] [hour]:[minute]:[second]");

#[derive(Clone, Debug)]
pub struct StoredStamp {
    pub staff_id: i64,
    /// `YYYY/MM/DD HH:MM:SS`
    pub stamped_at: String,
    pub stamp_type: i64,
    pub timezone: String,
}

#[derive(Debug)]
pub struct Store {
    pub token: String,
    pub staffs: Vec<Value>,
    pub stamps: Vec<StoredStamp>,
    reissued: u32,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            token: INITIAL_TOKEN.to_string(),
            staffs: seed_staffs(),
            stamps: seed_stamps(),
            reissued: 0,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
pub struct StaffQuery {
    pub token: String,
    pub target: Option<String>,
    pub page: Option<usize>,
}

#[derive(Deserialize)]
pub struct StampQuery {
    pub token: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
pub struct PostStamp {
    pub token: String,
    #[serde(rename = "type")]
    pub stamp_type: Option<i64>,
    #[serde(rename = "stampedAt")]
    pub stamped_at: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
pub struct ReissueToken {
    pub token: String,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/{company}/staffs", get(list_staffs))
        .route("/{company}/staffs/{staff_id}", get(get_staff))
        .route("/{company}/stamps", get(list_own_stamps).post(post_stamp))
        .route("/{company}/stamps/{staff_id}", get(list_staff_stamps))
        .route("/token/reissue/{company}", post(reissue_token))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn success(response: Value) -> Json<Value> {
    Json(json!({ "success": true, "response": response, "errors": [] }))
}

fn failure(code: &str, message: &str) -> Json<Value> {
    Json(json!({
        "success": false,
        "response": {},
        "errors": [{ "code": code, "message": message }],
    }))
}

fn authorize(store: &Store, company: &str, token: &str) -> Result<(), Json<Value>> {
    if company != COMPANY_CODE {
        tracing::warn!(company, "unknown company");
        return Err(failure("E0001", "unknown company"));
    }
    if token != store.token {
        tracing::warn!(company, "invalid token");
        return Err(failure("E0002", "invalid token"));
    }
    Ok(())
}

async fn list_staffs(
    State(db): State<Db>,
    Path(company): Path<String>,
    Query(query): Query<StaffQuery>,
) -> Json<Value> {
    let store = db.read().await;
    if let Err(rejected) = authorize(&store, &company, &query.token) {
        return rejected;
    }
    if query.target.is_some() && query.page.is_none() {
        return failure("E0003", "page is required with target");
    }

    let page = query.page.unwrap_or(1).max(1);
    let staffs: Vec<Value> = store
        .staffs
        .iter()
        .skip((page - 1).saturating_mul(PAGE_SIZE))
        .take(PAGE_SIZE)
        .cloned()
        .collect();
    success(json!({
        "login_company_code": COMPANY_CODE,
        "Count": staffs.len(),
        "TotalCount": store.staffs.len(),
        "staffs": staffs,
    }))
}

async fn get_staff(
    State(db): State<Db>,
    Path((company, staff_id)): Path<(String, i64)>,
    Query(query): Query<StaffQuery>,
) -> Json<Value> {
    let store = db.read().await;
    if let Err(rejected) = authorize(&store, &company, &query.token) {
        return rejected;
    }
    match store.staffs.iter().find(|s| s["staffId"] == staff_id) {
        Some(staff) => success(json!({
            "login_company_code": COMPANY_CODE,
            "Count": 1,
            "TotalCount": 1,
            "staffs": [staff],
        })),
        None => failure("E0404", "staff not found"),
    }
}

async fn list_own_stamps(
    State(db): State<Db>,
    Path(company): Path<String>,
    Query(query): Query<StampQuery>,
) -> Json<Value> {
    stamps_for(&db, &company, TOKEN_OWNER, &query).await
}

async fn list_staff_stamps(
    State(db): State<Db>,
    Path((company, staff_id)): Path<(String, i64)>,
    Query(query): Query<StampQuery>,
) -> Json<Value> {
    stamps_for(&db, &company, staff_id, &query).await
}

async fn stamps_for(db: &Db, company: &str, staff_id: i64, query: &StampQuery) -> Json<Value> {
    let store = db.read().await;
    if let Err(rejected) = authorize(&store, company, &query.token) {
        return rejected;
    }
    let (Some(start), Some(end)) = (&query.start_date, &query.end_date) else {
        return failure("E0003", "start_date and end_date are required");
    };

    let stamps: Vec<Value> = store
        .stamps
        .iter()
        .filter(|s| s.staff_id == staff_id)
        .filter(|s| {
            let at = digits(&s.stamped_at);
            at.as_str() >= start.as_str() && at.as_str() <= end.as_str()
        })
        .map(|s| {
            json!({
                "stamped_at": s.stamped_at,
                "type": s.stamp_type,
                "local_time": null,
                "timezone": s.timezone,
                "attributes": { "method": 1, "org_id": 10, "workplace_id": 0, "latitude": 0.0, "longitude": 0.0, "ip": "127.0.0.1" },
            })
        })
        .collect();
    success(json!({
        "login_company_code": COMPANY_CODE,
        "staff_id": staff_id,
        "count": stamps.len(),
        "stamps": stamps,
    }))
}

async fn post_stamp(
    State(db): State<Db>,
    Path(company): Path<String>,
    Json(input): Json<PostStamp>,
) -> Json<Value> {
    let mut store = db.write().await;
    if let Err(rejected) = authorize(&store, &company, &input.token) {
        return rejected;
    }

    // Without an explicit type the server toggles between clock-in and clock-out.
    let stamp_type = input.stamp_type.unwrap_or_else(|| {
        let last = store.stamps.iter().rev().find(|s| s.staff_id == TOKEN_OWNER);
        match last.map(|s| s.stamp_type) {
            Some(11) => 12,
            _ => 11,
        }
    });
    let stamped_at = match input.stamped_at.as_deref() {
        None => wire_time(OffsetDateTime::now_utc()),
        Some(literal) => match OffsetDateTime::parse(literal, &Rfc3339) {
            Ok(at) => wire_time(at),
            Err(_) => {
                tracing::warn!(literal, "unparseable stampedAt");
                return failure("E0003", "stampedAt must be RFC 3339");
            }
        },
    };
    let stamp = StoredStamp {
        staff_id: TOKEN_OWNER,
        stamped_at,
        stamp_type,
        timezone: input.timezone.unwrap_or_else(|| "+09:00".to_string()),
    };
    let response = json!({
        "login_company_code": COMPANY_CODE,
        "staff_id": stamp.staff_id,
        "type": stamp.stamp_type,
        "stampedAt": stamp.stamped_at,
    });
    store.stamps.push(stamp);
    success(response)
}

async fn reissue_token(
    State(db): State<Db>,
    Path(company): Path<String>,
    Json(input): Json<ReissueToken>,
) -> Json<Value> {
    let mut store = db.write().await;
    if let Err(rejected) = authorize(&store, &company, &input.token) {
        return rejected;
    }
    store.reissued += 1;
    store.token = format!("reissued-{}", store.reissued);
    success(json!({
        "login_company_code": COMPANY_CODE,
        "staff_id": TOKEN_OWNER,
        "agency_manager_id": 0,
        "token": store.token,
        "expired_at": wire_time(OffsetDateTime::now_utc() + Duration::days(180)),
    }))
}

/// Wall-clock fields in `YYYY/MM/DD HH:MM:SS`; the offset is dropped.
fn wire_time(at: OffsetDateTime) -> String {
    at.format(WIRE_TIME).unwrap_or_default()
}

fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

fn seed_staffs() -> Vec<Value> {
    let sales = json!({ "organizationId": 10, "name": "Sales" });
    vec![
        json!({
            "staffId": 1, "lastName": "山田", "firstName": "太郎",
            "lastNameKana": "ヤマダ", "firstNameKana": "タロウ",
            "organization": sales, "subgroups": [],
            "employmentCategory": { "employmentCategoryId": 1, "Name": "正社員" },
            "tag": "", "staffNum": "0001", "idmNum": "", "cardTypeId": 0, "remarks": "",
            "permissionGroup": { "permissionGroupId": 1, "permissionType": 1, "name": "企業管理者" },
            "managedOrganizations": [sales],
        }),
        json!({
            "staffId": 2, "lastName": "佐藤", "firstName": "花子",
            "lastNameKana": "サトウ", "firstNameKana": "ハナコ",
            "organization": sales, "subgroups": [{ "organizationId": 11, "name": "East" }],
            "employmentCategory": { "employmentCategoryId": 2, "Name": "パート" },
            "tag": "", "staffNum": "0002", "idmNum": "", "cardTypeId": 0, "remarks": "",
            "permissionGroup": { "permissionGroupId": 3, "permissionType": 3, "name": "従業員" },
            "managedOrganizations": [],
        }),
        json!({
            "staffId": 3, "lastName": "鈴木", "firstName": "一郎",
            "lastNameKana": "スズキ", "firstNameKana": "イチロウ",
            "organization": sales, "subgroups": [],
            "employmentCategory": { "employmentCategoryId": 1, "Name": "正社員" },
            "tag": "", "staffNum": "0003", "idmNum": "", "cardTypeId": 0, "remarks": "",
            "permissionGroup": { "permissionGroupId": 3, "permissionType": 3, "name": "従業員" },
            "managedOrganizations": [],
        }),
    ]
}

fn seed_stamps() -> Vec<StoredStamp> {
    let stamp = |staff_id, stamped_at: &str, stamp_type| StoredStamp {
        staff_id,
        stamped_at: stamped_at.to_string(),
        stamp_type,
        timezone: "+09:00".to_string(),
    };
    vec![
        stamp(1, "2000/01/02 09:00:00", 11),
        stamp(1, "2000/01/02 18:00:00", 12),
        stamp(2, "2000/01/03 09:30:00", 11),
        stamp(1, "2000/03/01 09:00:00", 11),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_time_is_zero_padded() {
        let at = time::macros::datetime!(2000-01-02 03:04:05 UTC);
        assert_eq!(wire_time(at), "2000/01/02 03:04:05");
    }

    #[test]
    fn wire_time_keeps_wall_clock_of_the_offset() {
        let at = time::macros::datetime!(2000-01-02 23:30:00 +09:00);
        assert_eq!(wire_time(at), "2000/01/02 23:30:00");
    }

    #[test]
    fn digits_strip_separators() {
        assert_eq!(digits("2000/01/02 03:04:05"), "20000102030405");
    }

    #[test]
    fn seeded_staff_ids_are_unique() {
        let store = Store::default();
        let mut ids: Vec<i64> = store.staffs.iter().filter_map(|s| s["staffId"].as_i64()).collect();
        assert_eq!(ids.len(), store.staffs.len());
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), store.staffs.len());
    }

    #[test]
    fn post_stamp_body_fields_are_optional() {
        let input: PostStamp = serde_json::from_str(r#"{"token":"bar"}"#).unwrap();
        assert_eq!(input.token, "bar");
        assert!(input.stamp_type.is_none());
        assert!(input.stamped_at.is_none());
        assert!(input.timezone.is_none());
    }

    #[test]
    fn post_stamp_body_uses_wire_names() {
        let input: PostStamp =
            serde_json::from_str(r#"{"token":"bar","type":12,"stampedAt":"2000-01-02T18:00:00+09:00"}"#)
                .unwrap();
        assert_eq!(input.stamp_type, Some(12));
        assert_eq!(input.stamped_at.as_deref(), Some("2000-01-02T18:00:00+09:00"));
    }
}
