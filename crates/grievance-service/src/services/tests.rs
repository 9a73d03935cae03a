//! Service tests against the in-process repositories

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use grievance_common::{IdpConfig, JwtService};
use grievance_core::lifecycle::{
    replay, LifecyclePolicy, SameStatusPolicy, Transition, TransitionPolicy,
};
use grievance_core::query::{GrievanceFilter, GrievanceScope, GrievanceStats, Page, PageRequest};
use grievance_core::traits::{GrievanceRepository, RepoResult};
use grievance_core::{Actor, Grievance, GrievanceStatus, Priority, Snowflake, StatusUpdate, Ward};
use grievance_db::{InMemoryGrievanceRepository, InMemoryWardRepository};

use super::{GrievanceService, HealthService, ServiceContext, ServiceContextBuilder, ServiceError, WardService};
use crate::dto::{
    CreateGrievanceRequest, GrievanceResponse, ListGrievancesQuery, SetPriorityRequest,
    UpdateStatusRequest,
};

fn context_with(policy: LifecyclePolicy) -> ServiceContext {
    context_over(Arc::new(InMemoryGrievanceRepository::new()), policy)
}

fn context_over(repo: Arc<dyn GrievanceRepository>, policy: LifecyclePolicy) -> ServiceContext {
    let jwt = JwtService::new(&IdpConfig {
        jwt_secret: "service-test-secret".to_string(),
        jwt_issuer: None,
        leeway_seconds: 0,
    });
    let wards = InMemoryWardRepository::new(vec![
        Ward::new(5, "Kasba Peth"),
        Ward::new(9, "Aundh").with_area("West"),
    ])
    .unwrap();

    ServiceContextBuilder::new()
        .grievance_repo(repo)
        .ward_repo(Arc::new(wards))
        .lifecycle(policy)
        .jwt_service(Arc::new(jwt))
        .build()
        .unwrap()
}

fn context() -> ServiceContext {
    context_with(LifecyclePolicy::default())
}

fn pothole() -> CreateGrievanceRequest {
    CreateGrievanceRequest {
        title: "Pothole on Main St".to_string(),
        description: "A very deep pothole damaging tires near the market".to_string(),
        category: "pothole".to_string(),
        ..Default::default()
    }
}

fn status(status: &str, remarks: Option<&str>) -> UpdateStatusRequest {
    UpdateStatusRequest {
        status: status.to_string(),
        remarks: remarks.map(str::to_string),
    }
}

fn id_of(response: &GrievanceResponse) -> Snowflake {
    Snowflake::parse(&response.id).unwrap()
}

fn violated_fields(err: &ServiceError) -> Vec<String> {
    err.details()
        .and_then(|details| details.as_array().cloned())
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v["field"].as_str().map(str::to_string))
        .collect()
}

async fn file(ctx: &ServiceContext, citizen: &Actor) -> GrievanceResponse {
    GrievanceService::new(ctx).create(citizen, pothole()).await.unwrap()
}

fn whole_micros(at: DateTime<Utc>) -> bool {
    at.nanosecond() % 1_000 == 0
}

/// Serves every `find_by_id` from a snapshot taken once, so each update
/// starts from the same (eventually stale) version
struct PinnedReads {
    inner: InMemoryGrievanceRepository,
    pinned: parking_lot::Mutex<Option<Grievance>>,
}

impl PinnedReads {
    fn new() -> Self {
        Self {
            inner: InMemoryGrievanceRepository::new(),
            pinned: parking_lot::Mutex::new(None),
        }
    }
}

#[async_trait]
impl GrievanceRepository for PinnedReads {
    async fn create(&self, created: &Transition) -> RepoResult<()> {
        self.inner.create(created).await
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Grievance>> {
        if let Some(pinned) = self.pinned.lock().clone() {
            return Ok(Some(pinned));
        }
        let found = self.inner.find_by_id(id).await?;
        *self.pinned.lock() = found.clone();
        Ok(found)
    }

    async fn list(
        &self,
        scope: &GrievanceScope,
        filter: &GrievanceFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Grievance>> {
        self.inner.list(scope, filter, page).await
    }

    async fn history(&self, grievance_id: Snowflake) -> RepoResult<Vec<StatusUpdate>> {
        self.inner.history(grievance_id).await
    }

    async fn apply_transition(&self, transition: &Transition, expected_version: i64) -> RepoResult<()> {
        self.inner.apply_transition(transition, expected_version).await
    }

    async fn save(&self, grievance: &Grievance, expected_version: i64) -> RepoResult<()> {
        self.inner.save(grievance, expected_version).await
    }

    async fn stats(&self, scope: &GrievanceScope, now: DateTime<Utc>) -> RepoResult<GrievanceStats> {
        self.inner.stats(scope, now).await
    }

    async fn ping(&self) -> RepoResult<()> {
        self.inner.ping().await
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_file_progress_resolve_scenario() {
    let ctx = context();
    let service = GrievanceService::new(&ctx);
    let u1 = Actor::citizen("u1", 5);
    let w1 = Actor::nagarasevaka("w1", 5);
    let w2 = Actor::nagarasevaka("w2", 9);

    let created = service.create(&u1, pothole()).await.unwrap();
    let id = id_of(&created);
    assert_eq!(created.status, GrievanceStatus::Open);
    assert_eq!(created.ward_id, 5);
    assert_eq!(created.created_by, "u1");
    assert_eq!(created.assigned_to, None);
    assert_eq!(created.version, 1);
    assert_eq!(service.history(&u1, id).await.unwrap().len(), 1);

    let progressed = service
        .update_status(&w1, id, status("in_progress", Some("Team dispatched")))
        .await
        .unwrap();
    assert_eq!(progressed.grievance.status, GrievanceStatus::InProgress);
    assert_eq!(progressed.grievance.assigned_to.as_deref(), Some("w1"));
    assert_eq!(progressed.status_update.old_status, Some(GrievanceStatus::Open));
    assert_eq!(service.history(&u1, id).await.unwrap().len(), 2);

    let resolved = service
        .update_status(&w1, id, status("resolved", Some("Fixed")))
        .await
        .unwrap();
    assert_eq!(resolved.grievance.status, GrievanceStatus::Resolved);
    assert_eq!(resolved.grievance.resolution_remarks.as_deref(), Some("Fixed"));
    assert!(resolved.grievance.resolved_at.is_some());
    assert_eq!(resolved.grievance.version, 3);

    let history = service.history(&u1, id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].old_status, None);
    assert_eq!(history[2].remarks.as_deref(), Some("Fixed"));

    let err = service
        .update_status(&w2, id, status("rejected", Some("not ours")))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(service.history(&u1, id).await.unwrap().len(), 3);

    let stored = ctx.grievance_repo().find_by_id(id).await.unwrap().unwrap();
    let entries = ctx.grievance_repo().history(id).await.unwrap();
    assert!(replay(&entries).unwrap().matches(&stored));
}

#[tokio::test]
async fn test_created_grievance_reads_back_identical() {
    let ctx = context();
    let service = GrievanceService::new(&ctx);
    let u1 = Actor::citizen("u1", 5);
    let w1 = Actor::nagarasevaka("w1", 5);

    let request = CreateGrievanceRequest {
        photo_url: Some("https://img.example.org/pothole.jpg".to_string()),
        latitude: Some(18.5204),
        longitude: Some(73.8567),
        ..pothole()
    };
    let created = service.create(&u1, request).await.unwrap();
    let id = id_of(&created);
    assert!(whole_micros(created.created_at));
    assert_eq!(service.get(&u1, id).await.unwrap(), created);

    let changed = service
        .update_status(&w1, id, status("resolved", Some("Patched")))
        .await
        .unwrap();
    assert!(whole_micros(changed.grievance.updated_at));
    assert_eq!(service.get(&u1, id).await.unwrap(), changed.grievance);
    assert_eq!(service.history(&u1, id).await.unwrap()[1], changed.status_update);

    let prioritized = service
        .set_priority(
            &w1,
            id,
            SetPriorityRequest {
                priority: Some("medium".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(service.get(&w1, id).await.unwrap(), prioritized);
}

#[tokio::test]
async fn test_stale_update_conflicts_without_history() {
    let ctx = context_over(Arc::new(PinnedReads::new()), LifecyclePolicy::default());
    let service = GrievanceService::new(&ctx);
    let u1 = Actor::citizen("u1", 5);
    let w1 = Actor::nagarasevaka("w1", 5);
    let id = id_of(&file(&ctx, &u1).await);

    service
        .update_status(&w1, id, status("in_progress", Some("Team dispatched")))
        .await
        .unwrap();
    let err = service
        .update_status(&w1, id, status("rejected", Some("Duplicate")))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let err = service
        .set_priority(&w1, id, SetPriorityRequest { priority: Some("high".to_string()) })
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let history = service.history(&u1, id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].new_status, GrievanceStatus::InProgress);
}

#[tokio::test]
async fn test_create_reports_every_violation() {
    let ctx = context();
    let request = CreateGrievanceRequest {
        title: "  ab ".to_string(),
        description: "too short".to_string(),
        category: "noise".to_string(),
        latitude: Some(18.5),
        ..Default::default()
    };

    let err = GrievanceService::new(&ctx)
        .create(&Actor::citizen("u1", 5), request)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    let fields = violated_fields(&err);
    for field in ["title", "description", "category"] {
        assert!(fields.iter().any(|f| f == field), "missing {field} in {fields:?}");
    }
    assert!(fields.len() >= 4);
}

#[tokio::test]
async fn test_role_checks_precede_lookup() {
    let ctx = context();
    let service = GrievanceService::new(&ctx);

    let err = service
        .create(&Actor::nagarasevaka("w1", 5), pothole())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let unknown = Snowflake::new(123_456);
    let err = service
        .update_status(&Actor::citizen("u1", 5), unknown, status("resolved", Some("done")))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let err = service
        .update_status(&Actor::nagarasevaka("w1", 5), unknown, status("resolved", Some("done")))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_citizen_without_ward_rejected() {
    let ctx = context();
    let actor = Actor {
        ward_id: None,
        ..Actor::citizen("u9", 1)
    };
    let err = GrievanceService::new(&ctx).create(&actor, pothole()).await.unwrap_err();
    assert_eq!(violated_fields(&err), vec!["ward_id".to_string()]);
}

#[tokio::test]
async fn test_remarks_and_same_status_rules() {
    let ctx = context();
    let service = GrievanceService::new(&ctx);
    let u1 = Actor::citizen("u1", 5);
    let w1 = Actor::nagarasevaka("w1", 5);
    let id = id_of(&file(&ctx, &u1).await);

    let err = service
        .update_status(&w1, id, status("in_progress", Some("   ")))
        .await
        .unwrap_err();
    assert_eq!(violated_fields(&err), vec!["remarks".to_string()]);

    let err = service.update_status(&w1, id, status("open", None)).await.unwrap_err();
    assert_eq!(violated_fields(&err), vec!["status".to_string()]);

    let err = service
        .update_status(&w1, id, status("closed", Some(&"x".repeat(501))))
        .await
        .unwrap_err();
    let fields = violated_fields(&err);
    assert!(fields.contains(&"status".to_string()));
    assert!(fields.contains(&"remarks".to_string()));

    let confirmed = service
        .update_status(&w1, id, status("open", Some("Inspection scheduled")))
        .await
        .unwrap();
    assert_eq!(confirmed.grievance.status, GrievanceStatus::Open);
    assert_eq!(confirmed.grievance.assigned_to.as_deref(), Some("w1"));
    assert_eq!(confirmed.grievance.version, 2);
    assert_eq!(service.history(&u1, id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_same_status_reject_policy() {
    let policy = LifecyclePolicy::new(TransitionPolicy::permissive(), SameStatusPolicy::Reject);
    let ctx = context_with(policy);
    let id = id_of(&file(&ctx, &Actor::citizen("u1", 5)).await);

    let err = GrievanceService::new(&ctx)
        .update_status(&Actor::nagarasevaka("w1", 5), id, status("open", Some("still open")))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_denied_transition() {
    let policy = LifecyclePolicy::new(
        TransitionPolicy::permissive_except("rejected:resolved").unwrap(),
        SameStatusPolicy::Accept,
    );
    let ctx = context_with(policy);
    let service = GrievanceService::new(&ctx);
    let w1 = Actor::nagarasevaka("w1", 5);
    let id = id_of(&file(&ctx, &Actor::citizen("u1", 5)).await);

    service
        .update_status(&w1, id, status("rejected", Some("Duplicate")))
        .await
        .unwrap();
    let err = service
        .update_status(&w1, id, status("resolved", Some("Fixed anyway")))
        .await
        .unwrap_err();
    assert_eq!(violated_fields(&err), vec!["status".to_string()]);

    service
        .update_status(&w1, id, status("open", Some("Reopened on appeal")))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reopen_clears_resolved_at_keeps_remarks() {
    let ctx = context();
    let service = GrievanceService::new(&ctx);
    let w1 = Actor::nagarasevaka("w1", 5);
    let id = id_of(&file(&ctx, &Actor::citizen("u1", 5)).await);

    service
        .update_status(&w1, id, status("resolved", Some("Patched")))
        .await
        .unwrap();
    let reopened = service
        .update_status(&w1, id, status("open", Some("Patch failed")))
        .await
        .unwrap();

    assert_eq!(reopened.grievance.resolved_at, None);
    assert_eq!(reopened.grievance.resolution_remarks.as_deref(), Some("Patched"));
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_reads_are_scoped() {
    let ctx = context();
    let service = GrievanceService::new(&ctx);
    let u1 = Actor::citizen("u1", 5);
    let u2 = Actor::citizen("u2", 5);
    let id = id_of(&file(&ctx, &u1).await);
    file(&ctx, &u2).await;

    assert_eq!(service.get(&u2, id).await.unwrap_err().status_code(), 404);
    assert_eq!(service.history(&u2, id).await.unwrap_err().status_code(), 404);
    assert!(service.get(&Actor::nagarasevaka("w1", 5), id).await.is_ok());
    assert_eq!(
        service.get(&Actor::nagarasevaka("w2", 9), id).await.unwrap_err().status_code(),
        404
    );

    let mine = service.list(&u1, ListGrievancesQuery::default()).await.unwrap();
    assert_eq!(mine.total, 1);
    let ward = service
        .list(&Actor::nagarasevaka("w1", 5), ListGrievancesQuery::default())
        .await
        .unwrap();
    assert_eq!(ward.total, 2);

    let unassigned = Actor {
        ward_id: None,
        ..Actor::nagarasevaka("w3", 1)
    };
    let nothing = service.list(&unassigned, ListGrievancesQuery::default()).await.unwrap();
    assert_eq!(nothing.total, 0);
    assert_eq!(nothing.first, 0);
}

#[tokio::test]
async fn test_list_paging_and_bad_query() {
    let ctx = context();
    let service = GrievanceService::new(&ctx);
    let u1 = Actor::citizen("u1", 5);
    for _ in 0..13 {
        file(&ctx, &u1).await;
    }

    let query = ListGrievancesQuery {
        offset: Some(10),
        ..Default::default()
    };
    let page = service.list(&u1, query).await.unwrap();
    assert_eq!(page.total, 13);
    assert_eq!(page.items.len(), 3);
    assert_eq!((page.first, page.last), (11, 13));
    assert!(!page.has_more);

    let query = ListGrievancesQuery {
        limit: Some(1000),
        ..Default::default()
    };
    assert_eq!(service.list(&u1, query).await.unwrap().limit, 100);

    let query = ListGrievancesQuery {
        status: Some("bogus".to_string()),
        sort: Some("sideways".to_string()),
        ..Default::default()
    };
    let err = service.list(&u1, query).await.unwrap_err();
    assert_eq!(violated_fields(&err), vec!["status".to_string(), "sort".to_string()]);
}

#[tokio::test]
async fn test_priority_and_stats() {
    let ctx = context();
    let service = GrievanceService::new(&ctx);
    let u1 = Actor::citizen("u1", 5);
    let w1 = Actor::nagarasevaka("w1", 5);
    let first = id_of(&file(&ctx, &u1).await);
    let second = id_of(&file(&ctx, &u1).await);

    let request = SetPriorityRequest {
        priority: Some("high".to_string()),
    };
    assert_eq!(
        service.set_priority(&u1, first, request.clone()).await.unwrap_err().status_code(),
        403
    );
    let updated = service.set_priority(&w1, first, request).await.unwrap();
    assert_eq!(updated.priority, Some(Priority::High));
    assert_eq!(updated.version, 2);
    assert_eq!(service.history(&w1, first).await.unwrap().len(), 1);

    let query = ListGrievancesQuery {
        sort: Some("priority".to_string()),
        ..Default::default()
    };
    let page = service.list(&w1, query).await.unwrap();
    assert_eq!(page.items[0].id, first.to_string());
    assert_eq!(page.items[1].id, second.to_string());

    let cleared = service
        .set_priority(&w1, first, SetPriorityRequest { priority: None })
        .await
        .unwrap();
    assert_eq!(cleared.priority, None);

    service
        .update_status(&w1, second, status("resolved", Some("Filled")))
        .await
        .unwrap();
    let stats = service.stats(&w1).await.unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.open, 1);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.created_this_week, 2);
    assert_eq!(stats.avg_resolution_days, Some(0.0));
}

// ============================================================================
// Wards and health
// ============================================================================

#[tokio::test]
async fn test_wards() {
    let ctx = context();
    let service = WardService::new(&ctx);

    let wards = service.list().await.unwrap();
    assert_eq!(wards.iter().map(|w| w.id).collect::<Vec<_>>(), vec![5, 9]);
    assert_eq!(service.get(9).await.unwrap().area_name.as_deref(), Some("West"));

    let err = service.get(42).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "UNKNOWN_WARD");
}

#[tokio::test]
async fn test_readiness() {
    let ctx = context();
    assert!(HealthService::new(&ctx).readiness().await.is_ready());
}

#[test]
fn test_builder_requires_repositories() {
    let err = ServiceContextBuilder::new().build().unwrap_err();
    assert_eq!(err.status_code(), 400);
}
