use crate::infra::{IdentityGrant, MarketplaceSnapshot};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use splitfee::access::{AccessScope, CallerIdentity};
use splitfee::config::AppConfig;
use splitfee::error::AppError;
use splitfee::stats::{
    ApplicationId, ApplicationRecord, ApplicationStage, CandidateId, OrganizationId, Placement,
    PlacementId, PlacementState, RecruiterId, RoleId, RoleRecord, RoleStatus, StatsParams,
    StatsService,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEMO_PERSONAS: [(&str, &str); 4] = [
    ("demo-recruiter", "recruiter"),
    ("demo-candidate", "candidate"),
    ("demo-company", "company"),
    ("demo-admin", "platform"),
];

#[derive(Args, Debug)]
pub(crate) struct StatsArgs {
    /// Caller token to resolve (see `demo` for the built-in personas)
    #[arg(long)]
    pub(crate) token: String,
    /// recruiter | candidate | company | platform (alias: admin)
    #[arg(long)]
    pub(crate) scope: Option<String>,
    /// ytd, or <n>d / <n>w / <n>m
    #[arg(long)]
    pub(crate) range: Option<String>,
    /// Marketplace snapshot JSON; overrides APP_SEED_PATH
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Range token applied to every persona
    #[arg(long)]
    pub(crate) range: Option<String>,
}

/// Load the configured snapshot, or the demo marketplace when none is configured.
pub(crate) fn load_snapshot(seed: Option<&Path>) -> Result<MarketplaceSnapshot, AppError> {
    match seed {
        Some(path) => MarketplaceSnapshot::from_path(path),
        None => Ok(demo_snapshot(Utc::now())),
    }
}

pub(crate) async fn run_stats(args: StatsArgs) -> Result<(), AppError> {
    let StatsArgs {
        token,
        scope,
        range,
        seed,
    } = args;

    let seed = match seed {
        Some(path) => Some(path),
        None => AppConfig::load()?.dataset.seed_path,
    };
    let (resolver, store) = load_snapshot(seed.as_deref())?.into_collaborators();
    let service = StatsService::new(Arc::new(resolver), Arc::new(store));
    let params = StatsParams {
        scope,
        kind: None,
        range,
    };

    let response = service
        .get_stats(&CallerIdentity::new(token), &params)
        .await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (resolver, store) = demo_snapshot(Utc::now()).into_collaborators();
    let service = StatsService::new(Arc::new(resolver), Arc::new(store));

    println!("Split-fee marketplace metrics demo");
    for (token, scope) in DEMO_PERSONAS {
        let params = StatsParams {
            scope: Some(scope.to_string()),
            kind: None,
            range: args.range.clone(),
        };
        let response = service
            .get_stats(&CallerIdentity::new(token), &params)
            .await?;
        println!("\n== {scope} ({token})");
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

fn access(user: &str) -> AccessScope {
    AccessScope {
        identity_user_id: user.to_string(),
        recruiter_id: None,
        candidate_id: None,
        organization_ids: BTreeSet::new(),
        is_platform_admin: false,
    }
}

/// Small marketplace anchored on `now` so every dashboard figure is non-trivial.
pub(crate) fn demo_snapshot(now: DateTime<Utc>) -> MarketplaceSnapshot {
    let recruiter = RecruiterId("rec-ada".to_string());
    let acme = OrganizationId("org-acme".to_string());
    let globex = OrganizationId("org-globex".to_string());

    let mut recruiter_access = access("user-ada");
    recruiter_access.recruiter_id = Some(recruiter.clone());
    let mut candidate_access = access("user-lin");
    candidate_access.candidate_id = Some(CandidateId("cand-lin".to_string()));
    let mut company_access = access("user-acme-hr");
    company_access.organization_ids.insert(acme.clone());
    let mut admin_access = access("user-ops");
    admin_access.is_platform_admin = true;

    let identities = [
        ("demo-recruiter", recruiter_access),
        ("demo-candidate", candidate_access),
        ("demo-company", company_access),
        ("demo-admin", admin_access),
    ]
    .into_iter()
    .map(|(token, access)| IdentityGrant {
        token: token.to_string(),
        access,
    })
    .collect();

    let roles = vec![
        RoleRecord {
            id: RoleId("role-backend".to_string()),
            organization_id: acme.clone(),
            recruiter_id: Some(recruiter.clone()),
            status: RoleStatus::Active,
        },
        RoleRecord {
            id: RoleId("role-design".to_string()),
            organization_id: acme.clone(),
            recruiter_id: Some(recruiter.clone()),
            status: RoleStatus::Open,
        },
        RoleRecord {
            id: RoleId("role-sales".to_string()),
            organization_id: globex.clone(),
            recruiter_id: None,
            status: RoleStatus::Paused,
        },
    ];

    let submission = |id: &str, candidate: &str, stage: ApplicationStage, days_ago: i64| {
        ApplicationRecord {
            id: ApplicationId(id.to_string()),
            role_id: RoleId("role-backend".to_string()),
            organization_id: acme.clone(),
            recruiter_id: recruiter.clone(),
            candidate_id: CandidateId(candidate.to_string()),
            stage,
            submitted_at: now - Duration::days(days_ago),
        }
    };
    let applications = vec![
        submission("app-1", "cand-lin", ApplicationStage::Interview, 4),
        submission("app-2", "cand-sam", ApplicationStage::Screen, 9),
        submission("app-3", "cand-ray", ApplicationStage::Offer, 15),
        submission("app-4", "cand-lin", ApplicationStage::Rejected, 60),
    ];

    let placement = |id: &str,
                     organization: &OrganizationId,
                     hired_days_ago: Option<i64>,
                     recruiter_share: u64,
                     state: PlacementState,
                     guarantee_days: Option<i64>| Placement {
        id: PlacementId(id.to_string()),
        recruiter_id: recruiter.clone(),
        organization_id: organization.clone(),
        candidate_id: CandidateId(format!("cand-{id}")),
        hired_at: hired_days_ago.map(|days| now - Duration::days(days)),
        fee_amount: recruiter_share * 2,
        recruiter_share,
        platform_share: recruiter_share,
        state,
        guarantee_expires_at: guarantee_days.map(|days| now + Duration::days(days)),
    };
    let placements = vec![
        placement("p1", &acme, Some(2), 9000, PlacementState::Active, Some(88)),
        placement("p2", &acme, Some(70), 7500, PlacementState::Settled, Some(20)),
        placement("p3", &globex, Some(150), 6000, PlacementState::Completed, Some(-60)),
        placement("p4", &acme, None, 4000, PlacementState::Active, None),
    ];

    MarketplaceSnapshot {
        identities,
        roles,
        applications,
        placements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitfee::stats::{RecruiterMetrics, ScopedMetrics};

    #[tokio::test]
    async fn demo_personas_all_resolve() {
        let now = Utc::now();
        let (resolver, store) = demo_snapshot(now).into_collaborators();
        let service = StatsService::new(Arc::new(resolver), Arc::new(store));

        for (token, scope) in DEMO_PERSONAS {
            let params = StatsParams {
                scope: Some(scope.to_string()),
                kind: None,
                range: None,
            };
            let response = service
                .get_stats_at(&CallerIdentity::new(token), &params, now)
                .await
                .expect("demo persona resolves");
            assert_eq!(response.scope.label(), scope);
        }
    }

    #[tokio::test]
    async fn demo_recruiter_has_pending_payouts() {
        let now = Utc::now();
        let (resolver, store) = demo_snapshot(now).into_collaborators();
        let service = StatsService::new(Arc::new(resolver), Arc::new(store));

        let response = service
            .get_stats_at(
                &CallerIdentity::new("demo-recruiter"),
                &StatsParams::default(),
                now,
            )
            .await
            .expect("recruiter stats");

        match response.metrics {
            ScopedMetrics::Recruiter(RecruiterMetrics {
                active_roles,
                pending_payouts,
                ..
            }) => {
                assert_eq!(active_roles, 2);
                assert_eq!(pending_payouts, 9000 + 7500 + 4000);
            }
            other => panic!("expected recruiter metrics, got {other:?}"),
        }
    }
}
