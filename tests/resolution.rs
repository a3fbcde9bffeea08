//! Resolution behavior of the dashboard's route table.

use std::sync::Arc;
use std::time::Duration;

use route_resolver::config::ResolverSettings;
use route_resolver::routing::ResolutionSummary;
use route_resolver::{FeatureArea, Resolution, RoutingError};

mod common;
use common::Mode;

fn fast(_: FeatureArea) -> (Duration, Mode) {
    (Duration::ZERO, Mode::Ok)
}

#[tokio::test]
async fn test_root_redirects_then_activates_dashboard() {
    let resolver = common::app_resolver();

    let first = resolver.resolve("").await.unwrap();
    let target = match first {
        Resolution::Redirected { target } => target,
        other => panic!("expected redirect, got {:?}", other.summary()),
    };
    assert_eq!(target, "/dashboard");

    let second = resolver.resolve(&target).await.unwrap();
    assert_eq!(
        second.summary(),
        ResolutionSummary::Activated {
            module: FeatureArea::Dashboard.key(),
            remaining: String::new(),
        }
    );
}

#[tokio::test]
async fn test_sub_path_is_preserved() {
    let resolver = common::app_resolver();
    let resolution = resolver.resolve("/leads/123").await.unwrap();
    assert_eq!(
        resolution.summary(),
        ResolutionSummary::Activated {
            module: FeatureArea::Leads.key(),
            remaining: "/123".into(),
        }
    );
}

#[tokio::test]
async fn test_unmatched_paths_end_at_dashboard() {
    let resolver = common::app_resolver();
    let dashboard = resolver.resolve_following("/dashboard").await.unwrap();

    for path in ["/nope", "/leadsX", "/finance/2024/q1", "LEADS", "/%20"] {
        let resolution = resolver.resolve_following(path).await.unwrap();
        assert_eq!(resolution.summary(), dashboard.summary(), "path {}", path);
    }
}

#[tokio::test]
async fn test_concurrent_resolutions_load_once() {
    let (resolver, counts) = common::instrumented_app(ResolverSettings::default(), |_| {
        (Duration::from_millis(50), Mode::Ok)
    });
    let resolver = Arc::new(resolver);

    let a = tokio::spawn({
        let resolver = resolver.clone();
        async move { resolver.resolve("/students").await }
    });
    let b = tokio::spawn({
        let resolver = resolver.clone();
        async move { resolver.resolve("/students").await }
    });

    let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
    match (a, b) {
        (Resolution::Activated { module: m1, .. }, Resolution::Activated { module: m2, .. }) => {
            assert!(Arc::ptr_eq(&m1, &m2));
        }
        _ => panic!("both resolutions should activate the students module"),
    }
    assert_eq!(counts.get(FeatureArea::Students), 1);
}

#[tokio::test]
async fn test_repeat_resolution_uses_cached_handle() {
    let (resolver, counts) = common::instrumented_app(ResolverSettings::default(), fast);

    let first = resolver.resolve("/placements").await.unwrap();
    let second = resolver.resolve("/placements").await.unwrap();

    match (first, second) {
        (Resolution::Activated { module: m1, .. }, Resolution::Activated { module: m2, .. }) => {
            assert!(Arc::ptr_eq(&m1, &m2));
        }
        _ => panic!("expected activations"),
    }
    assert_eq!(counts.get(FeatureArea::Placements), 1);
    assert_eq!(counts.total(), 1);
}

#[tokio::test]
async fn test_different_modules_load_independently() {
    let (resolver, counts) = common::instrumented_app(ResolverSettings::default(), |area| {
        match area {
            FeatureArea::Reports => (Duration::from_millis(100), Mode::Ok),
            _ => (Duration::ZERO, Mode::Ok),
        }
    });

    let (reports, batches) = tokio::join!(resolver.resolve("/reports"), resolver.resolve("/batches"));
    assert!(reports.is_ok());
    assert!(batches.is_ok());
    assert_eq!(counts.get(FeatureArea::Reports), 1);
    assert_eq!(counts.get(FeatureArea::Batches), 1);
    assert_eq!(
        resolver.cache().loaded_modules(),
        vec![FeatureArea::Batches.key(), FeatureArea::Reports.key()]
    );
}

#[tokio::test]
async fn test_load_failure_is_not_a_fallback() {
    let (resolver, counts) = common::instrumented_app(ResolverSettings::default(), |area| {
        match area {
            FeatureArea::Employees => (Duration::ZERO, Mode::Fail),
            _ => (Duration::ZERO, Mode::Ok),
        }
    });

    let err = resolver.resolve("/employees/list").await.unwrap_err();
    match &err {
        RoutingError::ModuleLoadFailed { path, .. } => assert_eq!(path, "/employees/list"),
        other => panic!("expected load failure, got {}", other),
    }
    assert!(err.is_retryable());
    // The catch-all target was never loaded
    assert_eq!(counts.get(FeatureArea::Dashboard), 0);

    // No automatic retry, but the next request tries again
    assert_eq!(counts.get(FeatureArea::Employees), 1);
    assert!(resolver.resolve("/employees").await.is_err());
    assert_eq!(counts.get(FeatureArea::Employees), 2);
}

#[tokio::test(start_paused = true)]
async fn test_load_timeout() {
    let settings = ResolverSettings {
        load_timeout_secs: 1,
        ..ResolverSettings::default()
    };
    let (resolver, _) = common::instrumented_app(settings, |area| match area {
        FeatureArea::Auth => (Duration::from_secs(5), Mode::Ok),
        _ => (Duration::ZERO, Mode::Ok),
    });

    match resolver.resolve("/auth/login").await {
        Err(RoutingError::ModuleLoadTimeout { path, timeout }) => {
            assert_eq!(path, "/auth/login");
            assert_eq!(timeout, Duration::from_secs(1));
        }
        other => panic!("expected timeout, got {:?}", other.map(|r| r.summary())),
    }
    assert!(!resolver.cache().is_loaded(&FeatureArea::Auth.key()));
}
