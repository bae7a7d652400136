//! Property tests for the tiered resolution policy and screen mapping.

use proptest::prelude::*;

use showcase_core::{
    resolve, resolve_with_fallback, screen_for, FetchError, FetchState, Project, Screen, Source,
};

fn project_list() -> impl Strategy<Value = Vec<Project>> {
    proptest::collection::btree_set("[a-z][a-z0-9-]{0,11}", 0..6).prop_map(|slugs| {
        slugs
            .into_iter()
            .map(|slug| Project::new(slug.clone(), slug, ""))
            .collect()
    })
}

fn non_empty_list() -> impl Strategy<Value = Vec<Project>> {
    project_list().prop_filter("fallback is never empty", |l| !l.is_empty())
}

fn failure() -> FetchState {
    FetchState::Failed(FetchError::Transport {
        url: "http://localhost:5000/projects".to_string(),
        message: "connection refused".to_string(),
    })
}

fn any_fetch_state() -> impl Strategy<Value = FetchState> {
    prop_oneof![
        Just(FetchState::Idle),
        Just(FetchState::Pending),
        project_list().prop_map(FetchState::Succeeded),
        Just(failure()),
    ]
}

proptest! {
    #[test]
    fn success_always_wins(
        fetched in project_list(),
        cached in proptest::option::of(project_list()),
        fallback in non_empty_list(),
        online in any::<bool>(),
    ) {
        let fetch = FetchState::Succeeded(fetched.clone());
        let view = resolve_with_fallback(&fetch, cached.as_deref(), &fallback, online);
        prop_assert_eq!(view.source, Source::Network);
        prop_assert_eq!(view.projects, fetched);
        prop_assert!(!view.degraded);
    }

    #[test]
    fn failure_with_cache_shows_cache_degraded(
        cached in project_list(),
        fallback in non_empty_list(),
        online in any::<bool>(),
    ) {
        let view = resolve_with_fallback(&failure(), Some(cached.as_slice()), &fallback, online);
        prop_assert_eq!(view.source, Source::Cache);
        prop_assert_eq!(view.projects, cached);
        prop_assert!(view.degraded);
    }

    #[test]
    fn failure_without_cache_shows_fallback_degraded(
        fallback in non_empty_list(),
        online in any::<bool>(),
    ) {
        let view = resolve_with_fallback(&failure(), None, &fallback, online);
        prop_assert_eq!(view.source, Source::Fallback);
        prop_assert_eq!(view.projects, fallback);
        prop_assert!(view.degraded);
    }

    #[test]
    fn degraded_implies_not_network(
        fetch in any_fetch_state(),
        cached in proptest::option::of(project_list()),
        online in any::<bool>(),
    ) {
        let view = resolve(&fetch, cached.as_deref(), online);
        if view.degraded {
            prop_assert_ne!(view.source, Source::Network);
            prop_assert!(!online || fetch.is_failed());
        }
    }

    #[test]
    fn settled_fetch_never_shows_loading(
        fetched in project_list(),
        cached in proptest::option::of(project_list()),
        online in any::<bool>(),
        dismissed in any::<bool>(),
    ) {
        for fetch in [FetchState::Succeeded(fetched.clone()), failure()] {
            let screen = screen_for(&fetch, cached.as_deref(), online, dismissed);
            prop_assert!(!screen.is_loading());
        }
    }

    #[test]
    fn unsettled_fetch_loads_only_online_without_cache(
        cached in proptest::option::of(project_list()),
        online in any::<bool>(),
    ) {
        let screen = screen_for(&FetchState::Pending, cached.as_deref(), online, false);
        prop_assert_eq!(screen == Screen::Loading, cached.is_none() && online);
        if let Some(view) = screen.view() {
            prop_assert_eq!(screen.is_degraded(), view.degraded);
        }
    }
}
