//! Backfill pipeline - select blank links, fetch metadata, write back.
//!
//! Candidates are processed strictly one at a time with a fixed pause in
//! between, so a batch never fans out against third-party hosts. A failure
//! on one link is recorded and the batch moves on; only candidate selection
//! and cancellation abort a run.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{BackfillError, BackfillResult};
use crate::traits::{
    extractor::MetadataExtractor,
    store::{LinkQuery, LinkStore},
};
use crate::types::{
    config::{BackfillConfig, BackfillOptions},
    link::{LinkRecord, LinkUpdate},
    metadata::PageMetadata,
    outcome::{BatchOutcome, LinkDetail},
};

/// Terminal state of one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Extraction or write failed
    Failed(String),

    /// Update written to the store
    Written(LinkDetail),

    /// Nothing worth writing
    Unchanged,
}

/// Run one backfill batch.
///
/// With `options.link_id` set, exactly that link is processed whatever its
/// title. Otherwise up to `options.limit` (default `config.default_limit`)
/// blank-title links are processed newest-first.
///
/// Cancelling `cancel` aborts any in-flight fetch or write and discards the
/// partial report. Links already written stay written.
pub async fn backfill_links<S, E>(
    store: &S,
    extractor: &E,
    options: &BackfillOptions,
    config: &BackfillConfig,
    cancel: &CancellationToken,
) -> BackfillResult<BatchOutcome>
where
    S: LinkStore + ?Sized,
    E: MetadataExtractor + ?Sized,
{
    let candidates = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(BackfillError::Cancelled),
        candidates = select_candidates(store, options, config) => candidates?,
    };

    let mut outcome = BatchOutcome::new();
    if candidates.is_empty() {
        info!("No links need metadata");
        return Ok(outcome);
    }

    let total = candidates.len();
    for (index, link) in candidates.iter().enumerate() {
        debug!(link_id = link.id, url = %link.url, "Processing link");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BackfillError::Cancelled),
            result = process_candidate(store, extractor, link) => result,
        };

        match result {
            CandidateOutcome::Failed(message) => {
                outcome.record_failure(link.id, &link.url, message)
            }
            CandidateOutcome::Written(detail) => outcome.record_update(detail),
            CandidateOutcome::Unchanged => outcome.record_unchanged(link.id, &link.url),
        }

        // Pace outbound fetches; no pause after the last candidate
        if index + 1 < total && !config.delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BackfillError::Cancelled),
                _ = tokio::time::sleep(config.delay) => {}
            }
        }
    }

    info!(
        processed = outcome.processed,
        updated = outcome.updated,
        errors = outcome.errors.len(),
        "Backfill complete"
    );

    Ok(outcome)
}

/// Load the links this run should process.
async fn select_candidates<S>(
    store: &S,
    options: &BackfillOptions,
    config: &BackfillConfig,
) -> BackfillResult<Vec<LinkRecord>>
where
    S: LinkStore + ?Sized,
{
    if let Some(link_id) = options.link_id {
        // Caller-directed: processed even when the title is already set
        let links = store
            .select(&LinkQuery::by_id(link_id))
            .await
            .map_err(BackfillError::Selection)?;
        debug!(link_id, found = links.len(), "Selected link by id");
        return Ok(links);
    }

    let limit = options.limit.unwrap_or(config.default_limit);
    let links = store
        .select(&LinkQuery::blank_titles(limit))
        .await
        .map_err(BackfillError::Selection)?;
    let found = links.len();

    // The store predicate misses whitespace-only titles
    let candidates: Vec<LinkRecord> = links
        .into_iter()
        .filter(LinkRecord::needs_metadata)
        .collect();

    debug!(
        found,
        candidates = candidates.len(),
        limit,
        "Selected links with blank titles"
    );

    Ok(candidates)
}

/// Fetch, merge and write one link. Never fails; failures are folded into
/// the returned outcome.
pub async fn process_candidate<S, E>(
    store: &S,
    extractor: &E,
    link: &LinkRecord,
) -> CandidateOutcome
where
    S: LinkStore + ?Sized,
    E: MetadataExtractor + ?Sized,
{
    let metadata = match extractor.extract(&link.url).await {
        Ok(metadata) => metadata,
        Err(e) if e.is_policy_violation() => {
            debug!(link_id = link.id, url = %link.url, error = %e, "URL rejected by policy");
            return CandidateOutcome::Failed(e.to_string());
        }
        Err(e) => {
            warn!(link_id = link.id, url = %link.url, error = %e, "Metadata fetch failed");
            return CandidateOutcome::Failed(e.to_string());
        }
    };

    debug!(
        link_id = link.id,
        title = metadata.title.as_deref().map(preview).unwrap_or("null"),
        description = metadata.description.as_deref().map(preview).unwrap_or("null"),
        "Metadata extracted"
    );

    let Some(update) = build_update(link, &metadata) else {
        debug!(link_id = link.id, "No metadata to update");
        return CandidateOutcome::Unchanged;
    };

    // A write that matches no row is reported as NotFound rather than counted
    // as updated, unlike a bare PostgREST `.update().eq()`
    match store.update_by_id(link.id, &update).await {
        Ok(_) => {
            info!(link_id = link.id, "Link updated");
            CandidateOutcome::Written(LinkDetail {
                id: link.id,
                url: link.url.clone(),
                title: update.title,
                summary: update.summary,
            })
        }
        Err(e) => {
            warn!(link_id = link.id, error = %e, "Link update failed");
            CandidateOutcome::Failed(e.to_string())
        }
    }
}

/// Merge extracted metadata into an update payload.
///
/// Title is set whenever one was extracted. Summary is only filled when the
/// link has none; an existing summary is never overwritten. Returns `None`
/// when there is nothing to write.
pub fn build_update(link: &LinkRecord, metadata: &PageMetadata) -> Option<LinkUpdate> {
    let title = metadata.usable_title().map(str::to_string);
    let summary = metadata
        .usable_description()
        .filter(|_| link.summary_is_blank())
        .map(str::to_string);

    let update = LinkUpdate {
        title,
        summary,
        updated_at: Utc::now(),
    };

    (!update.is_noop()).then_some(update)
}

fn preview(s: &str) -> &str {
    match s.char_indices().nth(60) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, StoreError};
    use crate::stores::MemoryLinkStore;
    use crate::testing::MockExtractor;
    use crate::traits::store::MockLinkStore;
    use chrono::Duration as ChronoDuration;
    use proptest::prelude::*;
    use std::time::Duration;

    fn meta(title: Option<&str>, description: Option<&str>) -> PageMetadata {
        PageMetadata::new(title.map(String::from), description.map(String::from))
    }

    fn no_delay() -> BackfillConfig {
        BackfillConfig::default().with_delay(Duration::ZERO)
    }

    #[test]
    fn test_build_update_sets_both_when_blank() {
        let link = LinkRecord::new(1, "https://a.com");
        let update = build_update(&link, &meta(Some("A"), Some("desc"))).unwrap();
        assert_eq!(update.title.as_deref(), Some("A"));
        assert_eq!(update.summary.as_deref(), Some("desc"));
    }

    #[test]
    fn test_build_update_never_overwrites_summary() {
        let link = LinkRecord::new(1, "https://a.com").with_summary("hand written");
        let update = build_update(&link, &meta(Some("A"), Some("scraped"))).unwrap();
        assert_eq!(update.title.as_deref(), Some("A"));
        assert_eq!(update.summary, None);
    }

    #[test]
    fn test_build_update_whitespace_summary_is_blank() {
        let link = LinkRecord::new(1, "https://a.com").with_summary("  ");
        let update = build_update(&link, &meta(None, Some("scraped"))).unwrap();
        assert_eq!(update.title, None);
        assert_eq!(update.summary.as_deref(), Some("scraped"));
    }

    #[test]
    fn test_build_update_noop() {
        let link = LinkRecord::new(1, "https://a.com").with_summary("kept");
        assert!(build_update(&link, &meta(None, Some("ignored"))).is_none());
        assert!(build_update(&link, &meta(None, None)).is_none());
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let store =
            MemoryLinkStore::new().with_link(LinkRecord::new(1, "https://a.com").with_title("Set"));
        let extractor = MockExtractor::new();

        let outcome = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::default(),
            &no_delay(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(outcome.is_empty());
        assert_eq!(outcome.updated, 0);
        assert!(outcome.errors.is_empty());
        assert!(extractor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_null_and_empty_titles_are_candidates_but_set_titles_are_not() {
        let now = Utc::now();
        let store = MemoryLinkStore::new()
            .with_link(LinkRecord::new(1, "https://blank.com").with_title("").with_created_at(now))
            .with_link(
                LinkRecord::new(2, "https://set.com")
                    .with_title("Set")
                    .with_created_at(now - ChronoDuration::minutes(1)),
            )
            .with_link(
                LinkRecord::new(3, "https://null.com")
                    .with_created_at(now - ChronoDuration::minutes(2)),
            );
        let extractor = MockExtractor::new();

        let outcome = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::default(),
            &no_delay(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.processed, 2);
        assert_eq!(extractor.calls(), vec!["https://blank.com", "https://null.com"]);
    }

    #[tokio::test]
    async fn test_whitespace_title_passes_application_filter() {
        let mut store = MockLinkStore::new();
        store.expect_select().times(1).returning(|_| {
            Ok(vec![
                LinkRecord::new(1, "https://spaces.com").with_title("   "),
                LinkRecord::new(2, "https://set.com").with_title("Set"),
            ])
        });
        store
            .expect_update_by_id()
            .times(1)
            .returning(|id, update| {
                let mut link = LinkRecord::new(id, "https://spaces.com");
                link.apply(update);
                Ok(link)
            });
        let extractor = MockExtractor::new();

        let outcome = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::default(),
            &no_delay(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.updated, 1);
        assert_eq!(extractor.calls(), vec!["https://spaces.com"]);
    }

    #[tokio::test]
    async fn test_link_id_overrides_blank_filter() {
        let store = MemoryLinkStore::new()
            .with_link(LinkRecord::new(5, "https://set.com").with_title("Stale title"));
        let extractor =
            MockExtractor::new().with_metadata("https://set.com", meta(Some("Fresh"), None));

        let outcome = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::for_link(5),
            &no_delay(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.updated, 1);
        assert_eq!(store.get(5).unwrap().title.as_deref(), Some("Fresh"));
    }

    #[tokio::test]
    async fn test_errors_do_not_abort_batch() {
        let now = Utc::now();
        let store = MemoryLinkStore::new()
            .with_link(LinkRecord::new(1, "ftp://bad.example").with_created_at(now))
            .with_link(
                LinkRecord::new(2, "https://good.com")
                    .with_created_at(now - ChronoDuration::seconds(1)),
            )
            .with_link(
                LinkRecord::new(3, "https://denied.com")
                    .with_created_at(now - ChronoDuration::seconds(2)),
            )
            .fail_update(3, "permission denied for table links");
        let extractor = MockExtractor::new()
            .with_error("ftp://bad.example", || ExtractionError::SchemeNotAllowed("ftp".into()))
            .with_metadata("https://good.com", meta(Some("Good"), Some("fine")))
            .with_metadata("https://denied.com", meta(Some("Denied"), None));

        let outcome = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::default(),
            &no_delay(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.processed, 3);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].id, 1);
        assert!(outcome.errors[0].message.contains("not allowed"));
        assert_eq!(outcome.errors[1].message, "permission denied for table links");
        assert_eq!(outcome.details.len(), 1);
        assert_eq!(outcome.details[0].title.as_deref(), Some("Good"));
    }

    #[tokio::test]
    async fn test_selection_failure_is_fatal() {
        let store = MemoryLinkStore::new().fail_select("relation \"links\" does not exist");
        let extractor = MockExtractor::new();

        let err = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::default(),
            &no_delay(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BackfillError::Selection(_)));
    }

    #[tokio::test]
    async fn test_noop_does_not_write() {
        let mut store = MockLinkStore::new();
        store.expect_select().returning(|_| {
            Ok(vec![LinkRecord::new(1, "https://a.com").with_summary("kept")])
        });
        store.expect_update_by_id().never();

        let extractor =
            MockExtractor::new().with_metadata("https://a.com", meta(None, Some("ignored")));

        let outcome = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::default(),
            &no_delay(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.updated, 0);
        assert!(outcome.details[0].is_unchanged());
    }

    #[tokio::test]
    async fn test_default_limit_passed_to_store() {
        let mut store = MockLinkStore::new();
        store
            .expect_select()
            .withf(|q| q.blank_title_only && q.limit == Some(20) && q.id.is_none())
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let outcome = backfill_links(
            &store,
            &MockExtractor::new(),
            &BackfillOptions::default(),
            &BackfillConfig::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_write_not_found_is_recorded() {
        let mut store = MockLinkStore::new();
        store
            .expect_select()
            .returning(|_| Ok(vec![LinkRecord::new(8, "https://gone.com")]));
        store
            .expect_update_by_id()
            .times(1)
            .returning(|id, _| Err(StoreError::NotFound { id }));

        let outcome = backfill_links(
            &store,
            &MockExtractor::new(),
            &BackfillOptions::default(),
            &no_delay(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.errors[0].message, "Link #8 not found");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_between_candidates_only() {
        let now = Utc::now();
        let store = MemoryLinkStore::new()
            .with_link(LinkRecord::new(1, "https://a.com").with_created_at(now))
            .with_link(
                LinkRecord::new(2, "https://b.com")
                    .with_created_at(now - ChronoDuration::seconds(1)),
            )
            .with_link(
                LinkRecord::new(3, "https://c.com")
                    .with_created_at(now - ChronoDuration::seconds(2)),
            );

        let start = tokio::time::Instant::now();
        let outcome = backfill_links(
            &store,
            &MockExtractor::new(),
            &BackfillOptions::default(),
            &BackfillConfig::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.processed, 3);
        // Two gaps for three candidates
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let store = MemoryLinkStore::new().with_link(LinkRecord::new(1, "https://a.com"));
        let extractor = MockExtractor::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::default(),
            &no_delay(),
            &cancel,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BackfillError::Cancelled));
        assert!(extractor.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_fetch_discards_report() {
        let now = Utc::now();
        let store = MemoryLinkStore::new()
            .with_link(LinkRecord::new(1, "https://fast.com").with_created_at(now))
            .with_link(
                LinkRecord::new(2, "https://slow.com")
                    .with_created_at(now - ChronoDuration::seconds(1)),
            );
        let extractor =
            MockExtractor::new().with_latency("https://slow.com", Duration::from_secs(60));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let err = backfill_links(
            &store,
            &extractor,
            &BackfillOptions::default(),
            &BackfillConfig::default(),
            &cancel,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BackfillError::Cancelled));
        // First link was already committed; no rollback
        assert!(store.get(1).unwrap().title.is_some());
        assert!(store.get(2).unwrap().title.is_none());
    }

    proptest! {
        #[test]
        fn processed_equals_errors_plus_details(plan in proptest::collection::vec(0u8..4, 0..12)) {
            let outcome = tokio_test::block_on(async {
                let now = Utc::now();
                let mut store = MemoryLinkStore::new();
                let mut extractor = MockExtractor::new();
                for (i, kind) in plan.iter().enumerate() {
                    let id = i as i64 + 1;
                    let url = format!("https://site{}.com", id);
                    let created_at = now - ChronoDuration::seconds(id);
                    store.insert(LinkRecord::new(id, &url).with_created_at(created_at));
                    extractor = match kind {
                        0 => extractor
                            .with_error(&url, || ExtractionError::Timeout { timeout_ms: 10_000 }),
                        1 => extractor.with_metadata(&url, meta(None, None)),
                        2 => {
                            store = store.fail_update(id, "write failed");
                            extractor
                        }
                        _ => extractor,
                    };
                }
                backfill_links(
                    &store,
                    &extractor,
                    &BackfillOptions::with_limit(plan.len()),
                    &no_delay(),
                    &CancellationToken::new(),
                )
                .await
                .unwrap()
            });

            prop_assert_eq!(outcome.processed, plan.len());
            prop_assert_eq!(outcome.processed, outcome.errors.len() + outcome.details.len());
            prop_assert!(outcome.updated <= outcome.details.len());
        }
    }
}
