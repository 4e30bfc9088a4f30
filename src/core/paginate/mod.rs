//! Pagination engine
//!
//! Drains a [`LogSource`] from a resume position. Pages are requested one at a
//! time, each starting after the last id of the previous page, until the source
//! returns an empty page. There is no page limit and no partial result: any failed
//! request aborts the whole fetch.

use crate::adapters::auth0::{LogSource, DEFAULT_PAGE_SIZE};
use crate::domain::{CheckpointId, RawLogRecord, Result};
use crate::{log_page_fetched, log_sync_start};

/// Everything fetched in one pass
#[derive(Debug, Clone)]
pub struct FetchedLogs {
    /// Records of every page, in the order received
    pub records: Vec<RawLogRecord>,
    /// Id of the last record fetched, or the start position when nothing was
    pub cursor: Option<CheckpointId>,
    /// Number of non-empty pages
    pub pages: usize,
}

impl FetchedLogs {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Sequential fetch-until-empty over a log source
pub struct Paginator<'a> {
    source: &'a dyn LogSource,
    page_size: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(source: &'a dyn LogSource) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the number of records requested per page (at least 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetches every record after `start`
    ///
    /// `None` starts at the beginning of the log. The returned cursor only ever
    /// moves to ids that were actually received, so resuming from it neither skips
    /// nor repeats records.
    ///
    /// # Errors
    ///
    /// Propagates the first page error unchanged; records fetched before it are
    /// discarded.
    pub async fn fetch_all(&self, start: Option<&CheckpointId>) -> Result<FetchedLogs> {
        log_sync_start!(start);

        let mut cursor = start.cloned();
        let mut records: Vec<RawLogRecord> = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .source
                .fetch_log_page(self.page_size, cursor.as_ref())
                .await?;

            let Some(last) = page.last() else {
                break;
            };
            cursor = Some(CheckpointId::from(&last.id));
            pages += 1;

            let page_len = page.len();
            records.extend(page);
            log_page_fetched!(pages, page_len, records.len());
        }

        tracing::info!(
            total = records.len(),
            pages,
            cursor = cursor.as_ref().map(|c| c.as_str()).unwrap_or("Start"),
            "Total logs"
        );

        Ok(FetchedLogs {
            records,
            cursor,
            pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LogId, SyncError};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::Map;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn record(id: &str) -> RawLogRecord {
        RawLogRecord {
            id: LogId::new(id).unwrap(),
            event_type: "s".to_string(),
            date: Utc::now(),
            user_agent: None,
            extra: Map::new(),
        }
    }

    /// Replays canned responses and records the `from` of each request
    struct Scripted {
        responses: Mutex<VecDeque<Result<Vec<RawLogRecord>>>>,
        requests: Mutex<Vec<(usize, Option<String>)>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Vec<RawLogRecord>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(usize, Option<String>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LogSource for Scripted {
        async fn authenticate(&self) -> Result<()> {
            Ok(())
        }

        async fn fetch_log_page(
            &self,
            take: usize,
            from: Option<&CheckpointId>,
        ) -> Result<Vec<RawLogRecord>> {
            self.requests
                .lock()
                .unwrap()
                .push((take, from.map(|c| c.to_string())));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        fn source_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_pages_are_concatenated_in_order() {
        let source = Scripted::new(vec![
            Ok(vec![record("1"), record("2")]),
            Ok(vec![record("3")]),
            Ok(vec![]),
        ]);

        let fetched = Paginator::new(&source)
            .with_page_size(2)
            .fetch_all(None)
            .await
            .unwrap();

        let ids: Vec<_> = fetched.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(fetched.cursor.unwrap().as_str(), "3");
        assert_eq!(fetched.pages, 2);
        assert_eq!(
            source.requests(),
            vec![
                (2, None),
                (2, Some("2".to_string())),
                (2, Some("3".to_string()))
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_first_page_keeps_start_cursor() {
        let source = Scripted::new(vec![Ok(vec![])]);
        let start = CheckpointId::new("A").unwrap();

        let fetched = Paginator::new(&source).fetch_all(Some(&start)).await.unwrap();

        assert!(fetched.is_empty());
        assert_eq!(fetched.cursor, Some(start));
        assert_eq!(source.requests(), vec![(200, Some("A".to_string()))]);
    }

    #[tokio::test]
    async fn test_short_page_does_not_terminate() {
        let source = Scripted::new(vec![
            Ok(vec![record("1")]),
            Ok(vec![record("2")]),
            Ok(vec![]),
        ]);

        let fetched = Paginator::new(&source).fetch_all(None).await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(source.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_error_aborts_fetch() {
        let source = Scripted::new(vec![
            Ok(vec![record("1")]),
            Err(SyncError::UpstreamFetch("503 Service Unavailable".into())),
            Ok(vec![record("2")]),
        ]);

        let err = Paginator::new(&source).fetch_all(None).await.unwrap_err();
        assert!(matches!(err, SyncError::UpstreamFetch(_)));
        assert_eq!(source.requests().len(), 2);
    }

    #[test]
    fn test_page_size_floor() {
        let source = Scripted::new(vec![]);
        assert_eq!(Paginator::new(&source).with_page_size(0).page_size(), 1);
    }
}
