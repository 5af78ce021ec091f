use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};

/// Quiet period after the last keystroke before a search is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Input events of the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Typed(String),
    Cleared,
}

/// Fetches the list page should issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    Search(String),
    FetchAll,
}

/// Turns search box events into list fetches.
///
/// Each keystroke (re)starts the `delay` timer and only the text present when it expires
/// is searched. Clearing the box fetches the full list immediately and drops any pending
/// search. Returns when either channel closes.
pub async fn debounce_search(
    mut events: mpsc::Receiver<SearchEvent>,
    delay: Duration,
    requests: mpsc::Sender<SearchRequest>,
) {
    let mut pending: Option<String> = None;
    let timer = sleep(delay);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            event = events.recv() => {
                let request = match event {
                    Some(SearchEvent::Typed(text)) if !text.trim().is_empty() => {
                        pending = Some(text.trim().to_string());
                        timer.as_mut().reset(Instant::now() + delay);
                        continue;
                    }
                    Some(SearchEvent::Typed(_)) | Some(SearchEvent::Cleared) => {
                        pending = None;
                        SearchRequest::FetchAll
                    }
                    None => break,
                };
                if requests.send(request).await.is_err() {
                    break;
                }
            }
            () = &mut timer, if pending.is_some() => {
                if let Some(term) = pending.take() {
                    tracing::debug!(term = %term, "Search settled");
                    if requests.send(SearchRequest::Search(term)).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_debouncer() -> (mpsc::Sender<SearchEvent>, mpsc::Receiver<SearchRequest>) {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (request_tx, request_rx) = mpsc::channel(16);
        tokio::spawn(debounce_search(event_rx, SEARCH_DEBOUNCE, request_tx));
        (event_tx, request_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_keystrokes_searches_once() {
        let (events, mut requests) = spawn_debouncer();
        let start = Instant::now();

        for text in ["c", "ch", "char"] {
            events.send(SearchEvent::Typed(text.to_string())).await.unwrap();
        }

        assert_eq!(
            requests.recv().await,
            Some(SearchRequest::Search("char".to_string()))
        );
        let waited = start.elapsed();
        assert!(waited >= SEARCH_DEBOUNCE && waited < Duration::from_millis(405), "{waited:?}");

        drop(events);
        assert_eq!(requests.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_resets_timer() {
        let (events, mut requests) = spawn_debouncer();
        let start = Instant::now();

        events.send(SearchEvent::Typed("pi".to_string())).await.unwrap();
        sleep(Duration::from_millis(300)).await;
        events.send(SearchEvent::Typed("pika".to_string())).await.unwrap();

        assert_eq!(
            requests.recv().await,
            Some(SearchRequest::Search("pika".to_string()))
        );
        let waited = start.elapsed();
        assert!(
            waited >= Duration::from_millis(700) && waited < Duration::from_millis(710),
            "{waited:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_fetches_all_immediately() {
        let (events, mut requests) = spawn_debouncer();
        let start = Instant::now();

        events.send(SearchEvent::Typed("bulb".to_string())).await.unwrap();
        events.send(SearchEvent::Cleared).await.unwrap();

        assert_eq!(requests.recv().await, Some(SearchRequest::FetchAll));
        assert!(start.elapsed() < SEARCH_DEBOUNCE);

        // The pending search was dropped
        drop(events);
        assert_eq!(requests.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_text_counts_as_clear() {
        let (events, mut requests) = spawn_debouncer();

        events.send(SearchEvent::Typed("   ".to_string())).await.unwrap();
        assert_eq!(requests.recv().await, Some(SearchRequest::FetchAll));
    }
}
