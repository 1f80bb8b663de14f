//! Query orchestrator
//!
//! [`EventService`] ties the pipeline together: it fetches raw payloads
//! through the [`EventApi`] port, memoizes them in the request-keyed cache,
//! parses them into domain records, and runs the filter/sort/paginate
//! stages. Listing entry points fail open: any upstream or parse failure is
//! logged and surfaces as an empty result, never an error to the caller.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use eventline_common::cache::{CacheConfig, RefreshMode, RequestCache};
use eventline_common::time::{Clock, SystemClock};
use eventline_domain::{
    Event, EventEntry, EventQuery, Organizer, OrganizerEntry, OrderBy, Result, User, Venue,
    VenueEntry,
};
use serde_json::Value;
use tracing::warn;

use super::filters;
use super::ports::EventApi;
use super::recurrence::repeat_occurrences;
use super::request_key::request_key;

/// Name of the connected account provider, as reported by disconnect
/// notifications.
pub const SERVICE_NAME: &str = "eventbrite";

/// API method listing the account's events.
pub const METHOD_USER_LIST_EVENTS: &str = "user_list_events";
/// API method listing the account's venues.
pub const METHOD_USER_LIST_VENUES: &str = "user_list_venues";
/// API method listing the account's organizers.
pub const METHOD_USER_LIST_ORGANIZERS: &str = "user_list_organizers";
/// API method fetching the account owner's profile.
pub const METHOD_USER_GET: &str = "user_get";

/// Orchestrates event retrieval: cache-through payload fetches plus the
/// parse/filter/sort/paginate pipeline.
pub struct EventService<C = SystemClock>
where
    C: Clock + Clone,
{
    api: Arc<dyn EventApi>,
    cache: RequestCache<Value, C>,
    clock: C,
}

impl EventService<SystemClock> {
    /// Creates a service over the given API port with default cache windows
    /// and the system clock.
    pub fn new(api: Arc<dyn EventApi>) -> Self {
        Self::with_parts(api, RequestCache::new(CacheConfig::default()), SystemClock)
    }
}

impl<C> EventService<C>
where
    C: Clock + Clone,
{
    /// Creates a service from explicit parts. The cache and clock are
    /// injectable for tests.
    pub fn with_parts(api: Arc<dyn EventApi>, cache: RequestCache<Value, C>, clock: C) -> Self {
        Self { api, cache, clock }
    }

    /// Lists the account's events after applying `query`.
    ///
    /// The raw payload is fetched once per distinct request and reused
    /// across queries; all selection, ordering, and pagination happen
    /// locally. Failures fail open to an empty list.
    pub async fn get_user_events(&self, query: &EventQuery, mode: RefreshMode) -> Vec<Event> {
        let mut events = self.fetch_events(&query.display, mode).await;

        filters::retain_included(&mut events, &query.include);
        filters::retain_excluded(&mut events, &query.exclude);
        filters::retain_venue(&mut events, query.venue.as_deref());
        filters::retain_organizer(&mut events, query.organizer.as_deref());

        match query.orderby {
            OrderBy::Created => {
                // The created ordering lists events by account history, so
                // recurrence expansion and the future cutoff do not apply.
                filters::sort_by_created(&mut events, query.order);
            }
            OrderBy::StartDate => {
                let occurrences = repeat_occurrences(&events);
                events.extend(occurrences);
                filters::sort_by_start_date(&mut events);
                filters::retain_included_occurrences(&mut events, &query.include_occurrences);
                filters::retain_excluded_occurrences(&mut events, &query.exclude_occurrences);
                filters::retain_future(&mut events, self.now());
            }
        }

        if let Some(search) = query.search.as_deref() {
            filters::retain_search(&mut events, search);
        }

        filters::paginate(events, query.page, query.per_page, query.count)
    }

    /// Lists the events at one venue.
    ///
    /// The venue selection applies after pagination, so a page can return
    /// fewer than `per_page` matches even when later pages hold more.
    pub async fn get_venue_events(
        &self,
        venue_id: &str,
        query: &EventQuery,
        mode: RefreshMode,
    ) -> Vec<Event> {
        let mut query = query.clone();
        query.venue = None;

        let mut events = self.get_user_events(&query, mode).await;
        filters::retain_venue_id(&mut events, venue_id);
        events
    }

    /// Lists the account's venues. Failures fail open to an empty list.
    pub async fn get_user_venues(&self, mode: RefreshMode) -> Vec<Venue> {
        let payload = match self.cached_payload(METHOD_USER_LIST_VENUES, &[], mode).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "venue listing failed");
                return Vec::new();
            }
        };
        parse_entries::<VenueEntry>(&payload, "venues").into_iter().map(|e| e.venue).collect()
    }

    /// Fetches one venue by id from the account's venue listing.
    pub async fn get_venue(&self, venue_id: &str, mode: RefreshMode) -> Option<Venue> {
        self.get_user_venues(mode).await.into_iter().find(|venue| venue.id == venue_id)
    }

    /// Lists the account's organizers. Failures fail open to an empty list.
    pub async fn get_user_organizers(&self, mode: RefreshMode) -> Vec<Organizer> {
        let payload = match self.cached_payload(METHOD_USER_LIST_ORGANIZERS, &[], mode).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "organizer listing failed");
                return Vec::new();
            }
        };
        parse_entries::<OrganizerEntry>(&payload, "organizers")
            .into_iter()
            .map(|e| e.organizer)
            .collect()
    }

    /// Fetches the connected account owner's profile.
    pub async fn get_user(&self, mode: RefreshMode) -> Option<User> {
        let payload = match self.cached_payload(METHOD_USER_GET, &[], mode).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "user profile fetch failed");
                return None;
            }
        };
        let user = payload.get("user")?;
        match serde_json::from_value(user.clone()) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "skipping malformed user record");
                None
            }
        }
    }

    /// Fetches one event by id, optionally resolved to a specific
    /// occurrence.
    ///
    /// Unlike the listing entry points, this bypasses the future cutoff so
    /// past events stay addressable. An `occurrence` greater than zero
    /// overwrites the record's dates from the matching schedule entry; an
    /// out-of-range index leaves the base dates in place.
    pub async fn get_event_by_id(
        &self,
        event_id: &str,
        occurrence: usize,
        mode: RefreshMode,
    ) -> Option<Event> {
        let events = self.fetch_events("repeat_schedule", mode).await;
        let mut event = events.into_iter().find(|event| event.id == event_id)?;

        if occurrence > 0 {
            if let Some(window) = event.repeat_schedule.get(occurrence) {
                event.start_date = window.start_date.clone();
                event.end_date = window.end_date.clone();
                event.occurrence = Some(occurrence);
            }
        }

        Some(event)
    }

    /// Evicts the cached payload for one parameterless API method. Returns
    /// whether an entry was present.
    pub async fn flush_method(&self, method: &str) -> bool {
        self.cache.evict(&request_key(method, &[])).await
    }

    /// Evicts the cached payloads for the listing methods whose request
    /// parameters are known statically. Used when the connected account is
    /// disconnected and its data must not be served again.
    pub async fn flush_known_method_caches(&self) {
        self.flush_method(METHOD_USER_LIST_EVENTS).await;
        self.flush_method(METHOD_USER_LIST_VENUES).await;
    }

    /// Fetches and parses the raw event listing, skipping malformed
    /// records. Failures fail open to an empty list.
    async fn fetch_events(&self, display: &str, mode: RefreshMode) -> Vec<Event> {
        let params = [
            ("event_statuses".to_string(), "live,started".to_string()),
            ("display".to_string(), display.to_string()),
        ];
        let payload = match self.cached_payload(METHOD_USER_LIST_EVENTS, &params, mode).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "event listing failed");
                return Vec::new();
            }
        };
        parse_entries::<EventEntry>(&payload, "events").into_iter().map(|e| e.event).collect()
    }

    async fn cached_payload(
        &self,
        method: &str,
        params: &[(String, String)],
        mode: RefreshMode,
    ) -> Result<Value> {
        let key = request_key(method, params);
        let api = Arc::clone(&self.api);
        self.cache.get_or_compute(&key, mode, || async move { api.get(method, params).await }).await
    }

    fn now(&self) -> NaiveDateTime {
        DateTime::<Utc>::from(self.clock.system_time()).naive_utc()
    }
}

/// Deserializes the wrapper records under `field`, skipping and logging
/// records that do not match the expected shape. A missing or non-array
/// field yields an empty list.
fn parse_entries<T>(payload: &Value, field: &str) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    let Some(records) = payload.get(field).and_then(Value::as_array) else {
        return Vec::new();
    };
    records
        .iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(field, error = %err, "skipping malformed record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use eventline_common::time::MockClock;
    use eventline_domain::{EventlineError, Order};
    use serde_json::json;

    use super::*;

    struct StubApi {
        payloads: HashMap<&'static str, Value>,
        calls: AtomicUsize,
    }

    impl StubApi {
        fn new(payloads: HashMap<&'static str, Value>) -> Self {
            Self { payloads, calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventApi for StubApi {
        async fn get(&self, method: &str, _params: &[(String, String)]) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads
                .get(method)
                .cloned()
                .ok_or_else(|| EventlineError::Upstream(format!("no payload for {method}")))
        }
    }

    fn service_over(payloads: HashMap<&'static str, Value>) -> (EventService<MockClock>, Arc<StubApi>) {
        let api = Arc::new(StubApi::new(payloads));
        let clock = MockClock::new();
        let cache = RequestCache::with_clock(CacheConfig::default(), clock.clone());
        (EventService::with_parts(api.clone(), cache, clock), api)
    }

    fn event_json(id: &str, start: &str, end: &str) -> Value {
        json!({
            "event": {
                "id": id,
                "title": format!("Event {id}"),
                "start_date": start,
                "end_date": end,
                "repeats": "no",
            }
        })
    }

    fn events_payload(events: Vec<Value>) -> HashMap<&'static str, Value> {
        HashMap::from([(METHOD_USER_LIST_EVENTS, json!({ "events": events }))])
    }

    #[tokio::test]
    async fn listing_parses_wire_shape_and_sorts_by_start_date() {
        let (service, _) = service_over(events_payload(vec![
            event_json("2", "2099-05-01 10:00:00", "2099-05-01 12:00:00"),
            event_json("1", "2099-04-01 10:00:00", "2099-04-01 12:00:00"),
        ]));

        let events = service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn numeric_ids_and_malformed_records_are_tolerated() {
        let (service, _) = service_over(events_payload(vec![
            json!({
                "event": {
                    "id": 42,
                    "start_date": "2099-04-01 10:00:00",
                    "end_date": "2099-04-01 12:00:00",
                }
            }),
            json!({ "unexpected": true }),
        ]));

        let events = service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "42");
    }

    #[tokio::test]
    async fn repeat_payload_expands_repeating_events() {
        let (service, _) = service_over(events_payload(vec![json!({
            "event": {
                "id": "7",
                "start_date": "2099-02-01 19:00:00",
                "end_date": "2099-02-01 22:00:00",
                "repeats": "yes",
                "repeat_schedule": [
                    { "start_date": "2099-02-01 19:00:00", "end_date": "2099-02-01 22:00:00" },
                    { "start_date": "2099-03-01 19:00:00", "end_date": "2099-03-01 22:00:00" },
                ],
            }
        })]));

        let events = service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].occurrence, None);
        assert_eq!(events[1].occurrence, Some(1));
        assert_eq!(events[1].start_date, "2099-03-01 19:00:00");
    }

    #[tokio::test]
    async fn past_events_are_cut_off_in_the_date_ordering() {
        let (service, _) = service_over(events_payload(vec![
            event_json("past", "2020-01-01 10:00:00", "2020-01-01 12:00:00"),
            event_json("upcoming", "2099-01-01 10:00:00", "2099-01-01 12:00:00"),
        ]));

        let events = service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "upcoming");
    }

    #[tokio::test]
    async fn created_ordering_keeps_past_events_and_honors_direction() {
        let mut older = event_json("older", "2020-01-01 10:00:00", "2020-01-01 12:00:00");
        older["event"]["created"] = json!("2019-06-01 00:00:00");
        let mut newer = event_json("newer", "2020-02-01 10:00:00", "2020-02-01 12:00:00");
        newer["event"]["created"] = json!("2019-07-01 00:00:00");

        let (service, _) = service_over(events_payload(vec![older, newer]));

        let query = EventQuery {
            orderby: OrderBy::Created,
            order: Order::Desc,
            ..EventQuery::default()
        };
        let events = service.get_user_events(&query, RefreshMode::Reuse).await;

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn created_and_start_date_orderings_disagree_when_history_inverts() {
        // Event 1 starts later but was created first.
        let mut first_created = event_json("1", "2099-01-10 10:00:00", "2099-01-10 12:00:00");
        first_created["event"]["created"] = json!("2024-01-01 00:00:00");
        let mut second_created = event_json("2", "2099-01-05 10:00:00", "2099-01-05 12:00:00");
        second_created["event"]["created"] = json!("2024-01-02 00:00:00");

        let (service, _) = service_over(events_payload(vec![first_created, second_created]));

        let by_created = EventQuery { orderby: OrderBy::Created, ..EventQuery::default() };
        let created_order = service.get_user_events(&by_created, RefreshMode::Reuse).await;
        let ids: Vec<&str> = created_order.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let start_order = service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;
        let ids: Vec<&str> = start_order.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn venue_listing_filters_after_pagination() {
        let mut events = Vec::new();
        for i in 1..=6 {
            let mut event = event_json(
                &i.to_string(),
                &format!("2099-01-0{i} 10:00:00"),
                &format!("2099-01-0{i} 12:00:00"),
            );
            // Odd ids at venue 55, even ids elsewhere.
            event["event"]["venue"] = json!({ "id": if i % 2 == 1 { "55" } else { "90" } });
            events.push(event);
        }
        let (service, _) = service_over(events_payload(events));

        let query = EventQuery { page: 1, per_page: 4, ..EventQuery::default() };
        let events = service.get_venue_events("55", &query, RefreshMode::Reuse).await;

        // The page holds ids 1-4; only the odd ones are at venue 55. Ids 5
        // and later never enter the page even though 5 matches the venue.
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn queries_sharing_a_request_reuse_one_fetch() {
        let (service, api) = service_over(events_payload(vec![
            event_json("1", "2099-04-01 10:00:00", "2099-04-01 12:00:00"),
            event_json("2", "2099-05-01 10:00:00", "2099-05-01 12:00:00"),
        ]));

        let all = service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;
        let query = EventQuery { include: vec!["2".to_string()], ..EventQuery::default() };
        let included = service.get_user_events(&query, RefreshMode::Reuse).await;

        assert_eq!(all.len(), 2);
        assert_eq!(included.len(), 1);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn force_refresh_refetches() {
        let (service, api) = service_over(events_payload(vec![event_json(
            "1",
            "2099-04-01 10:00:00",
            "2099-04-01 12:00:00",
        )]));

        service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;
        service.get_user_events(&EventQuery::default(), RefreshMode::ForceRefresh).await;

        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn upstream_failure_fails_open_to_empty_results() {
        let (service, _) = service_over(HashMap::new());

        let events = service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;
        let venues = service.get_user_venues(RefreshMode::Reuse).await;
        let user = service.get_user(RefreshMode::Reuse).await;

        assert!(events.is_empty());
        assert!(venues.is_empty());
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn venues_and_user_parse_their_wrappers() {
        let payloads = HashMap::from([
            (
                METHOD_USER_LIST_VENUES,
                json!({ "venues": [{ "venue": { "id": "55", "name": "Hall", "city": "Lyon" } }] }),
            ),
            (
                METHOD_USER_GET,
                json!({ "user": { "user_id": 9, "email": "owner@example.com" } }),
            ),
        ]);
        let (service, _) = service_over(payloads);

        let venue = service.get_venue("55", RefreshMode::Reuse).await;
        let user = service.get_user(RefreshMode::Reuse).await;

        assert_eq!(venue.and_then(|v| v.name), Some("Hall".to_string()));
        let user = user.unwrap();
        assert_eq!(user.user_id.as_deref(), Some("9"));
        assert_eq!(user.email.as_deref(), Some("owner@example.com"));
    }

    #[tokio::test]
    async fn event_by_id_resolves_occurrence_dates() {
        let (service, _) = service_over(events_payload(vec![json!({
            "event": {
                "id": "7",
                "start_date": "2020-02-01 19:00:00",
                "end_date": "2020-02-01 22:00:00",
                "repeats": "yes",
                "repeat_schedule": [
                    { "start_date": "2020-02-01 19:00:00", "end_date": "2020-02-01 22:00:00" },
                    { "start_date": "2020-03-01 19:00:00", "end_date": "2020-03-01 22:00:00" },
                ],
            }
        })]));

        // Past events stay addressable by id.
        let base = service.get_event_by_id("7", 0, RefreshMode::Reuse).await.unwrap();
        assert_eq!(base.start_date, "2020-02-01 19:00:00");
        assert_eq!(base.occurrence, None);

        let second = service.get_event_by_id("7", 1, RefreshMode::Reuse).await.unwrap();
        assert_eq!(second.start_date, "2020-03-01 19:00:00");
        assert_eq!(second.occurrence, Some(1));

        // Out-of-range occurrence falls back to the base dates.
        let out_of_range = service.get_event_by_id("7", 9, RefreshMode::Reuse).await.unwrap();
        assert_eq!(out_of_range.start_date, "2020-02-01 19:00:00");

        assert!(service.get_event_by_id("404", 0, RefreshMode::Reuse).await.is_none());
    }

    #[tokio::test]
    async fn flushing_known_methods_evicts_parameterless_keys_only() {
        let mut payloads = events_payload(vec![event_json(
            "1",
            "2099-04-01 10:00:00",
            "2099-04-01 12:00:00",
        )]);
        payloads.insert(
            METHOD_USER_LIST_VENUES,
            json!({ "venues": [{ "venue": { "id": "55" } }] }),
        );
        let (service, api) = service_over(payloads);

        service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;
        service.get_user_venues(RefreshMode::Reuse).await;
        assert_eq!(api.calls(), 2);

        service.flush_known_method_caches().await;

        // The venue listing key carries no parameters and is refetched; the
        // event listing key embeds its request parameters, so the coarse
        // flush leaves it cached.
        service.get_user_venues(RefreshMode::Reuse).await;
        assert_eq!(api.calls(), 3);
        service.get_user_events(&EventQuery::default(), RefreshMode::Reuse).await;
        assert_eq!(api.calls(), 3);
    }
}
