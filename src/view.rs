//! The comparison view-controller: two date fields kept in sync with the
//! shareable link, a comparison per change, and the rendered result.

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::async_compare::{CompareRequest, CompareResponse};
use crate::clipboard::Clipboard;
use crate::link::{LinkState, Location};
use crate::selection::{DateError, DateField, DateSelection, TODAY};
use crate::state::{ComparisonState, DateInputState};

pub struct ComparisonView {
    link: LinkState,
    location: Box<dyn Location>,
    /// Load time; "today" always resolves to this.
    now: NaiveDateTime,
    from: DateInputState,
    to: DateInputState,
    pub comparison: ComparisonState,
    /// Latest issued request; older responses are dropped.
    generation: u64,
    commit_url_base: String,
}

impl ComparisonView {
    /// Normalize the link's selection, write it back to `location`, and
    /// return the view with the initial comparison request. Parameters that
    /// fail to parse fall back to `today` and leave the field marked invalid.
    pub fn load(
        mut link: LinkState,
        now: NaiveDateTime,
        commit_url_base: &str,
        mut location: Box<dyn Location>,
    ) -> (Self, CompareRequest) {
        let from = load_field(&mut link, DateField::From, now);
        let to = load_field(&mut link, DateField::To, now);
        location.replace(&link);
        info!(link = %link.as_string(), "view loaded");

        let mut view = Self {
            link,
            location,
            now,
            from,
            to,
            comparison: ComparisonState::default(),
            generation: 0,
            commit_url_base: commit_url_base.to_string(),
        };
        let request = view.refresh_comparison();
        (view, request)
    }

    pub fn field(&self, field: DateField) -> &DateInputState {
        match field {
            DateField::From => &self.from,
            DateField::To => &self.to,
        }
    }

    pub fn field_mut(&mut self, field: DateField) -> &mut DateInputState {
        match field {
            DateField::From => &mut self.from,
            DateField::To => &mut self.to,
        }
    }

    pub fn link(&self) -> &LinkState {
        &self.link
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a new value to a field: `today` or a timestamp. The link is
    /// updated in place and a comparison requested. Invalid input leaves the
    /// selection and link untouched.
    pub fn set_date(&mut self, field: DateField, raw: &str) -> Result<CompareRequest, DateError> {
        let selection = match DateSelection::parse(raw) {
            Ok(sel) => sel,
            Err(e) => {
                warn!(field = field.label(), raw, "rejected date input");
                self.field_mut(field).reject(raw);
                return Err(e);
            }
        };
        let now = self.now;
        self.field_mut(field).accept(selection, now);
        self.link.set_field(field, &selection);
        self.location.replace(&self.link);
        debug!(field = field.label(), value = %selection.to_param(), "date changed");
        Ok(self.refresh_comparison())
    }

    /// Reset a field to the load time.
    pub fn set_today(&mut self, field: DateField) -> CompareRequest {
        let now = self.now;
        self.field_mut(field).accept(DateSelection::Today, now);
        self.link.set_field(field, &DateSelection::Today);
        self.location.replace(&self.link);
        self.refresh_comparison()
    }

    /// Request a comparison of the two displayed field values.
    pub fn refresh_comparison(&mut self) -> CompareRequest {
        self.generation += 1;
        self.comparison.loading = true;
        CompareRequest {
            generation: self.generation,
            from: self.from.value.clone(),
            to: self.to.value.clone(),
        }
    }

    /// Render a response unless a newer request has been issued since.
    /// Returns whether the response was applied.
    pub fn apply_response(&mut self, response: CompareResponse) -> bool {
        if response.generation < self.generation {
            debug!(
                stale = response.generation,
                latest = self.generation,
                "dropping stale comparison"
            );
            return false;
        }
        self.comparison.loading = false;
        match response.result {
            Ok(result) => self.comparison.apply(&result, &self.commit_url_base),
            Err(reason) => self.comparison.fail(&reason),
        }
        true
    }

    /// Copy the full current link. Returns the copied text.
    pub fn copy_shareable_link(&self, clipboard: &mut dyn Clipboard) -> Result<String> {
        let text = self.link.as_string();
        clipboard.set_text(&text)?;
        Ok(text)
    }
}

fn load_field(link: &mut LinkState, field: DateField, now: NaiveDateTime) -> DateInputState {
    let raw = link.field(field).map(str::to_string);
    match raw.as_deref() {
        Some(raw) if raw != TODAY => match DateSelection::parse(raw) {
            Ok(selection) => {
                link.set_field(field, &selection);
                DateInputState::new(selection, now)
            }
            Err(_) => {
                warn!(field = field.label(), raw, "unparseable date in link, using today");
                link.set_field(field, &DateSelection::Today);
                let mut input = DateInputState::new(DateSelection::Today, now);
                input.reject(raw);
                input
            }
        },
        _ => {
            link.set_field(field, &DateSelection::Today);
            DateInputState::new(DateSelection::Today, now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::ComparisonResult;
    use crate::selection::parse_timestamp;
    use crate::state::comparison_state::OverallStatus;
    use crate::selection::{format_seconds, truncate_seconds};
    use chrono::{Days, NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const BASE: &str = "https://example.org/monitor/";
    const COMMITS: &str = "https://example.org/commit/";

    #[derive(Clone, Default)]
    struct RecordingLocation {
        writes: Arc<Mutex<Vec<String>>>,
    }

    impl Location for RecordingLocation {
        fn replace(&mut self, link: &LinkState) {
            self.writes.lock().unwrap().push(link.as_string());
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        text: Option<String>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no clipboard");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    fn now() -> NaiveDateTime {
        parse_timestamp("2025-06-01T10:20:30").unwrap()
    }

    fn load(url: &str) -> (ComparisonView, CompareRequest, RecordingLocation) {
        let location = RecordingLocation::default();
        let (view, request) = ComparisonView::load(
            LinkState::parse(url).unwrap(),
            now(),
            COMMITS,
            Box::new(location.clone()),
        );
        (view, request, location)
    }

    fn response(generation: u64, lhs: serde_json::Value, rhs: serde_json::Value) -> CompareResponse {
        let l = lhs.as_object().cloned().unwrap();
        let r = rhs.as_object().cloned().unwrap();
        let match_tuples = l
            .iter()
            .map(|(k, v)| (k.clone(), r.get(k) == Some(v)))
            .collect();
        CompareResponse {
            generation,
            result: Ok(ComparisonResult {
                lhs_state: l,
                rhs_state: r,
                match_tuples,
                lhs_commit: format!("lhs{generation}"),
                rhs_commit: format!("rhs{generation}"),
            }),
        }
    }

    #[test]
    fn test_load_explicit_and_today() {
        let url = "https://example.org/monitor/?fromDate=2024-01-01T00:00:00&toDate=today";
        let (view, request, location) = load(url);

        assert_eq!(view.field(DateField::From).value, "2024-01-01T00:00:00");
        assert_eq!(view.field(DateField::To).value, "2025-06-01T10:20:30");
        assert_eq!(
            request,
            CompareRequest {
                generation: 1,
                from: "2024-01-01T00:00:00".to_string(),
                to: "2025-06-01T10:20:30".to_string(),
            }
        );
        assert_eq!(*location.writes.lock().unwrap(), vec![url.to_string()]);

        let mut clipboard = RecordingClipboard::default();
        let copied = view.copy_shareable_link(&mut clipboard).unwrap();
        assert_eq!(copied, url);
        assert_eq!(clipboard.text.as_deref(), Some(url));
    }

    #[test]
    fn test_load_defaults_missing_params_to_today() {
        let (view, request, location) = load("https://example.org/monitor/?fromDate=today");
        assert_eq!(view.field(DateField::From).value, "2025-06-01T10:20:30");
        assert_eq!(view.field(DateField::To).value, "2025-06-01T10:20:30");
        assert_eq!(view.field(DateField::To).selection, DateSelection::Today);
        assert_eq!(request.from, request.to);
        assert_eq!(
            location.writes.lock().unwrap().last().unwrap(),
            "https://example.org/monitor/?fromDate=today&toDate=today"
        );
    }

    #[test]
    fn test_load_normalizes_subseconds() {
        let (view, _, _) = load("https://example.org/?toDate=2024-01-01T05:06:07.891Z");
        assert_eq!(view.field(DateField::To).value, "2024-01-01T05:06:07");
        assert_eq!(
            view.link().as_string(),
            "https://example.org/?toDate=2024-01-01T05:06:07&fromDate=today"
        );
    }

    #[test]
    fn test_load_bad_param_falls_back_to_today() {
        let (view, _, _) = load("https://example.org/?fromDate=banana");
        let from = view.field(DateField::From);
        assert_eq!(from.selection, DateSelection::Today);
        assert_eq!(from.invalid.as_deref(), Some("banana"));
        assert_eq!(view.link().field(DateField::From), Some("today"));
    }

    #[test]
    fn test_url_round_trip_preserves_seconds() {
        let (mut view, _, _) = load(BASE);
        view.set_date(DateField::From, "2023-07-08T09:10:11").unwrap();
        let (reloaded, _, _) = load(&view.link().as_string());
        assert_eq!(reloaded.field(DateField::From).value, "2023-07-08T09:10:11");
    }

    #[test]
    fn test_set_date_replaces_location_and_requests() {
        let (mut view, first, location) = load(BASE);
        let request = view.set_date(DateField::To, "2024-02-03T04:05").unwrap();
        assert_eq!(request.generation, first.generation + 1);
        assert_eq!(request.to, "2024-02-03T04:05:00");
        assert_eq!(view.link().field(DateField::To), Some("2024-02-03T04:05:00"));

        let writes = location.writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(
            writes[1],
            "https://example.org/monitor/?fromDate=today&toDate=2024-02-03T04:05:00"
        );
    }

    #[test]
    fn test_set_date_today_shows_load_time() {
        let (mut view, _, _) = load("https://example.org/?fromDate=2020-01-01T00:00:00");
        let request = view.set_date(DateField::From, "today").unwrap();
        assert_eq!(request.from, "2025-06-01T10:20:30");
        assert_eq!(view.link().field(DateField::From), Some("today"));

        view.set_date(DateField::From, "2020-01-01").unwrap();
        view.set_today(DateField::From);
        assert_eq!(view.field(DateField::From).value, "2025-06-01T10:20:30");
    }

    #[test]
    fn test_invalid_input_keeps_previous_selection() {
        let (mut view, _, location) = load("https://example.org/?fromDate=2024-01-01T00:00:00");
        let generation = view.generation();
        let err = view.set_date(DateField::From, "not a date").unwrap_err();
        assert_eq!(err, DateError::InvalidDateInput("not a date".to_string()));

        let from = view.field(DateField::From);
        assert_eq!(from.value, "2024-01-01T00:00:00");
        assert!(from.is_invalid());
        assert_eq!(view.generation(), generation);
        assert_eq!(location.writes.lock().unwrap().len(), 1);

        view.set_date(DateField::From, "2024-01-02").unwrap();
        assert!(!view.field(DateField::From).is_invalid());
    }

    #[test]
    fn test_refresh_reads_fields_not_link() {
        let (mut view, _, _) = load(BASE);
        view.field_mut(DateField::From).value = "2000-01-01T00:00:00".to_string();
        let request = view.refresh_comparison();
        assert_eq!(request.from, "2000-01-01T00:00:00");
        assert_eq!(view.link().field(DateField::From), Some("today"));
    }

    #[test]
    fn test_renders_rows_and_status() {
        let (mut view, request, _) = load(BASE);
        assert!(view.comparison.loading);
        assert!(view.apply_response(response(
            request.generation,
            json!({"a": 1, "b": 2}),
            json!({"a": 1, "b": 3}),
        )));
        let c = &view.comparison;
        assert!(!c.loading);
        assert_eq!(c.rows.len(), 2);
        assert_eq!(c.rows[0].status_label(), "Matches");
        assert_eq!(c.rows[1].status_label(), "Does not match");
        assert_eq!(c.status.text(), "Some does not match");
        assert_eq!(c.from_commit.href, "https://example.org/commit/lhs1");
        assert_eq!(c.to_commit.label, "rhs1");
    }

    #[test]
    fn test_last_request_wins() {
        let (mut view, _, _) = load(BASE);
        let a = view.set_date(DateField::From, "2024-01-01").unwrap();
        let b = view.set_date(DateField::From, "2024-02-01").unwrap();

        // B resolves first, then the slower A arrives.
        assert!(view.apply_response(response(b.generation, json!({"b": 1}), json!({"b": 1}))));
        assert!(!view.apply_response(response(a.generation, json!({"a": 1}), json!({"a": 2}))));

        let c = &view.comparison;
        assert_eq!(c.rows.len(), 1);
        assert_eq!(c.rows[0].key, "b");
        assert_eq!(c.status, OverallStatus::FullMatch);
        assert_eq!(c.from_commit.label, format!("lhs{}", b.generation));
    }

    #[test]
    fn test_failure_keeps_previous_table() {
        let (mut view, first, _) = load(BASE);
        view.apply_response(response(first.generation, json!({"a": 1}), json!({"a": 1})));
        let next = view.refresh_comparison();
        assert!(view.apply_response(CompareResponse {
            generation: next.generation,
            result: Err("offline".to_string()),
        }));
        assert_eq!(view.comparison.rows.len(), 1);
        assert_eq!(view.comparison.status.text(), "Comparison failed: offline");
        assert_eq!(view.comparison.from_commit.label, "lhs1");
        assert!(!view.comparison.loading);
    }

    #[test]
    fn test_clipboard_failure_is_reported() {
        let (view, _, _) = load(BASE);
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..RecordingClipboard::default()
        };
        assert!(view.copy_shareable_link(&mut clipboard).is_err());
        assert!(clipboard.text.is_none());
    }

    /// Any instant in years 1000..=9999, with sub-second precision.
    fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
        (1000i32..=9999, 0u64..365, 0u32..86_400, 0u32..1_000_000_000).prop_map(
            |(year, day, secs, nanos)| {
                let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
                let date = jan1.checked_add_days(Days::new(day)).unwrap();
                let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap();
                date.and_time(time)
            },
        )
    }

    proptest! {
        #[test]
        fn test_any_timestamp_survives_link_round_trip(t in timestamp()) {
            let raw = t.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
            let mut link = LinkState::parse(BASE).unwrap();
            link.set(DateField::To.param(), &raw);

            let (view, request, _) = load(&link.as_string());
            let expected = format_seconds(&truncate_seconds(t));
            prop_assert!(!view.field(DateField::To).is_invalid());
            prop_assert_eq!(&view.field(DateField::To).value, &expected);
            prop_assert_eq!(&request.to, &expected);

            let (reloaded, _, _) = load(&view.link().as_string());
            prop_assert_eq!(&reloaded.field(DateField::To).value, &expected);
            prop_assert_eq!(reloaded.link().as_string(), view.link().as_string());
        }
    }
}
