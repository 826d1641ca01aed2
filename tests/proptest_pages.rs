//! Property-based tests using proptest
//!
//! These tests verify pagination, option encoding, aggregated flattening and
//! error classification using randomized inputs.

use gcompute::gcp::auth::GcpCredentials;
use gcompute::gcp::client::GcpClient;
use gcompute::rpc::http::flatten_aggregated;
use gcompute::{ComputeError, ComputeRpc, HttpComputeRpc, Page, RpcOption, RpcOptions};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Generate a list of distinct resource names
fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z][a-z0-9-]{0,20}", 0..60)
        .prop_map(|set| set.into_iter().collect())
}

/// Serves a fixed zone listing page by page, honouring `maxResults` and
/// `pageToken` the way Compute Engine does. An empty page omits `items`.
struct ZoneListing {
    names: Vec<String>,
}

impl Respond for ZoneListing {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let query: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        let param = |key: &str| query.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());

        let start = param("pageToken")
            .and_then(|t| t.strip_prefix("offset-").and_then(|n| n.parse::<usize>().ok()))
            .unwrap_or(0);
        let size = param("maxResults")
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(self.names.len());
        let end = (start + size).min(self.names.len());

        let mut body = Map::new();
        body.insert("kind".to_string(), json!("compute#zoneList"));
        if end > start {
            let items: Vec<Value> = self.names[start..end]
                .iter()
                .map(|n| json!({"kind": "compute#zone", "name": n}))
                .collect();
            body.insert("items".to_string(), Value::Array(items));
        }
        if end < self.names.len() {
            body.insert("nextPageToken".to_string(), json!(format!("offset-{}", end)));
        }

        ResponseTemplate::new(200).set_body_json(Value::Object(body))
    }
}

/// Page sizes seen while following tokens, and every name collected
struct Walk {
    full: Vec<String>,
    page_sizes: Vec<usize>,
    paged: Vec<String>,
}

/// List zones once without a page size, then again page by page
fn walk_zone_listing(names: Vec<String>, page_size: u32) -> Walk {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async move {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/compute/v1/projects/test-project/zones"))
            .respond_with(ZoneListing { names })
            .mount(&server)
            .await;

        let client = GcpClient::with_credentials(
            "test-project",
            GcpCredentials::from_access_token("test-token"),
        )
        .unwrap()
        .with_endpoint(&format!("{}/compute/v1", server.uri()))
        .unwrap();
        let rpc = HttpComputeRpc::new(client);

        let zone_names = |page: Page<gcompute::Zone>| -> Vec<String> {
            page.into_iter().filter_map(|z| z.name).collect()
        };

        let full = zone_names(rpc.list_zones(&RpcOptions::new()).await.unwrap());

        let mut page_sizes = Vec::new();
        let mut paged = Vec::new();
        let mut opts = RpcOptions::new().max_results(page_size);
        loop {
            let page = rpc.list_zones(&opts).await.unwrap();
            page_sizes.push(page.len());
            let (token, items) = page.into_parts();
            paged.extend(items.filter_map(|z| z.name));
            match token {
                Some(token) => opts = opts.page_token(token),
                None => break,
            }
        }

        Walk {
            full,
            page_sizes,
            paged,
        }
    })
}

fn arb_options() -> impl Strategy<Value = RpcOptions> {
    (
        proptest::option::of("[a-z(),/]{0,12}"),
        proptest::option::of(0u32..1000),
        proptest::option::of("[A-Za-z0-9]{0,16}"),
        proptest::option::of("[a-z =.*-]{0,20}"),
    )
        .prop_map(|(fields, max_results, page_token, filter)| RpcOptions {
            fields,
            max_results,
            page_token,
            filter,
        })
}

/// Generate an aggregated response: per scope either a list of items or a warning
fn arb_aggregated() -> impl Strategy<Value = (Value, usize)> {
    prop::collection::vec(
        prop_oneof![
            prop::collection::vec("[a-z]{1,8}", 0..5).prop_map(Some),
            Just(None),
        ],
        0..20,
    )
    .prop_map(|scopes| {
        let mut items = Map::new();
        let mut total = 0;
        for (i, scope) in scopes.into_iter().enumerate() {
            let entry = match scope {
                Some(names) => {
                    total += names.len();
                    let list: Vec<Value> = names.into_iter().map(|n| json!({"name": n})).collect();
                    json!({"diskTypes": list})
                },
                None => json!({"warning": {"code": "NO_RESULTS_ON_PAGE"}}),
            };
            items.insert(format!("zones/zone-{}", i), entry);
        }
        (json!({"items": items}), total)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Following tokens page by page yields exactly the full listing
    #[test]
    fn pagination_neither_repeats_nor_skips(
        all in arb_names(),
        page_size in 1u32..10
    ) {
        let walk = walk_zone_listing(all.clone(), page_size);

        prop_assert_eq!(&walk.full, &all);
        prop_assert!(walk.page_sizes.iter().all(|&n| n <= page_size as usize));
        prop_assert_eq!(
            walk.page_sizes.len(),
            all.len().div_ceil(page_size as usize).max(1)
        );
        prop_assert_eq!(walk.paged, walk.full);
    }
}

proptest! {

    /// A page without a token is the last one
    #[test]
    fn empty_token_never_reported(items in arb_names()) {
        let page = Page::new(Some(String::new()), items);
        prop_assert!(!page.has_next_page());
    }

    /// Query pairs use known wire names, at most once each, never with empty values
    #[test]
    fn query_pairs_are_well_formed(opts in arb_options()) {
        let wire_names: HashSet<&str> = RpcOption::ALL.iter().map(|o| o.wire_name()).collect();
        let pairs = opts.query_pairs();

        let mut seen = HashSet::new();
        for (key, value) in &pairs {
            prop_assert!(wire_names.contains(key));
            prop_assert!(seen.insert(*key));
            prop_assert!(!value.is_empty());
        }

        prop_assert_eq!(
            pairs.iter().any(|(k, _)| *k == "maxResults"),
            opts.max_results.is_some()
        );
    }

    /// A get only ever forwards the field mask
    #[test]
    fn get_options_keep_only_fields(opts in arb_options()) {
        let pairs = opts.for_get().query_pairs();
        prop_assert!(pairs.iter().all(|(k, _)| *k == "fields"));
    }

    /// Flattening keeps every item of every scope and nothing from warnings
    #[test]
    fn aggregated_flattening_keeps_all_items((response, total) in arb_aggregated()) {
        let items = flatten_aggregated(&response, "diskTypes");
        prop_assert_eq!(items.len(), total);
        prop_assert!(items.iter().all(|i| i.get("name").is_some()));
    }

    /// Status codes are preserved and only server errors are retryable
    #[test]
    fn error_status_classification(status in 400u16..600) {
        let err = ComputeError::from_response(status, "");
        prop_assert_eq!(err.code(), Some(status));
        prop_assert_eq!(err.is_not_found(), status == 404);
        prop_assert_eq!(err.is_retryable(), matches!(status, 500 | 502 | 503 | 504));
    }
}
