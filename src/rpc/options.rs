//! Query options accepted by every Compute Engine call

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query parameter recognized by Compute Engine list/get calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcOption {
    /// Restrict the returned field set
    Fields,
    /// Page size cap
    MaxResults,
    /// Resume cursor from a previous page
    PageToken,
    /// Server-side filter expression
    Filter,
}

impl RpcOption {
    pub const ALL: [RpcOption; 4] = [
        RpcOption::Fields,
        RpcOption::MaxResults,
        RpcOption::PageToken,
        RpcOption::Filter,
    ];

    /// Name of the query parameter on the wire
    pub fn wire_name(self) -> &'static str {
        match self {
            RpcOption::Fields => "fields",
            RpcOption::MaxResults => "maxResults",
            RpcOption::PageToken => "pageToken",
            RpcOption::Filter => "filter",
        }
    }
}

impl fmt::Display for RpcOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Options for a single call.
///
/// Deserializes from the wire names (`fields`, `maxResults`, `pageToken`,
/// `filter`); any other key is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl RpcOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Value of one option as it goes on the wire, if set and non-empty
    pub fn get(&self, option: RpcOption) -> Option<String> {
        let value = match option {
            RpcOption::Fields => self.fields.clone(),
            RpcOption::MaxResults => self.max_results.map(|n| n.to_string()),
            RpcOption::PageToken => self.page_token.clone(),
            RpcOption::Filter => self.filter.clone(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Query pairs for the options that are set, in [`RpcOption::ALL`] order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        RpcOption::ALL
            .iter()
            .filter_map(|&opt| self.get(opt).map(|v| (opt.wire_name(), v)))
            .collect()
    }

    /// Keep only the options meaningful for a single-resource lookup
    pub fn for_get(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            ..Self::default()
        }
    }

    /// Fill unset options from `defaults`.
    ///
    /// The page token is never inherited: resuming a listing is decided per
    /// call.
    pub fn or(self, defaults: &RpcOptions) -> Self {
        Self {
            fields: self.fields.or_else(|| defaults.fields.clone()),
            max_results: self.max_results.or(defaults.max_results),
            page_token: self.page_token,
            filter: self.filter.or_else(|| defaults.filter.clone()),
        }
    }
}
