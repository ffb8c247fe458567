//! Post-login routing
//!
//! The login screen is reached with `?referrer=<path>&showNetwork=<bool>`.

use std::collections::HashMap;

/// Route used when no referrer is given
pub const DEFAULT_ROUTE: &str = "/main/transactions";

/// Route only delegates may enter
pub const DELEGATE_ROUTE: &str = "/main/forging";

/// Referrer router
pub struct ReferrerRouter;

impl ReferrerRouter {
    /// Destination after a successful login
    ///
    /// An absent or empty referrer yields the default route. The delegate
    /// route falls back to the default route for non-delegates.
    pub fn resolve_destination(raw_referrer: Option<&str>, is_delegate: bool) -> String {
        let route = raw_referrer
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_ROUTE);
        if !is_delegate && route == DELEGATE_ROUTE {
            return DEFAULT_ROUTE.to_string();
        }
        route.to_string()
    }

    /// Destination for the login screen's query string
    pub fn destination_for(search: &str, is_delegate: bool) -> String {
        let referrer = Self::referrer(search);
        Self::resolve_destination(referrer.as_deref(), is_delegate)
    }

    /// `referrer` parameter of a query string
    pub fn referrer(search: &str) -> Option<String> {
        parse_search_params(search).remove("referrer")
    }

    /// Whether the network selector should be shown
    pub fn show_network_options(search: &str) -> bool {
        parse_search_params(search)
            .get("showNetwork")
            .is_some_and(|v| v == "true")
    }
}

/// Parse a query string (`?a=1&b=2`) into percent-decoded pairs
///
/// A key without `=` maps to an empty value; the last duplicate wins.
pub fn parse_search_params(search: &str) -> HashMap<String, String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |v| v.into_owned())
}
