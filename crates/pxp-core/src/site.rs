//! Site mode resolution from the request hostname
//!
//! Every request belongs to exactly one of three sites: the public marketing
//! site, the operator dashboard, or a school's own subdomain. On loopback
//! hosts subdomains cannot be used, so a `subdomain` query parameter
//! simulates them.

use serde::Serialize;

/// Hostnames treated as local development, where the override token applies
pub const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1"];
/// Subdomain (or override token) of the operator dashboard
pub const ADMIN_SUBDOMAIN: &str = "dashboard";
/// Subdomain (or override token) that is an alias of the bare domain
pub const WWW_SUBDOMAIN: &str = "www";

/// Resolved site of a request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum SiteContext {
	Main,
	Admin,
	#[serde(rename_all = "camelCase")]
	Organization { tenant_key: Box<str> },
}

impl SiteContext {
	pub fn is_main(&self) -> bool {
		matches!(self, SiteContext::Main)
	}

	pub fn is_admin(&self) -> bool {
		matches!(self, SiteContext::Admin)
	}

	pub fn tenant_key(&self) -> Option<&str> {
		match self {
			SiteContext::Organization { tenant_key } => Some(tenant_key),
			_ => None,
		}
	}
}

fn classify_subdomain(label: &str) -> SiteContext {
	match label {
		"" | WWW_SUBDOMAIN => SiteContext::Main,
		ADMIN_SUBDOMAIN => SiteContext::Admin,
		tenant_key => SiteContext::Organization { tenant_key: tenant_key.into() },
	}
}

/// Resolves the site of a request.
///
/// `subdomain_override` is only consulted when `hostname` is a loopback
/// alias. The function is total: anything it cannot classify is the main
/// site.
pub fn resolve_site(hostname: &str, subdomain_override: Option<&str>) -> SiteContext {
	if LOOPBACK_HOSTS.contains(&hostname) {
		return subdomain_override.map_or(SiteContext::Main, classify_subdomain);
	}

	let labels: Vec<&str> = hostname.split('.').collect();
	match labels.as_slice() {
		[_, _] => SiteContext::Main,
		[first, _, _, ..] => classify_subdomain(first),
		_ => SiteContext::Main,
	}
}

/// Strips the port from a `Host` header value and lowercases it
pub fn normalize_host(host: &str) -> String {
	let host = host.trim();
	let host = if let Some(rest) = host.strip_prefix('[') {
		// IPv6 literal: [::1]:8080
		rest.split(']').next().unwrap_or(rest)
	} else {
		host.rsplit_once(':').map_or(host, |(name, _port)| name)
	};
	host.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn org(key: &str) -> SiteContext {
		SiteContext::Organization { tenant_key: key.into() }
	}

	#[test]
	fn test_subdomain_is_organization() {
		assert_eq!(resolve_site("school.example.com", None), org("school"));
		assert_eq!(resolve_site("school.pxpmanagement.es", None), org("school"));
	}

	#[test]
	fn test_www_and_bare_domain_are_main() {
		assert_eq!(resolve_site("www.example.com", None), SiteContext::Main);
		assert_eq!(resolve_site("example.com", None), SiteContext::Main);
	}

	#[test]
	fn test_dashboard_is_admin() {
		assert_eq!(resolve_site("dashboard.example.com", None), SiteContext::Admin);
	}

	#[test]
	fn test_deep_hostname_uses_first_label() {
		assert_eq!(resolve_site("acme.eu.example.com", None), org("acme"));
		assert_eq!(resolve_site("dashboard.eu.example.com", None), SiteContext::Admin);
	}

	#[test]
	fn test_override_ignored_outside_loopback() {
		assert_eq!(resolve_site("example.com", Some("acme")), SiteContext::Main);
		assert_eq!(resolve_site("school.example.com", Some("dashboard")), org("school"));
	}

	#[test]
	fn test_loopback_override() {
		assert_eq!(resolve_site("localhost", Some("acme")), org("acme"));
		assert_eq!(resolve_site("localhost", Some("dashboard")), SiteContext::Admin);
		assert_eq!(resolve_site("localhost", Some("www")), SiteContext::Main);
		assert_eq!(resolve_site("localhost", Some("")), SiteContext::Main);
		assert_eq!(resolve_site("localhost", None), SiteContext::Main);
		assert_eq!(resolve_site("127.0.0.1", Some("acme")), org("acme"));
	}

	#[test]
	fn test_degenerate_hostnames_are_main() {
		assert_eq!(resolve_site("", None), SiteContext::Main);
		assert_eq!(resolve_site("intranet", None), SiteContext::Main);
		assert_eq!(resolve_site(".example.com", None), SiteContext::Main);
		assert_eq!(resolve_site("...", None), SiteContext::Main);
	}

	#[test]
	fn test_tenant_key_iff_organization() {
		assert_eq!(org("acme").tenant_key(), Some("acme"));
		assert_eq!(SiteContext::Main.tenant_key(), None);
		assert_eq!(SiteContext::Admin.tenant_key(), None);
		assert!(SiteContext::Main.is_main());
		assert!(SiteContext::Admin.is_admin());
	}

	#[test]
	fn test_normalize_host() {
		assert_eq!(normalize_host("School.Example.com:8443"), "school.example.com");
		assert_eq!(normalize_host("localhost:5173"), "localhost");
		assert_eq!(normalize_host("example.com"), "example.com");
		assert_eq!(normalize_host("[::1]:8080"), "::1");
	}

	#[test]
	fn test_serialize_site() {
		let json = serde_json::to_value(org("acme")).ok();
		assert_eq!(json, Some(serde_json::json!({ "mode": "organization", "tenantKey": "acme" })));
		let json = serde_json::to_value(SiteContext::Main).ok();
		assert_eq!(json, Some(serde_json::json!({ "mode": "main" })));
	}
}

// vim: ts=4
