//! Content variants: named alternate presentations of the resume/home
//! content (e.g. leader/ops/builder), selected by URL path prefix or the
//! `v` query parameter. Discovery runs once at startup; the list is
//! immutable afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::content::resume::VariantMeta;

pub const DEFAULT_VARIANT: &str = "default";
/// Variants without explicit frontmatter metadata sort after all curated ones.
const DEFAULT_ORDER: u32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub key: String,
    pub display_name: String,
    pub order: u32,
}

/// Only the optional presentation block matters for discovery; the rest of
/// the variant resume file is ignored here.
#[derive(Debug, Default, Deserialize)]
struct VariantSource {
    #[serde(default)]
    meta: Option<VariantMeta>,
}

/// Scans the content directory for `resume-<key>.yaml` files and derives
/// the variant list, with the default variant always present and first.
pub fn discover_variants(content_dir: &Path) -> Vec<Variant> {
    let mut variants = vec![Variant {
        key: DEFAULT_VARIANT.to_string(),
        display_name: "Default".to_string(),
        order: 0,
    }];

    let entries = match std::fs::read_dir(content_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "Could not read content directory {}: {e}",
                content_dir.display()
            );
            return variants;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(key) = name
            .strip_prefix("resume-")
            .and_then(|rest| rest.strip_suffix(".yaml"))
        else {
            continue;
        };

        let mut order = DEFAULT_ORDER;
        let mut display_name = capitalize(key);

        match std::fs::read_to_string(entry.path())
            .map_err(anyhow::Error::from)
            .and_then(|raw| serde_yaml::from_str::<VariantSource>(&raw).map_err(Into::into))
        {
            Ok(source) => {
                if let Some(meta) = source.meta {
                    if let Some(o) = meta.order {
                        order = o;
                    }
                    if let Some(d) = meta.display_name {
                        display_name = d;
                    }
                }
            }
            Err(e) => warn!("Error reading {name}: {e:#}"),
        }

        variants.push(Variant {
            key: key.to_string(),
            display_name,
            order,
        });
    }

    variants.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.key.cmp(&b.key)));
    variants
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn is_known(variants: &[Variant], key: &str) -> bool {
    variants.iter().any(|v| v.key == key)
}

/// Determines the active variant for a request: the `v` query parameter
/// wins when it names a known variant, then the first path segment, else
/// none (default). Unknown keys are treated as absent.
pub fn resolve_variant<'a>(
    path: &str,
    query_v: Option<&'a str>,
    variants: &'a [Variant],
) -> Option<&'a str> {
    if let Some(v) = query_v {
        if is_known(variants, v) {
            return Some(v);
        }
    }

    let first_segment = path.split('/').find(|s| !s.is_empty())?;
    variants
        .iter()
        .find(|v| v.key == first_segment)
        .map(|v| v.key.as_str())
}

/// Canonical redirect target for a query-supplied variant, or None when the
/// path is not one of the two canonicalizable routes. Unknown and default
/// variants never redirect.
pub fn redirect_target(
    path: &str,
    variant: Option<&str>,
    variants: &[Variant],
) -> Option<String> {
    let variant = variant.filter(|v| *v != DEFAULT_VARIANT && is_known(variants, v))?;

    match path {
        "/" | "/index.html" => Some(format!("/{variant}/")),
        "/resume" | "/resume/" => Some(format!("/{variant}/resume/")),
        _ => None,
    }
}

/// Returns the variant-qualified form of `path`: canonical prefixes for the
/// home and resume routes, fragment rewriting for `/#...`, and a `v` query
/// parameter everywhere else. A no-op for the default variant and for paths
/// that already carry the parameter.
pub fn add_variant(path: &str, variant: Option<&str>) -> String {
    let Some(variant) = variant.filter(|v| *v != DEFAULT_VARIANT) else {
        return path.to_string();
    };

    if path == "/" || path == "/index.html" {
        return format!("/{variant}/");
    }
    if path == "/resume" || path == "/resume/" {
        return format!("/{variant}/resume/");
    }

    // Hash-only paths on the homepage: /#contact -> /ops/#contact
    if let Some(fragment) = path.strip_prefix("/#") {
        return format!("/{variant}/#{fragment}");
    }

    if path.contains(&format!("v={variant}")) {
        return path.to_string();
    }

    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}v={variant}")
}

/// Strips all variant information from a path: the `v` query parameter and
/// any known non-default path prefix. Left inverse of `add_variant`.
pub fn remove_variant(path: &str, variants: &[Variant]) -> String {
    let mut clean = strip_variant_query(path);

    for v in variants {
        if v.key == DEFAULT_VARIANT {
            continue;
        }
        let prefix = format!("/{}/", v.key);
        let exact = format!("/{}", v.key);
        if let Some(rest) = clean.strip_prefix(&prefix) {
            clean = format!("/{rest}");
        } else if clean == exact {
            clean = "/".to_string();
        }
    }
    clean
}

/// The canonical URL path for a logical page + variant combination.
pub fn canonical_variant_path(path: &str, variant: Option<&str>, variants: &[Variant]) -> String {
    add_variant(&remove_variant(path, variants), variant)
}

fn strip_variant_query(path: &str) -> String {
    let (without_fragment, fragment) = match path.split_once('#') {
        Some((p, f)) => (p, Some(f)),
        None => (path, None),
    };
    let (base, query) = match without_fragment.split_once('?') {
        Some((b, q)) => (b, Some(q)),
        None => (without_fragment, None),
    };

    let mut result = base.to_string();
    if let Some(query) = query {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|pair| *pair != "v" && !pair.starts_with("v="))
            .collect();
        if !kept.is_empty() {
            result.push('?');
            result.push_str(&kept.join("&"));
        }
    }
    if let Some(fragment) = fragment {
        result.push('#');
        result.push_str(fragment);
    }
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn fixture_variants() -> Vec<Variant> {
        vec![
            Variant {
                key: "default".to_string(),
                display_name: "Default".to_string(),
                order: 0,
            },
            Variant {
                key: "leader".to_string(),
                display_name: "Leader".to_string(),
                order: 1,
            },
            Variant {
                key: "ops".to_string(),
                display_name: "Ops".to_string(),
                order: 2,
            },
            Variant {
                key: "builder".to_string(),
                display_name: "Builder".to_string(),
                order: 3,
            },
        ]
    }

    #[test]
    fn test_discover_variants_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("resume-leader.yaml"),
            "name: A\nmeta:\n  order: 1\n  displayName: Leadership\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("resume-ops.yaml"), "name: A\n").unwrap();
        std::fs::write(dir.path().join("resume.yaml"), "name: A\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "not a resume").unwrap();

        let variants = discover_variants(dir.path());
        let keys: Vec<_> = variants.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["default", "leader", "ops"]);
        assert_eq!(variants[1].display_name, "Leadership");
        assert_eq!(variants[1].order, 1);
        // no meta block: defaults
        assert_eq!(variants[2].display_name, "Ops");
        assert_eq!(variants[2].order, DEFAULT_ORDER);
    }

    #[test]
    fn test_discover_sorts_by_order_then_key() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("resume-zeta.yaml"), "meta:\n  order: 1\n").unwrap();
        std::fs::write(dir.path().join("resume-alpha.yaml"), "{}").unwrap();
        std::fs::write(dir.path().join("resume-beta.yaml"), "{}").unwrap();

        let variants = discover_variants(dir.path());
        let keys: Vec<_> = variants.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["default", "zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_resolve_query_param_takes_precedence() {
        let variants = fixture_variants();
        assert_eq!(
            resolve_variant("/leader/resume/", Some("ops"), &variants),
            Some("ops")
        );
    }

    #[test]
    fn test_resolve_path_prefix() {
        let variants = fixture_variants();
        assert_eq!(resolve_variant("/ops/resume/", None, &variants), Some("ops"));
        assert_eq!(resolve_variant("/blog/post/", None, &variants), None);
    }

    #[test]
    fn test_resolve_unknown_keys_are_ignored() {
        let variants = fixture_variants();
        assert_eq!(resolve_variant("/", Some("bogus"), &variants), None);
        assert_eq!(resolve_variant("/bogus/resume/", None, &variants), None);
    }

    #[test]
    fn test_redirect_target_for_canonical_routes() {
        let variants = fixture_variants();
        assert_eq!(
            redirect_target("/", Some("builder"), &variants),
            Some("/builder/".to_string())
        );
        assert_eq!(
            redirect_target("/resume", Some("ops"), &variants),
            Some("/ops/resume/".to_string())
        );
        assert_eq!(
            redirect_target("/resume/", Some("ops"), &variants),
            Some("/ops/resume/".to_string())
        );
    }

    #[test]
    fn test_no_redirect_for_other_paths_or_variants() {
        let variants = fixture_variants();
        // variant honored in place on non-canonical routes
        assert_eq!(redirect_target("/blog/post/", Some("ops"), &variants), None);
        assert_eq!(redirect_target("/", Some("default"), &variants), None);
        assert_eq!(redirect_target("/", Some("bogus"), &variants), None);
        assert_eq!(redirect_target("/", None, &variants), None);
    }

    #[test]
    fn test_add_variant_canonical_paths() {
        assert_eq!(add_variant("/", Some("ops")), "/ops/");
        assert_eq!(add_variant("/index.html", Some("ops")), "/ops/");
        assert_eq!(add_variant("/resume", Some("ops")), "/ops/resume/");
        assert_eq!(add_variant("/resume/", Some("ops")), "/ops/resume/");
    }

    #[test]
    fn test_add_variant_fragment_and_query() {
        assert_eq!(add_variant("/#contact", Some("ops")), "/ops/#contact");
        assert_eq!(add_variant("/blog/post/", Some("ops")), "/blog/post/?v=ops");
        assert_eq!(
            add_variant("/blog/post/?page=2", Some("ops")),
            "/blog/post/?page=2&v=ops"
        );
    }

    #[test]
    fn test_add_variant_is_idempotent() {
        let once = add_variant("/blog/post/", Some("ops"));
        assert_eq!(add_variant(&once, Some("ops")), once);
    }

    #[test]
    fn test_add_variant_default_or_none_is_noop() {
        assert_eq!(add_variant("/resume/", Some("default")), "/resume/");
        assert_eq!(add_variant("/resume/", None), "/resume/");
    }

    #[test]
    fn test_remove_variant_inverts_add_for_all_known_keys() {
        let variants = fixture_variants();
        for path in ["/", "/resume/", "/blog/post/", "/#contact"] {
            for v in &variants {
                let qualified = add_variant(path, Some(&v.key));
                assert_eq!(
                    remove_variant(&qualified, &variants),
                    path,
                    "path={path} variant={}",
                    v.key
                );
            }
        }
    }

    #[test]
    fn test_round_trip_reproduces_variant_qualified_path() {
        let variants = fixture_variants();
        for path in ["/", "/resume/", "/blog/post/"] {
            let qualified = add_variant(path, Some("ops"));
            assert_eq!(
                canonical_variant_path(&qualified, Some("ops"), &variants),
                qualified
            );
        }
    }

    #[test]
    fn test_resolving_added_variant_yields_that_variant() {
        let variants = fixture_variants();
        for v in &variants {
            if v.key == DEFAULT_VARIANT {
                continue;
            }
            let qualified = add_variant("/", Some(&v.key));
            assert_eq!(
                resolve_variant(&qualified, None, &variants),
                Some(v.key.as_str())
            );
        }
    }

    #[test]
    fn test_strip_variant_query_keeps_other_params() {
        assert_eq!(strip_variant_query("/blog/?v=ops&page=2"), "/blog/?page=2");
        assert_eq!(strip_variant_query("/blog/?page=2"), "/blog/?page=2");
        assert_eq!(strip_variant_query("/blog/?v=ops#top"), "/blog/#top");
    }
}
