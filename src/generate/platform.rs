//! Platform-specific phrasings.
//!
//! Map platforms want place names and services, social platforms want
//! pages, groups and hashtags, professional networks want professional
//! language. Unknown platform names contribute nothing.

use crate::config::lexicon::{Lexicon, PlatformKind};
use crate::text::{contains_ci, contains_term, replace_term};
use crate::types::{CandidateQuery, QueryContext, Source};

use super::{dedup_exact, present};

/// Queries with at most this many words also get a hashtag form.
const HASHTAG_MAX_WORDS: usize = 3;

/// Extra candidates for every platform kind named in `platforms`, each
/// one priority step below its parent.
pub fn optimize_for_platforms(
    pool: &[CandidateQuery],
    platforms: &[String],
    context: &QueryContext,
    lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let mut kinds: Vec<PlatformKind> = Vec::new();
    for platform in platforms {
        match lexicon.platform_kind(platform) {
            Some(kind) if !kinds.contains(&kind) => kinds.push(kind),
            Some(_) => {}
            None => tracing::debug!("Ignoring unknown platform {platform:?}"),
        }
    }

    let mut out = Vec::new();
    for kind in kinds {
        for candidate in pool {
            for text in platform_phrasings(&candidate.text, kind, context) {
                out.push(candidate.derived(text, Source::Platform));
            }
        }
    }
    dedup_exact(out)
}

fn platform_phrasings(text: &str, kind: PlatformKind, context: &QueryContext) -> Vec<String> {
    let mut out = Vec::new();
    match kind {
        PlatformKind::Map => {
            if let Some(loc) = present(&context.location) {
                if !contains_ci(text, loc) {
                    out.push(format!("{text} near {loc}"));
                }
            }
            if let Some(services) = replace_term(text, "students", "student services") {
                out.push(services);
            }
        }
        PlatformKind::Social => {
            for suffix in ["page", "group"] {
                if !contains_term(text, suffix) {
                    out.push(format!("{text} {suffix}"));
                }
            }
            if let Some(tag) = hashtag(text) {
                out.push(tag);
            }
        }
        PlatformKind::Professional => {
            for suffix in ["professional", "network"] {
                if !contains_term(text, suffix) {
                    out.push(format!("{text} {suffix}"));
                }
            }
        }
    }
    out
}

/// `"ICT students"` → `"#ICTstudents"`, for short queries only.
fn hashtag(text: &str) -> Option<String> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() || words.len() > HASHTAG_MAX_WORDS {
        return None;
    }
    Some(format!("#{}", words.concat()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(text: &str, platforms: &[&str], ctx: &QueryContext) -> Vec<CandidateQuery> {
        let pool = vec![CandidateQuery::original(text)];
        let platforms: Vec<String> = platforms.iter().map(|p| p.to_string()).collect();
        optimize_for_platforms(&pool, &platforms, ctx, &Lexicon::default())
    }

    fn texts(cands: &[CandidateQuery]) -> Vec<&str> {
        cands.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn map_platform_location_and_services() {
        let ctx = QueryContext::default().with_location("kandy");
        let out = run("ICT students", &["google_maps"], &ctx);
        assert_eq!(texts(&out), vec!["ICT students near kandy", "ICT student services"]);
        assert!(out.iter().all(|c| c.priority == 9 && c.source == Source::Platform));
    }

    #[test]
    fn social_platform_pages_groups_hashtags() {
        let out = run("ICT students", &["facebook"], &QueryContext::default());
        assert_eq!(
            texts(&out),
            vec!["ICT students page", "ICT students group", "#ICTstudents"]
        );
    }

    #[test]
    fn long_queries_get_no_hashtag() {
        let out = run("final year ICT students", &["instagram"], &QueryContext::default());
        assert!(out.iter().all(|c| !c.text.starts_with('#')));
    }

    #[test]
    fn professional_platform_phrasing() {
        let out = run("software engineers", &["LinkedIn"], &QueryContext::default());
        assert_eq!(
            texts(&out),
            vec!["software engineers professional", "software engineers network"]
        );
    }

    #[test]
    fn repeated_kinds_and_unknown_platforms() {
        let out = run("bakeries", &["facebook", "instagram", "myspace"], &QueryContext::default());
        assert_eq!(texts(&out), vec!["bakeries page", "bakeries group", "#bakeries"]);
    }

    #[test]
    fn no_platforms_no_output() {
        assert!(run("bakeries", &[], &QueryContext::default()).is_empty());
    }

    #[test]
    fn hashtag_strips_punctuation() {
        assert_eq!(hashtag("kandy, cafes!").as_deref(), Some("#kandycafes"));
        assert_eq!(hashtag("!!!"), None);
    }
}
